//! Deriving a game's DSL types through the type environment

use dsl_types::{
    AdapterMethod, CallbackSignature, Consumer, HostAdapter, HostClass, HostClassKey, HostType,
    Type, TypeEnvironment, TypeKind,
};

#[derive(Default)]
struct Point {
    x: i64,
    y: i64,
}

#[derive(Default)]
struct PositionComponent {
    position: Option<std::rc::Rc<Point>>,
    facing: Facing,
}

#[derive(Clone, Default, PartialEq)]
enum Facing {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

#[derive(Default)]
struct DrawComponent {
    texture: Option<std::rc::Rc<Texture>>,
    on_draw: Option<Consumer>,
}

#[derive(Default)]
struct InteractionComponent {
    on_interact: Option<Consumer>,
    radius: f64,
    directions: Vec<String>,
}

struct Texture;
struct TextureLoader;

fn environment() -> TypeEnvironment {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut env = TypeEnvironment::new();
    env.register_adapter(
        &HostAdapter::new::<TextureLoader>().method(
            AdapterMethod::new("load", |_| Ok(Texture))
                .marked()
                .param("path", HostType::String),
        ),
    )
    .unwrap();
    env.register_class(
        HostClass::build::<Point>()
            .dsl_type()
            .data_field("x", HostType::Int, |p: &mut Point, v: i64| p.x = v)
            .data_field("y", HostType::Int, |p: &mut Point, v: i64| p.y = v)
            .default_constructor()
            .finish(),
    );
    env.register_class(
        HostClass::build::<Facing>()
            .dsl_type()
            .enumeration(&[
                ("UP", Facing::Up),
                ("DOWN", Facing::Down),
                ("LEFT", Facing::Left),
                ("RIGHT", Facing::Right),
            ])
            .finish(),
    );
    env.register_class(
        HostClass::build::<PositionComponent>()
            .dsl_type()
            .data_field("position", HostType::class::<Point>(), |c: &mut PositionComponent, v| {
                c.position = Some(v)
            })
            .data_field("facing", HostType::class::<Facing>(), |c: &mut PositionComponent, v: std::rc::Rc<Facing>| {
                c.facing = (*v).clone()
            })
            .default_constructor()
            .finish(),
    );
    env.register_class(
        HostClass::build::<DrawComponent>()
            .dsl_type()
            .data_field_as("texture", "texture_path", HostType::class::<Texture>(), |c: &mut DrawComponent, v| {
                c.texture = Some(v)
            })
            .callback_field(
                "on_draw",
                CallbackSignature::consumer(HostType::class::<Point>()),
                |c: &mut DrawComponent, v: Consumer| c.on_draw = Some(v),
            )
            .default_constructor()
            .finish(),
    );
    env.register_class(
        HostClass::build::<InteractionComponent>()
            .dsl_type()
            .callback_field(
                "onInteract",
                CallbackSignature::consumer(HostType::class::<Point>()),
                |c: &mut InteractionComponent, v: Consumer| c.on_interact = Some(v),
            )
            .data_field("radius", HostType::Float, |c: &mut InteractionComponent, v: f64| c.radius = v)
            .data_field(
                "directions",
                HostType::set(HostType::String),
                |c: &mut InteractionComponent, v: Vec<String>| c.directions = v,
            )
            .hidden_field("cooldown", HostType::Float)
            .default_constructor()
            .finish(),
    );
    env
}

fn load(env: &mut TypeEnvironment) {
    env.load_types(&[
        HostClassKey::of::<PositionComponent>(),
        HostClassKey::of::<DrawComponent>(),
        HostClassKey::of::<InteractionComponent>(),
    ])
    .unwrap();
}

fn member_names(env: &TypeEnvironment, key: HostClassKey) -> Vec<String> {
    let ty = env.type_of_class(key).unwrap();
    env.types()
        .get(ty)
        .and_then(Type::members)
        .unwrap()
        .symbols()
        .map(|symbol| format!("{}: {}", symbol.name, env.types().display(symbol.ty)))
        .collect()
}

#[test]
fn test_dependencies_are_derived_on_demand() {
    let mut env = environment();
    load(&mut env);

    let types = env.types();
    for name in ["point", "facing", "position_component", "draw_component", "interaction_component"] {
        assert!(types.lookup_type(name).is_some(), "missing type '{}'", name);
    }
    let facing = types.lookup_type("facing").unwrap();
    assert_eq!(types.get(facing).unwrap().kind(), TypeKind::Enum);
    let texture = types.lookup_type("texture").unwrap();
    assert_eq!(types.get(texture).unwrap().kind(), TypeKind::PodAdapted);
}

#[test]
fn test_member_names_follow_dsl_convention() {
    let mut env = environment();
    load(&mut env);

    assert_eq!(
        member_names(&env, HostClassKey::of::<DrawComponent>()),
        vec!["texture_path: texture", "on_draw: fn(point) -> none"]
    );
    assert_eq!(
        member_names(&env, HostClassKey::of::<InteractionComponent>()),
        vec![
            "on_interact: fn(point) -> none",
            "radius: float",
            "directions: string<>",
        ]
    );
}

#[test]
fn test_equal_signatures_share_one_function_type() {
    let mut env = environment();
    load(&mut env);

    let member_ty = |key: HostClassKey, name: &str| {
        let ty = env.type_of_class(key).unwrap();
        env.types().get(ty).unwrap().members().unwrap().resolve(name).unwrap().ty
    };
    assert_eq!(
        member_ty(HostClassKey::of::<DrawComponent>(), "on_draw"),
        member_ty(HostClassKey::of::<InteractionComponent>(), "on_interact")
    );
}

#[test]
fn test_derivation_is_deterministic() {
    let mut first = environment();
    load(&mut first);
    let mut second = environment();
    load(&mut second);

    for key in [
        HostClassKey::of::<PositionComponent>(),
        HostClassKey::of::<DrawComponent>(),
        HostClassKey::of::<InteractionComponent>(),
    ] {
        assert_eq!(member_names(&first, key), member_names(&second, key));
        let a = first.type_of_class(key).unwrap();
        let b = second.type_of_class(key).unwrap();
        assert_eq!(first.types().name_of(a), second.types().name_of(b));
    }
}

#[test]
fn test_reloading_reuses_types() {
    let mut env = environment();
    load(&mut env);
    let count = env.types().len();
    load(&mut env);
    assert_eq!(env.types().len(), count);
}
