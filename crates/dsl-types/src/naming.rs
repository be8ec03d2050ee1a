//! DSL naming conventions for host types and members

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z0-9_])([A-Z])").expect("static pattern compiles"));

/// Convert a host name into its DSL form
///
/// An underscore is inserted between a lowercase letter, digit or underscore
/// and a following uppercase letter, then the whole name is lowercased.
/// Consecutive uppercase letters stay together: `AIComponent` becomes
/// `aicomponent`.
pub fn convert_to_dsl_name(name: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(name, |caps: &Captures<'_>| {
            format!("{}_{}", &caps[1], caps[2].to_lowercase())
        })
        .to_lowercase()
}

/// Strip module path and generic arguments from a Rust type name
pub(crate) fn simple_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_dsl_name() {
        assert_eq!(convert_to_dsl_name("HealthComponent"), "health_component");
        assert_eq!(convert_to_dsl_name("Position"), "position");
        assert_eq!(convert_to_dsl_name("texturePath"), "texture_path");
        assert_eq!(convert_to_dsl_name("Vec2D"), "vec2_d");
        assert_eq!(convert_to_dsl_name("AIComponent"), "aicomponent");
        assert_eq!(convert_to_dsl_name("onDeath"), "on_death");
    }

    #[test]
    fn test_convert_is_idempotent() {
        for name in ["HealthComponent", "AIComponent", "velocityX", "drawComponent2D"] {
            let once = convert_to_dsl_name(name);
            assert_eq!(convert_to_dsl_name(&once), once);
        }
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("game::components::HealthComponent"), "HealthComponent");
        assert_eq!(simple_name("alloc::vec::Vec<game::Item>"), "Vec");
        assert_eq!(simple_name("Plain"), "Plain");
    }
}
