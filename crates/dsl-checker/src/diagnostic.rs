//! Reporting of binding errors
//!
//! Binding errors are rendered against the DSL source they came from, either
//! to a terminal or as JSON for editor integration.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label};
use codespan_reporting::files::{Error as FilesError, Files, SimpleFiles};
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use termcolor::{Buffer, ColorChoice, StandardStream, WriteColor};

use crate::error::BindError;

/// Source files binding errors are reported against
pub type SourceFiles = SimpleFiles<String, String>;

/// Stable code of a binding error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// A prototype name is already bound
    #[serde(rename = "E3001")]
    DuplicateDefinition,
    /// A component reference names no type
    #[serde(rename = "E3002")]
    UnresolvedType,
    /// A component reference names something that is not a type
    #[serde(rename = "E3003")]
    NotAType,
    /// A prototype references the same component type twice
    #[serde(rename = "E3004")]
    DuplicateComponent,
    /// The finished prototype type could not be registered
    #[serde(rename = "E3005")]
    Registration,
}

impl ErrorCode {
    /// The code of a binding error
    pub fn of(error: &BindError) -> Self {
        match error {
            BindError::DuplicateDefinition { .. } => ErrorCode::DuplicateDefinition,
            BindError::UnresolvedType { .. } => ErrorCode::UnresolvedType,
            BindError::NotAType { .. } => ErrorCode::NotAType,
            BindError::DuplicateComponent { .. } => ErrorCode::DuplicateComponent,
            BindError::Registration { .. } => ErrorCode::Registration,
        }
    }

    /// The code as text, e.g. `E3002`
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateDefinition => "E3001",
            ErrorCode::UnresolvedType => "E3002",
            ErrorCode::NotAType => "E3003",
            ErrorCode::DuplicateComponent => "E3004",
            ErrorCode::Registration => "E3005",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ErrorCode::DuplicateDefinition => "already defined",
            ErrorCode::UnresolvedType => "type not found",
            ErrorCode::NotAType => "not a type",
            ErrorCode::DuplicateComponent => "component listed again",
            ErrorCode::Registration => "in this definition",
        }
    }

    fn help(self) -> Option<&'static str> {
        match self {
            ErrorCode::UnresolvedType => Some("register the host type before binding the program"),
            ErrorCode::DuplicateComponent => Some("a prototype holds one component of each type"),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A binding error located in a source file
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: ErrorCode,
    file_id: usize,
    inner: CsDiagnostic<usize>,
}

impl Diagnostic {
    /// Diagnostic for a binding error found in file `file_id`
    pub fn from_bind_error(error: &BindError, file_id: usize) -> Self {
        let code = ErrorCode::of(error);
        let span = error.span();
        let mut inner = CsDiagnostic::error()
            .with_message(error.to_string())
            .with_code(code.as_str())
            .with_labels(vec![Label::primary(
                file_id,
                span.start as usize..span.end as usize,
            )
            .with_message(code.label())]);
        if let Some(help) = code.help() {
            inner = inner.with_notes(vec![format!("help: {}", help)]);
        }
        Diagnostic {
            code,
            file_id,
            inner,
        }
    }

    /// Error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message of the underlying error
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Write to stderr, colored when the terminal supports it
    pub fn emit(&self, files: &SourceFiles) -> Result<(), FilesError> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        self.write_to(&mut writer, files)
    }

    /// Render as plain text
    pub fn render(&self, files: &SourceFiles) -> Result<String, FilesError> {
        let mut buffer = Buffer::no_color();
        self.write_to(&mut buffer, files)?;
        Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
    }

    fn write_to(&self, writer: &mut dyn WriteColor, files: &SourceFiles) -> Result<(), FilesError> {
        term::emit(writer, &term::Config::default(), files, &self.inner)
    }

    /// Locate the primary label and convert for editors
    pub fn to_json(&self, files: &SourceFiles) -> Result<JsonDiagnostic, FilesError> {
        let range = self
            .inner
            .labels
            .first()
            .map(|label| label.range.clone())
            .unwrap_or(0..0);
        let start = files.location(self.file_id, range.start)?;
        let end = files.location(self.file_id, range.end)?;
        Ok(JsonDiagnostic {
            code: self.code,
            message: self.inner.message.clone(),
            file: files.name(self.file_id)?,
            line: start.line_number,
            column: start.column_number,
            end_line: end.line_number,
            end_column: end.column_number,
            help: self.code.help().map(str::to_string),
        })
    }
}

/// Editor-facing form of a [`Diagnostic`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Error message
    pub message: String,
    /// File name
    pub file: String,
    /// Start line (1-indexed)
    pub line: usize,
    /// Start column (1-indexed)
    pub column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Suggested fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Render every binding error of one file, separated by blank lines
pub fn render_all(errors: &[BindError], files: &SourceFiles, file_id: usize) -> Result<String, FilesError> {
    let mut rendered = Vec::with_capacity(errors.len());
    for error in errors {
        rendered.push(Diagnostic::from_bind_error(error, file_id).render(files)?);
    }
    Ok(rendered.join("\n"))
}

/// Source files holding a single file, with id 0
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SourceFiles {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    const SOURCE: &str = "entity_type monster {\n    health_component {}\n}\n";

    fn unresolved() -> BindError {
        BindError::UnresolvedType {
            name: "health_component".to_string(),
            span: Span::new(26, 42),
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(ErrorCode::of(&unresolved()), ErrorCode::UnresolvedType);
        assert_eq!(ErrorCode::UnresolvedType.to_string(), "E3002");
        assert_eq!(
            serde_json::to_string(&ErrorCode::DuplicateDefinition).unwrap(),
            "\"E3001\""
        );
    }

    #[test]
    fn test_render_plain_text() {
        let files = create_files("monster.dng", SOURCE);
        let text = Diagnostic::from_bind_error(&unresolved(), 0).render(&files).unwrap();
        assert!(text.contains("error[E3002]"));
        assert!(text.contains("monster.dng:2:5"));
        assert!(text.contains("type not found"));
        assert!(text.contains("help: register the host type"));
    }

    #[test]
    fn test_json_location() {
        let error = BindError::DuplicateDefinition {
            name: "monster".to_string(),
            span: Span::new(12, 19),
        };
        let files = create_files("monster.dng", "entity_type monster {}");
        let json = Diagnostic::from_bind_error(&error, 0).to_json(&files).unwrap();
        assert_eq!(json.code, ErrorCode::DuplicateDefinition);
        assert_eq!(json.file, "monster.dng");
        assert_eq!((json.line, json.column), (1, 13));
        assert_eq!((json.end_line, json.end_column), (1, 20));
        assert!(json.help.is_none());

        let text = serde_json::to_string(&json).unwrap();
        assert!(text.contains("\"code\":\"E3001\""));
        assert!(!text.contains("help"));
        let parsed: JsonDiagnostic = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json);
    }

    #[test]
    fn test_render_all() {
        let files = create_files("monster.dng", SOURCE);
        let errors = vec![
            unresolved(),
            BindError::DuplicateDefinition {
                name: "monster".to_string(),
                span: Span::new(12, 19),
            },
        ];
        let text = render_all(&errors, &files, 0).unwrap();
        assert!(text.contains("E3002"));
        assert!(text.contains("E3001"));
    }
}
