//! Main code generator.

use crate::error::CodegenError;
use crate::render::{RenderOptions, Renderer};
use crate::rust::RustRenderer;
use crate::session::BuildSession;
use jsonbind_schema::SynthesisOptions;
use tracing::debug;

/// Code generator: one build session plus a renderer.
#[derive(Debug, Default)]
pub struct Generator<R = RustRenderer> {
    session: BuildSession,
    renderer: R,
}

impl Generator {
    /// Creates a generator with default options and the Rust renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a Rust generator with the given options.
    #[must_use]
    pub fn with_options(options: SynthesisOptions, render: RenderOptions) -> Self {
        Self {
            session: BuildSession::new(options),
            renderer: RustRenderer::with_options(render),
        }
    }
}

impl<R: Renderer> Generator<R> {
    /// Creates a generator with a custom renderer.
    #[must_use]
    pub fn with_renderer(options: SynthesisOptions, renderer: R) -> Self {
        Self {
            session: BuildSession::new(options),
            renderer,
        }
    }

    /// Parses and registers a schema document.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if parsing fails or the name is taken.
    pub fn add_schema(&mut self, name: &str, text: &str) -> Result<(), CodegenError> {
        self.session.add_schema(name, text)
    }

    /// Returns the build session.
    #[must_use]
    pub fn session(&self) -> &BuildSession {
        &self.session
    }

    /// Returns the build session mutably, e.g. to declare interfaces.
    pub fn session_mut(&mut self) -> &mut BuildSession {
        &mut self.session
    }

    /// Generates source text for one entry.
    ///
    /// # Arguments
    /// * `entry` - Name of a registered schema document
    ///
    /// # Returns
    /// Generated source text.
    ///
    /// # Errors
    /// Returns `CodegenError` if synthesis or emission fails.
    pub fn generate(&mut self, entry: &str) -> Result<String, CodegenError> {
        let set = self.session.run(entry)?;
        let output = self.renderer.render(set);
        debug!(entry, types = set.len(), bytes = output.len(), "rendered entry");
        Ok(output)
    }
}

/// Derives an entry name from a schema file name.
fn entry_name(path: &std::path::Path) -> Result<String, CodegenError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.strip_suffix(".schema").unwrap_or(stem).to_string())
        .ok_or_else(|| {
            CodegenError::generation(format!("cannot derive an entry name from '{}'", path.display()))
        })
}

/// Generates Rust code for one schema held in a string.
///
/// # Arguments
/// * `name` - Entry name; it names the root type
/// * `text` - Schema JSON text
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, synthesis or emission fails.
pub fn generate_from_str(name: &str, text: &str) -> Result<String, CodegenError> {
    let mut generator = Generator::new();
    generator.add_schema(name, text)?;
    generator.generate(name)
}

/// Generates Rust code for a schema file. The file stem names the root type.
///
/// # Arguments
/// * `path` - Path to the schema file
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, synthesis or emission fails.
pub fn generate_from_file(path: &std::path::Path) -> Result<String, CodegenError> {
    let text = std::fs::read_to_string(path)?;
    generate_from_str(&entry_name(path)?, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorSet;
    use std::io::Write;

    const PERSON: &str = r#"{"properties": {"Name": {"type": "string"}}, "required": ["Name"]}"#;

    #[test]
    fn test_generate_from_str() {
        let code = generate_from_str("Person", PERSON).unwrap();
        assert!(code.contains("pub struct Person {"));
        assert!(code.contains("pub fn name(&self)"));
    }

    #[test]
    fn test_generate_from_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Customer.schema.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(PERSON.as_bytes()).unwrap();

        let code = generate_from_file(&path).unwrap();
        assert!(code.contains("pub struct Customer {"));
    }

    #[test]
    fn test_generate_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate_from_file(&dir.path().join("Nope.json"));
        assert!(matches!(result, Err(CodegenError::Io(_))));
    }

    #[test]
    fn test_invalid_schema_text() {
        assert!(generate_from_str("Broken", "{not json").is_err());
    }

    struct Names;

    impl Renderer for Names {
        fn render(&self, set: &DescriptorSet) -> String {
            set.iter().map(|d| d.name.as_str()).collect::<Vec<_>>().join(",")
        }
    }

    #[test]
    fn test_custom_renderer() {
        let mut generator = Generator::with_renderer(SynthesisOptions::default(), Names);
        generator
            .add_schema(
                "Holder",
                r#"{"properties": {"inner": {"properties": {"x": {"type": "integer"}}}}}"#,
            )
            .unwrap();
        assert_eq!(generator.generate("Holder").unwrap(), "Holder,Inner");
        assert_eq!(generator.generate("Holder").unwrap(), "Holder,Inner");
    }
}
