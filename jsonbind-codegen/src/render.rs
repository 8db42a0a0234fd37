//! Emission collaborator boundary.

use crate::descriptor::DescriptorSet;

/// Turns a descriptor set into source text.
pub trait Renderer {
    /// Renders every descriptor. Output must be deterministic.
    fn render(&self, set: &DescriptorSet) -> String;
}

/// Options shared by renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Path of the runtime crate referenced by generated code.
    pub runtime_crate: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            runtime_crate: "jsonbind".to_string(),
        }
    }
}

impl RenderOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime crate path.
    #[must_use]
    pub fn runtime_crate(mut self, path: impl Into<String>) -> Self {
        self.runtime_crate = path.into();
        self
    }
}
