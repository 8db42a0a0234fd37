//! One build run.
//!
//! A [`BuildSession`] owns the synthesis driver, the phase coordinator and
//! the descriptor sets produced so far. Nothing outlives the session, so a
//! new build starts from an empty graph.

use crate::capability::InterfaceDecl;
use crate::descriptor::DescriptorSet;
use crate::emitter::AccessorEmitter;
use crate::error::{CodegenError, PhaseError};
use crate::phase::{Phase, PhaseCoordinator};
use indexmap::IndexMap;
use jsonbind_schema::{SchemaDocument, SynthesisDriver, SynthesisOptions, TypeGraph, TypeId};
use tracing::{debug, warn};

/// Context object for one build run.
#[derive(Debug, Default)]
pub struct BuildSession {
    driver: SynthesisDriver,
    coordinator: PhaseCoordinator,
    interfaces: Vec<InterfaceDecl>,
    outputs: IndexMap<String, DescriptorSet>,
}

impl BuildSession {
    /// Creates a session with the given options.
    #[must_use]
    pub fn new(options: SynthesisOptions) -> Self {
        Self {
            driver: SynthesisDriver::with_options(options),
            ..Self::default()
        }
    }

    /// Parses and registers a schema document.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if parsing fails or the name is taken.
    pub fn add_schema(&mut self, name: &str, text: &str) -> Result<(), CodegenError> {
        Ok(self.driver.add_schema(name, text)?)
    }

    /// Registers a parsed schema document.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if the name is taken.
    pub fn add_document(&mut self, document: SchemaDocument) -> Result<(), CodegenError> {
        Ok(self.driver.add_document(document)?)
    }

    /// Declares an interface for structural casts.
    pub fn declare_interface(&mut self, interface: InterfaceDecl) {
        self.interfaces.push(interface);
    }

    /// Host signal: the entry is being visited. Returns true if work remains.
    pub fn visit(&mut self, entry: &str) -> bool {
        self.coordinator.on_entry_visited(entry)
    }

    /// Host signal: the entry's member set is fixed.
    ///
    /// Synthesizes the entry and retains its declarations by path. Returns
    /// the root slot; an entry that is already done returns its root without
    /// synthesizing again.
    ///
    /// # Errors
    /// Returns `CodegenError::Phase` on an out-of-order call and
    /// `CodegenError::Schema` if synthesis fails.
    pub fn analyze(&mut self, entry: &str) -> Result<TypeId, CodegenError> {
        if self.coordinator.on_type_analyzed(entry)?.is_none() {
            return self
                .driver
                .entry(entry)
                .ok_or_else(|| CodegenError::generation(format!("entry '{entry}' has no root")));
        }
        let root = self.driver.synthesize(entry)?;
        let graph = self.driver.graph();
        let mut retained = 0;
        for node in graph.nodes().iter().filter(|n| n.document == entry) {
            self.coordinator.retain(node.path.clone(), node.id);
            retained += 1;
        }
        debug!(entry, retained, "retained inner declarations");
        Ok(root)
    }

    /// Host signal: generate the entry.
    ///
    /// Returns the new descriptor set, or `None` if the entry was already
    /// done.
    ///
    /// # Errors
    /// Returns `CodegenError::Phase` on an out-of-order call and
    /// `CodegenError::Schema` if synthesis fails or a name cannot be
    /// allocated.
    pub fn generate(&mut self, entry: &str) -> Result<Option<&DescriptorSet>, CodegenError> {
        match self.coordinator.phase(entry) {
            Phase::Done => return Ok(None),
            Phase::Generating => {}
            from => {
                return Err(PhaseError::InvalidTransition {
                    path: entry.to_string(),
                    from,
                    to: Phase::Done,
                }
                .into());
            }
        }
        // No-op unless an earlier analysis failed.
        self.driver.synthesize(entry)?;
        let roots = self.driver.entry_types(entry);
        let set = AccessorEmitter::new(self.driver.graph(), self.driver.options())
            .with_interfaces(self.interfaces.clone())
            .emit(&roots)?;
        self.coordinator.on_type_generated(entry)?;
        self.outputs.insert(entry.to_string(), set);
        Ok(self.outputs.get(entry))
    }

    /// Runs every phase for one entry and returns its descriptors.
    ///
    /// Running a finished entry again returns the stored descriptors.
    ///
    /// # Errors
    /// Returns `CodegenError` if synthesis or emission fails.
    pub fn run(&mut self, entry: &str) -> Result<&DescriptorSet, CodegenError> {
        if self.visit(entry) {
            if self.coordinator.phase(entry) == Phase::Analyzing {
                self.analyze(entry)?;
            }
            self.generate(entry)?;
        }
        self.outputs
            .get(entry)
            .ok_or_else(|| CodegenError::generation(format!("entry '{entry}' was not generated")))
    }

    /// Runs every registered entry. A failing entry does not stop the rest.
    pub fn run_all(&mut self) -> Vec<(String, Result<(), CodegenError>)> {
        let names: Vec<String> = self.driver.document_names().map(str::to_string).collect();
        names
            .into_iter()
            .map(|name| {
                let result = self.run(&name).map(|_| ());
                if let Err(err) = &result {
                    warn!(entry = %name, error = %err, "entry failed");
                }
                (name, result)
            })
            .collect()
    }

    /// Returns the descriptors generated for an entry.
    #[must_use]
    pub fn descriptors(&self, entry: &str) -> Option<&DescriptorSet> {
        self.outputs.get(entry)
    }

    /// Returns the phase of an entry.
    #[must_use]
    pub fn phase(&self, entry: &str) -> Phase {
        self.coordinator.phase(entry)
    }

    /// Returns the driver.
    #[must_use]
    pub fn driver(&self) -> &SynthesisDriver {
        &self.driver
    }

    /// Returns the graph built so far.
    #[must_use]
    pub fn graph(&self) -> &TypeGraph {
        self.driver.graph()
    }

    /// Returns the coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &PhaseCoordinator {
        &self.coordinator
    }

    /// Returns the declared interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[InterfaceDecl] {
        &self.interfaces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = r#"{"properties": {"Name": {"type": "string"}}, "required": ["Name"]}"#;

    #[test]
    fn test_host_driven_phases() {
        let mut session = BuildSession::default();
        session.add_schema("Person", PERSON).unwrap();

        assert!(session.visit("Person"));
        let root = session.analyze("Person").unwrap();
        assert_eq!(session.phase("Person"), Phase::Generating);
        assert_eq!(session.coordinator().retained("Person"), Some(root));

        let set = session.generate("Person").unwrap().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(session.phase("Person"), Phase::Done);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let mut session = BuildSession::default();
        session.add_schema("Person", PERSON).unwrap();
        let first = session.run("Person").unwrap().clone();
        let slots = session.graph().len();

        assert!(!session.visit("Person"));
        assert_eq!(session.analyze("Person").unwrap(), first.iter().next().unwrap().id);
        assert!(session.generate("Person").unwrap().is_none());
        let second = session.run("Person").unwrap().clone();

        assert_eq!(session.graph().len(), slots);
        assert_eq!(second.len(), first.len());
        assert_eq!(
            second.by_name("Person").unwrap().accessors.len(),
            first.by_name("Person").unwrap().accessors.len()
        );
    }

    #[test]
    fn test_generate_before_analyze_fails() {
        let mut session = BuildSession::default();
        session.add_schema("Person", PERSON).unwrap();
        session.visit("Person");
        match session.generate("Person") {
            Err(CodegenError::Phase(PhaseError::InvalidTransition { from, to, .. })) => {
                assert_eq!(from, Phase::Analyzing);
                assert_eq!(to, Phase::Done);
            }
            other => panic!("expected phase error, got {other:?}"),
        }
    }

    #[test]
    fn test_run_all_continues_past_failures() {
        let mut session = BuildSession::default();
        session
            .add_schema("Broken", r##"{"properties": {"x": {"$ref": "#/definitions/Nope"}}}"##)
            .unwrap();
        session.add_schema("Person", PERSON).unwrap();

        let results = session.run_all();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Err(CodegenError::Schema(_))));
        assert!(results[1].1.is_ok());
        assert!(session.descriptors("Person").is_some());
        assert!(session.descriptors("Broken").is_none());
    }
}
