//! Build phase coordination.
//!
//! Each entry moves through `Idle -> Analyzing -> Generating -> Done`,
//! driven by direct calls from the host build. Synthesis may only run while
//! an entry is `Generating`, and a `Done` entry absorbs repeated signals.

use crate::error::PhaseError;
use jsonbind_schema::{TypeGraph, TypeId};
use std::collections::HashMap;
use tracing::{debug, info};

/// Inner declaration names every generated object may carry.
pub const API_INNER_TYPES: &[&str] = &["Builder", "Copier", "Proxy", "ProxyFactory"];

/// Lifecycle phase of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Not visited yet.
    #[default]
    Idle,
    /// Visited; the member set is being collected.
    Analyzing,
    /// Member set fixed; synthesis allowed.
    Generating,
    /// Generated.
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Generating => "generating",
            Self::Done => "done",
        })
    }
}

/// Per-entry lifecycle state plus declarations retained between passes.
#[derive(Debug, Default)]
pub struct PhaseCoordinator {
    phases: HashMap<String, Phase>,
    retained: HashMap<String, TypeId>,
}

impl PhaseCoordinator {
    /// Creates a coordinator with every entry idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the phase of an entry.
    #[must_use]
    pub fn phase(&self, path: &str) -> Phase {
        self.phases.get(path).copied().unwrap_or_default()
    }

    /// Returns true if synthesis may run for the entry.
    #[must_use]
    pub fn synthesis_allowed(&self, path: &str) -> bool {
        self.phase(path) == Phase::Generating
    }

    /// Records a visit. Returns true if work remains for the entry.
    pub fn on_entry_visited(&mut self, path: &str) -> bool {
        match self.phase(path) {
            Phase::Idle => {
                self.set(path, Phase::Analyzing);
                true
            }
            Phase::Analyzing | Phase::Generating => true,
            Phase::Done => false,
        }
    }

    /// Records that the entry's member set is fixed.
    ///
    /// Returns the new phase, or `None` if the entry is already done.
    ///
    /// # Errors
    /// Returns `PhaseError::InvalidTransition` unless the entry is analyzing
    /// or done.
    pub fn on_type_analyzed(&mut self, path: &str) -> Result<Option<Phase>, PhaseError> {
        match self.phase(path) {
            Phase::Analyzing => {
                self.set(path, Phase::Generating);
                Ok(Some(Phase::Generating))
            }
            Phase::Done => Ok(None),
            from => Err(invalid(path, from, Phase::Generating)),
        }
    }

    /// Records that the entry has been generated.
    ///
    /// Returns false if the entry was already done.
    ///
    /// # Errors
    /// Returns `PhaseError::InvalidTransition` unless the entry is generating
    /// or done.
    pub fn on_type_generated(&mut self, path: &str) -> Result<bool, PhaseError> {
        match self.phase(path) {
            Phase::Generating => {
                self.set(path, Phase::Done);
                info!(entry = path, "entry generated");
                Ok(true)
            }
            Phase::Done => Ok(false),
            from => Err(invalid(path, from, Phase::Done)),
        }
    }

    /// Retains an inner declaration under its fully qualified path.
    pub fn retain(&mut self, path: impl Into<String>, id: TypeId) {
        self.retained.insert(path.into(), id);
    }

    /// Returns a retained declaration.
    #[must_use]
    pub fn retained(&self, path: &str) -> Option<TypeId> {
        self.retained.get(path).copied()
    }

    /// Returns the number of retained declarations.
    #[must_use]
    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Returns true if `relative` names a type nested inside `top`.
    ///
    /// `relative` is a dot-separated chain of child names walked from `top`;
    /// the API inner names are always inner as a final segment.
    #[must_use]
    pub fn is_inner_type(&self, graph: &TypeGraph, top: &str, relative: &str) -> bool {
        let Some(mut current) = self.retained(top).or_else(|| graph.lookup_path(top)) else {
            return false;
        };
        let segments: Vec<&str> = relative.split('.').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return false;
        }
        for (i, segment) in segments.iter().enumerate() {
            if i + 1 == segments.len() && API_INNER_TYPES.contains(segment) {
                return true;
            }
            let child = graph
                .nullable_inner(current)
                .and_then(|inner| graph.find_child(inner, segment))
                .or_else(|| graph.find_child(current, segment));
            match child {
                Some(child) => current = child,
                None => return false,
            }
        }
        true
    }

    fn set(&mut self, path: &str, phase: Phase) {
        debug!(entry = path, %phase, "phase transition");
        self.phases.insert(path.to_string(), phase);
    }
}

fn invalid(path: &str, from: Phase, to: Phase) -> PhaseError {
    PhaseError::InvalidTransition {
        path: path.to_string(),
        from,
        to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbind_schema::SynthesisDriver;

    #[test]
    fn test_lifecycle() {
        let mut phases = PhaseCoordinator::new();
        assert_eq!(phases.phase("Person"), Phase::Idle);
        assert!(phases.on_entry_visited("Person"));
        assert_eq!(phases.phase("Person"), Phase::Analyzing);
        assert!(!phases.synthesis_allowed("Person"));

        assert_eq!(phases.on_type_analyzed("Person").unwrap(), Some(Phase::Generating));
        assert!(phases.synthesis_allowed("Person"));
        assert!(phases.on_entry_visited("Person"));

        assert!(phases.on_type_generated("Person").unwrap());
        assert_eq!(phases.phase("Person"), Phase::Done);
        assert!(!phases.on_entry_visited("Person"));
    }

    #[test]
    fn test_done_absorbs_repeated_signals() {
        let mut phases = PhaseCoordinator::new();
        phases.on_entry_visited("A");
        phases.on_type_analyzed("A").unwrap();
        phases.on_type_generated("A").unwrap();

        assert_eq!(phases.on_type_analyzed("A").unwrap(), None);
        assert!(!phases.on_type_generated("A").unwrap());
        assert_eq!(phases.phase("A"), Phase::Done);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut phases = PhaseCoordinator::new();
        assert_eq!(
            phases.on_type_analyzed("A"),
            Err(PhaseError::InvalidTransition {
                path: "A".to_string(),
                from: Phase::Idle,
                to: Phase::Generating,
            })
        );
        phases.on_entry_visited("A");
        assert!(phases.on_type_generated("A").is_err());
        phases.on_type_analyzed("A").unwrap();
        assert!(phases.on_type_analyzed("A").is_err());
    }

    #[test]
    fn test_retained_and_inner_types() {
        let mut driver = SynthesisDriver::new();
        driver
            .add_schema(
                "Person",
                r#"{"properties": {
                    "address": {"properties": {"city": {"type": "string"}}},
                    "hobby": {"type": ["object", "null"], "properties": {"name": {"type": "string"}}}}}"#,
            )
            .unwrap();
        let root = driver.synthesize("Person").unwrap();

        let mut phases = PhaseCoordinator::new();
        for node in driver.graph().nodes() {
            phases.retain(node.path.clone(), node.id);
        }
        assert_eq!(phases.retained("Person"), Some(root));
        assert_eq!(phases.retained_len(), driver.graph().len());

        let graph = driver.graph();
        assert!(phases.is_inner_type(graph, "Person", "Address"));
        assert!(phases.is_inner_type(graph, "Person", "address"));
        assert!(phases.is_inner_type(graph, "Person", "Hobby"));
        assert!(phases.is_inner_type(graph, "Person", "Builder"));
        assert!(phases.is_inner_type(graph, "Person", "Address.Copier"));
        assert!(!phases.is_inner_type(graph, "Person", "Missing"));
        assert!(!phases.is_inner_type(graph, "Person", "Missing.Builder"));
        assert!(!phases.is_inner_type(graph, "Nobody", "Address"));
    }
}
