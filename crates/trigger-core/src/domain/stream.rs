//! Release streams and their issue-tracker metadata.
//!
//! A stream is addressed by either its human label (`"EAP 7.4.x"`, as shown
//! in the UI) or its machine label (`"eap:7.4.x"`, as sent by automation).
//! Both forms resolve to the same [`StreamDefinition`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::error::{RegistryError, UnknownStreamError};

/// Issue-tracker metadata for one release stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDefinition {
    /// Label shown to people, e.g. `EAP 7.4.x`.
    pub human_label: String,

    /// Label used by automation, e.g. `eap:7.4.x`.
    pub machine_label: String,

    /// Prefix prepended to every issue summary, e.g. `(7.4.z)`.
    pub title_prefix: String,

    /// Tracker id of the target release.
    pub target_release: String,
}

impl StreamDefinition {
    pub fn new(
        human_label: &str,
        machine_label: &str,
        title_prefix: &str,
        target_release: &str,
    ) -> Self {
        Self {
            human_label: human_label.to_string(),
            machine_label: machine_label.to_string(),
            title_prefix: title_prefix.to_string(),
            target_release: target_release.to_string(),
        }
    }
}

/// The compiled-in stream table: (human, machine, title prefix, target release).
const BUILTIN_STREAMS: &[(&str, &str, &str, &str)] = &[
    ("EAP 7.3.x", "eap:7.3.x", "(7.3.z)", "12343254"),
    ("EAP 7.4.x", "eap:7.4.x", "(7.4.z)", "12354234"),
    ("EAP 8.0.x", "eap:8.0.x", "(8.0.z)", "12402757"),
    ("XP 4.0.x", "eap-xp:4.0.x", "(xp-4.0.z)", "12382923"),
    ("XP 5.0.x", "eap-xp:5.0.x", "(xp-5.0.z)", "12401140"),
];

static BUILTIN: OnceLock<StreamRegistry> = OnceLock::new();

/// Immutable lookup table from stream labels to definitions.
///
/// Every definition is indexed under both of its labels. The table is never
/// mutated after construction, so a registry can be shared freely between
/// concurrent triggers.
#[derive(Debug, Clone)]
pub struct StreamRegistry {
    definitions: Vec<StreamDefinition>,
    by_label: HashMap<String, usize>,
}

impl StreamRegistry {
    /// Build a registry from an ordered list of definitions.
    ///
    /// # Errors
    ///
    /// - `RegistryError::Empty`: no definitions were supplied.
    /// - `RegistryError::DuplicateLabel`: a label is used by two definitions
    ///   (or a definition's human and machine labels collide with another's).
    pub fn new(definitions: Vec<StreamDefinition>) -> Result<Self, RegistryError> {
        if definitions.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut by_label = HashMap::with_capacity(definitions.len() * 2);
        for (idx, def) in definitions.iter().enumerate() {
            for label in [&def.human_label, &def.machine_label] {
                match by_label.get(label) {
                    // A definition may use the same string for both labels.
                    Some(existing) if *existing == idx => {}
                    Some(_) => return Err(RegistryError::DuplicateLabel(label.clone())),
                    None => {
                        by_label.insert(label.clone(), idx);
                    }
                }
            }
        }

        Ok(Self {
            definitions,
            by_label,
        })
    }

    /// The process-wide compiled-in registry.
    pub fn builtin() -> &'static StreamRegistry {
        BUILTIN.get_or_init(|| StreamRegistry {
            by_label: BUILTIN_STREAMS
                .iter()
                .enumerate()
                .flat_map(|(idx, (human, machine, _, _))| {
                    [(human.to_string(), idx), (machine.to_string(), idx)]
                })
                .collect(),
            definitions: BUILTIN_STREAMS
                .iter()
                .map(|(human, machine, prefix, release)| {
                    StreamDefinition::new(human, machine, prefix, release)
                })
                .collect(),
        })
    }

    /// Load definitions from a JSON array on disk.
    pub fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Parse definitions from a JSON array.
    pub fn from_json_str(raw: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<StreamDefinition> = serde_json::from_str(raw)?;
        Self::new(definitions)
    }

    /// Resolve a human or machine label to its definition.
    ///
    /// Matching is exact and case-sensitive.
    pub fn resolve(&self, label: &str) -> Result<&StreamDefinition, UnknownStreamError> {
        match self.by_label.get(label) {
            Some(idx) => Ok(&self.definitions[*idx]),
            None => {
                error!(stream = %label, "Unknown stream");
                Err(UnknownStreamError {
                    label: label.to_string(),
                })
            }
        }
    }

    /// Machine label for either label form.
    pub fn canonical_label(&self, label: &str) -> Result<&str, UnknownStreamError> {
        self.resolve(label).map(|def| def.machine_label.as_str())
    }

    /// Number of registered streams.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StreamDefinition> {
        self.definitions.iter()
    }
}
