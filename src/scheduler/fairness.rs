use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nombre de shifts attribués par nom d'employé sur une génération.
///
/// Local à un appel de `generate`, jamais partagé entre générations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FairnessCounter(BTreeMap<String, u32>);

impl FairnessCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &str) {
        *self.0.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, name: &str) -> u32 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|v| u64::from(*v)).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Écart entre le plus et le moins sollicité.
    pub fn spread(&self) -> u32 {
        let max = self.0.values().max().copied().unwrap_or(0);
        let min = self.0.values().min().copied().unwrap_or(0);
        max - min
    }
}
