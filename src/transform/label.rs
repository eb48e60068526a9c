//! Sale-price value <-> class key mapping.
//!
//! Keys are dense `u32`s assigned in order of first occurrence in the
//! training rows. `-0.0` and `0.0` map to the same key.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Bijection between distinct label values and class keys.
///
/// Serialized as the plain list of values; the lookup index is rebuilt on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct LabelMap {
    values: Vec<f64>,
    index: HashMap<u64, u32>,
}

impl LabelMap {
    /// Build the map from training labels (missing labels must already be imputed).
    pub fn fit(labels: impl IntoIterator<Item = f64>) -> Self {
        let mut map = Self::default();
        for v in labels {
            map.insert(v);
        }
        map
    }

    /// Rebuild a map from its ordered values.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self::fit(values)
    }

    fn insert(&mut self, value: f64) {
        let bits = canonical_bits(value);
        if self.index.contains_key(&bits) {
            return;
        }
        let key = self.values.len() as u32;
        self.values.push(value + 0.0);
        self.index.insert(bits, key);
    }

    /// Key of a label value, if it was seen during fitting.
    pub fn key_of(&self, value: f64) -> Option<u32> {
        self.index.get(&canonical_bits(value)).copied()
    }

    /// Label value of a key.
    pub fn value_of(&self, key: u32) -> Option<f64> {
        self.values.get(key as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl From<Vec<f64>> for LabelMap {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

impl From<LabelMap> for Vec<f64> {
    fn from(map: LabelMap) -> Self {
        map.values
    }
}

fn canonical_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}
