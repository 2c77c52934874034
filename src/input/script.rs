//! Scripted dot placement for repeatable sessions.
//!
//! A script file holds named scenarios. Each scenario is a list of batches and
//! each batch is a list of window positions:
//!
//! ```json
//! { "scenarios": { "downtown": [[[100, 100], [150, 120]], [[30, 40], [60, 80]]] } }
//! ```

use crate::{core::geo::PixelPoint, MapError, Result};
use serde::Deserialize;
use std::{
    collections::{BTreeMap, VecDeque},
    path::Path,
};

#[derive(Debug, Deserialize)]
struct ScriptFile {
    scenarios: BTreeMap<String, Vec<Vec<(i32, i32)>>>,
}

/// Queue of dot batches, one batch per trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct DotScript {
    scenario: String,
    batches: VecDeque<Vec<PixelPoint>>,
}

impl DotScript {
    pub fn new(
        scenario: impl Into<String>,
        batches: impl IntoIterator<Item = Vec<PixelPoint>>,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            batches: batches.into_iter().collect(),
        }
    }

    pub fn from_json_str(text: &str, scenario: &str) -> Result<Self> {
        let mut file: ScriptFile = serde_json::from_str(text)?;
        let batches = file.scenarios.remove(scenario).ok_or_else(|| {
            let known: Vec<_> = file.scenarios.keys().map(String::as_str).collect();
            MapError::Script(format!(
                "no scenario named '{}' (available: {})",
                scenario,
                known.join(", ")
            ))
        })?;

        Ok(Self::new(
            scenario,
            batches
                .into_iter()
                .map(|batch| batch.into_iter().map(PixelPoint::from).collect()),
        ))
    }

    pub fn from_json_file(path: impl AsRef<Path>, scenario: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let script = Self::from_json_str(&text, scenario)?;
        log::info!(
            "loaded scenario '{}' with {} batches from {}",
            scenario,
            script.remaining(),
            path.as_ref().display()
        );
        Ok(script)
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn remaining(&self) -> usize {
        self.batches.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn next_batch(&mut self) -> Option<Vec<PixelPoint>> {
        self.batches.pop_front()
    }
}
