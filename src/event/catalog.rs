use std::collections::{HashMap, HashSet};
#[cfg(feature = "serde")]
use std::io::Read;

use thiserror::Error;

use super::raw::Stall;
use super::EventDesc;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate event name `{0}`")]
    DuplicateName(String),
    #[error("events `{first}` and `{second}` share config {config:#x}")]
    DuplicateConfig {
        config: u64,
        first: String,
        second: String,
    },
    #[cfg(feature = "serde")]
    #[error("invalid catalog descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered list of events with unique names and unique configs.
///
/// Counters are keyed by config and readings are reported by name,
/// so both must identify one event.
///
/// Configs must be unique across kinds too: `Kind::Software` config 1
/// (task clock) and `Kind::Hardware` config 1 (instructions) cannot share
/// a catalog, the second is rejected with [`CatalogError::DuplicateConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<EventDesc>", into = "Vec<EventDesc>"))]
pub struct Catalog {
    events: Vec<EventDesc>,
}

impl Catalog {
    pub fn new(events: Vec<EventDesc>) -> Result<Self, CatalogError> {
        let mut names = HashSet::with_capacity(events.len());
        let mut configs = HashMap::with_capacity(events.len());

        for event in &events {
            if !names.insert(event.name.as_str()) {
                return Err(CatalogError::DuplicateName(event.name.clone()));
            }
            if let Some(first) = configs.insert(event.config, event.name.as_str()) {
                return Err(CatalogError::DuplicateConfig {
                    config: event.config,
                    first: first.to_string(),
                    second: event.name.clone(),
                });
            }
        }

        Ok(Self { events })
    }

    /// Parses a JSON array of [`EventDesc`].
    ///
    /// ```json
    /// [
    ///     { "name": "CYCLE_ACTIVITY.STALLS_L2_MISS", "kind": "raw", "config": 83887523 },
    ///     { "name": "uncore_imc_0/cas_count_read", "kind": { "dynamic": 16 }, "config": 772 }
    /// ]
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let events: Vec<EventDesc> = serde_json::from_str(json)?;
        Self::new(events)
    }

    #[cfg(feature = "serde")]
    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let events: Vec<EventDesc> = serde_json::from_reader(reader)?;
        Self::new(events)
    }

    pub fn events(&self) -> &[EventDesc] {
        &self.events
    }

    pub fn get(&self, name: &str) -> Option<&EventDesc> {
        self.events.iter().find(|it| it.name == name)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// The stall events of [`Stall::ALL`], all raw.
impl Default for Catalog {
    fn default() -> Self {
        Self {
            events: Stall::ALL.into_iter().map(Stall::desc).collect(),
        }
    }
}

impl TryFrom<Vec<EventDesc>> for Catalog {
    type Error = CatalogError;

    fn try_from(value: Vec<EventDesc>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Catalog> for Vec<EventDesc> {
    fn from(value: Catalog) -> Self {
        value.events
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a EventDesc;
    type IntoIter = std::slice::Iter<'a, EventDesc>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
