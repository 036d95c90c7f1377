//! Event descriptors and the catalog the profiler opens counters from.


mod catalog;
pub mod raw;

use std::fs::File;
use std::io::{Error, Read, Result};
use std::path::Path;

pub use catalog::*;

use crate::ffi::bindings as b;

/// Counter family of an event, the `type` field of `perf_event_attr`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Kind {
    /// Generalized hardware event.
    Hardware,
    /// Kernel software event.
    Software,
    /// Generalized hardware cache event.
    HwCache,
    /// Implementation-specific event selected by an opaque raw config.
    Raw,
    /// Event of a dynamic PMU, carrying the type number the kernel assigned to it.
    ///
    /// Use [`Kind::from_pmu`] to look the number up.
    Dynamic(u32),
}

impl Kind {
    pub fn ty(self) -> u32 {
        match self {
            Kind::Hardware => b::PERF_TYPE_HARDWARE,
            Kind::Software => b::PERF_TYPE_SOFTWARE,
            Kind::HwCache => b::PERF_TYPE_HW_CACHE,
            Kind::Raw => b::PERF_TYPE_RAW,
            Kind::Dynamic(ty) => ty,
        }
    }

    /// Reads the type number of the PMU instance named `pmu`.
    ///
    /// There is a subdirectory per PMU instance under `/sys/bus/event_source/devices`,
    /// each with a `type` file holding the number, e.g. `cpu` is usually 4.
    pub fn from_pmu(pmu: &str) -> Result<Self> {
        let path = Path::new("/sys/bus/event_source/devices")
            .join(pmu)
            .join("type");
        read_type(path).map(Kind::Dynamic)
    }
}

fn read_type<P>(path: P) -> Result<u32>
where
    P: AsRef<Path>,
{
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;
    content.trim_end().parse::<u32>().map_err(Error::other)
}

/// A named event: what to count and the name its reading is reported under.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventDesc {
    /// Human-readable identifier, unique within a catalog.
    pub name: String,
    /// Counter family.
    pub kind: Kind,
    /// Type-specific selector, unique within a catalog.
    pub config: u64,
}

impl EventDesc {
    pub fn new(name: impl Into<String>, kind: Kind, config: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            config,
        }
    }

    pub fn raw(name: impl Into<String>, config: u64) -> Self {
        Self::new(name, Kind::Raw, config)
    }
}
