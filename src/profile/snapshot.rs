use std::collections::BTreeMap;

use crate::event::raw::Stall;

/// Timings shared by all counters of a profile, in nanoseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    pub enabled: u64,
    pub running: u64,
}

/// Readings of one [`profile`][super::RawProfiler::profile] pass.
///
/// A `None` field means the counter of that event did not produce a value
/// in this pass, either because it never opened or because its read failed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawProfile {
    /// Taken from the first counter read successfully.
    pub timing: Option<Timing>,
    pub int_misc_recovery_cycles_any: Option<u64>,
    pub cycle_activity_stalls_l2_miss: Option<u64>,
    pub cycle_activity_stalls_l3_miss: Option<u64>,
    pub cycle_activity_stalls_l1d_miss: Option<u64>,
    pub cycle_activity_stalls_mem_any: Option<u64>,
    /// Events of custom catalogs that are not a [`Stall`].
    pub extra: BTreeMap<String, u64>,
}

impl RawProfile {
    fn stall_mut(&mut self, stall: Stall) -> &mut Option<u64> {
        match stall {
            Stall::RecoveryCyclesAny => &mut self.int_misc_recovery_cycles_any,
            Stall::L2Miss => &mut self.cycle_activity_stalls_l2_miss,
            Stall::L3Miss => &mut self.cycle_activity_stalls_l3_miss,
            Stall::L1dMiss => &mut self.cycle_activity_stalls_l1d_miss,
            Stall::MemAny => &mut self.cycle_activity_stalls_mem_any,
        }
    }

    pub fn stall(&self, stall: Stall) -> Option<u64> {
        match stall {
            Stall::RecoveryCyclesAny => self.int_misc_recovery_cycles_any,
            Stall::L2Miss => self.cycle_activity_stalls_l2_miss,
            Stall::L3Miss => self.cycle_activity_stalls_l3_miss,
            Stall::L1dMiss => self.cycle_activity_stalls_l1d_miss,
            Stall::MemAny => self.cycle_activity_stalls_mem_any,
        }
    }

    /// Value of the event named `name`.
    pub fn get(&self, name: &str) -> Option<u64> {
        match Stall::from_name(name) {
            Some(stall) => self.stall(stall),
            None => self.extra.get(name).copied(),
        }
    }

    /// Populated values by event name, stalls first.
    pub fn values(&self) -> impl Iterator<Item = (&str, u64)> {
        let stalls = Stall::ALL
            .into_iter()
            .filter_map(|it| self.stall(it).map(|val| (it.name(), val)));
        let extra = self.extra.iter().map(|(name, val)| (name.as_str(), *val));
        stalls.chain(extra)
    }

    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.values().next().is_none()
    }

    pub(crate) fn record(&mut self, slot: &Field, count: u64) {
        match slot {
            Field::Stall(stall) => *self.stall_mut(*stall) = Some(count),
            Field::Extra(name) => {
                self.extra.insert(name.clone(), count);
            }
        }
    }
}

/// Where the reading of a counter goes, fixed when the counter is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    Stall(Stall),
    Extra(String),
}

impl Field {
    pub(crate) fn of(name: &str) -> Self {
        match Stall::from_name(name) {
            Some(stall) => Field::Stall(stall),
            None => Field::Extra(name.to_string()),
        }
    }
}
