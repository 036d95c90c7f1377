//! Aggregation of a catalog of counters into one profile.

#[cfg(test)]
mod test;

mod error;
mod snapshot;

use std::collections::BTreeMap;
use std::io;
use std::mem;

pub use error::*;
pub use snapshot::*;
use snapshot::Field;
use tracing::{debug, warn};

use crate::config::{Opts, Target};
use crate::count::{Counter, Handle};
use crate::event::{Catalog, EventDesc};

struct Slot<H> {
    event: EventDesc,
    field: Field,
    handle: H,
}

/// Counters of a catalog, driven together.
///
/// Counters that failed to open are left out for the lifetime of the profiler,
/// every operation works on the remaining ones. A failure of one counter never
/// keeps the others from being called, failures are collected into [`Failures`].
///
/// # Examples
///
/// ```rust,no_run
/// use perf_raw_profiler::config::{Cpu, Opts, Proc};
/// use perf_raw_profiler::profile::RawProfiler;
///
/// let target = (Proc::CURRENT, Cpu::ALL);
/// let (mut profiler, failures) = RawProfiler::new(target, &Opts::default());
/// if !failures.is_empty() {
///     eprintln!("some counters are unavailable: {}", failures);
/// }
///
/// profiler.start().unwrap();
/// std::hint::black_box((0..1_000_000).sum::<u64>());
/// profiler.stop().unwrap();
///
/// let (profile, _) = profiler.profile().unwrap();
/// println!("L3 miss stalls: {:?}", profile.cycle_activity_stalls_l3_miss);
///
/// profiler.close().unwrap();
/// ```
pub struct RawProfiler<H = Counter> {
    // Keyed by config, which the catalog guarantees to be unique.
    slots: BTreeMap<u64, Slot<H>>,
}

impl RawProfiler<Counter> {
    /// Opens the counters of the [default catalog][Catalog::default].
    pub fn new(target: impl Into<Target>, opts: &Opts) -> (Self, Failures) {
        Self::with_catalog(&Catalog::default(), target, opts)
    }

    pub fn with_catalog(
        catalog: &Catalog,
        target: impl Into<Target>,
        opts: &Opts,
    ) -> (Self, Failures) {
        Self::open_with(catalog, target, opts, |event, target, opts| {
            Counter::new(event, *target, opts)
        })
    }
}

impl<H: Handle> RawProfiler<H> {
    /// Opens one handle per catalog event with `open`.
    ///
    /// Every event is attempted regardless of earlier failures. The profiler is
    /// returned even if nothing opened, together with the failures of this pass.
    pub fn open_with<F>(
        catalog: &Catalog,
        target: impl Into<Target>,
        opts: &Opts,
        mut open: F,
    ) -> (Self, Failures)
    where
        F: FnMut(&EventDesc, &Target, &Opts) -> io::Result<H>,
    {
        let target = target.into();
        let mut slots = BTreeMap::new();
        let mut failures = Failures::default();

        for event in catalog {
            match open(event, &target, opts) {
                Ok(handle) => {
                    debug!(event = %event.name, config = event.config, "counter opened");
                    let slot = Slot {
                        field: Field::of(&event.name),
                        event: event.clone(),
                        handle,
                    };
                    slots.insert(event.config, slot);
                }
                Err(e) => {
                    warn!(event = %event.name, config = event.config, error = %e, "failed to open counter");
                    failures.push(&event.name, Op::Open, e);
                }
            }
        }

        (Self { slots }, failures)
    }

    /// Number of counters held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Events of the held counters, ordered by config.
    pub fn events(&self) -> impl Iterator<Item = &EventDesc> {
        self.slots.values().map(|it| &it.event)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.events().any(|it| it.name == name)
    }

    fn fan_out<F>(&self, op: Op, f: F) -> Result<(), Error>
    where
        F: Fn(&H) -> io::Result<()>,
    {
        let mut failures = Failures::default();
        for slot in self.slots.values() {
            if let Err(e) = f(&slot.handle) {
                debug!(event = %slot.event.name, %op, error = %e, "counter failed");
                failures.push(&slot.event.name, op, e);
            }
        }
        failures.into_result()
    }

    /// Enables all counters.
    ///
    /// Fails with [`Error::NoProfiler`] without doing anything if no counter is held.
    pub fn start(&self) -> Result<(), Error> {
        if self.slots.is_empty() {
            return Err(Error::NoProfiler);
        }
        self.fan_out(Op::Start, H::enable)
    }

    /// Clears the counts of all counters.
    pub fn reset(&self) -> Result<(), Error> {
        self.fan_out(Op::Reset, H::clear_count)
    }

    /// Disables all counters.
    pub fn stop(&self) -> Result<(), Error> {
        self.fan_out(Op::Stop, H::disable)
    }

    /// Closes all counters.
    ///
    /// Every counter is released, including those whose close failed, so the
    /// profiler holds nothing afterwards: closing again is a no-op and
    /// [`start`][Self::start] fails with [`Error::NoProfiler`].
    pub fn close(&mut self) -> Result<(), Error> {
        let mut failures = Failures::default();
        for slot in mem::take(&mut self.slots).into_values() {
            let Slot { event, handle, .. } = slot;
            if let Err(e) = handle.close() {
                debug!(event = %event.name, error = %e, "counter failed to close");
                failures.push(&event.name, Op::Close, e);
            }
        }
        failures.into_result()
    }

    /// Reads all counters into one profile.
    ///
    /// Returns the profile with the failures of the counters that were not read,
    /// or [`Error::Counters`] if no counter was read at all.
    ///
    /// A profiler holding no counter, because every open failed or it was
    /// closed, fails with [`Error::NoProfiler`] instead.
    pub fn profile(&self) -> Result<(RawProfile, Failures), Error> {
        if self.slots.is_empty() {
            return Err(Error::NoProfiler);
        }

        let mut profile = RawProfile::default();
        let mut failures = Failures::default();

        for slot in self.slots.values() {
            let stat = match slot.handle.stat() {
                Ok(stat) => stat,
                Err(e) => {
                    debug!(event = %slot.event.name, error = %e, "counter failed to read");
                    failures.push(&slot.event.name, Op::Read, e);
                    continue;
                }
            };

            let timing = Timing {
                enabled: stat.time_enabled,
                running: stat.time_running,
            };
            match profile.timing {
                None => profile.timing = Some(timing),
                Some(first) if first != timing => debug!(
                    event = %slot.event.name,
                    ?first,
                    ?timing,
                    "counter timing differs from profile timing"
                ),
                Some(_) => (),
            }

            profile.record(&slot.field, stat.count);
        }

        if failures.len() == self.slots.len() {
            return Err(Error::Counters(failures));
        }
        Ok((profile, failures))
    }
}
