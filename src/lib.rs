//! Raw hardware stall counters of a process or CPU, read as one profile.
//!
//! A [`RawProfiler`][profile::RawProfiler] opens one `perf_event_open` counter
//! per event of a [`Catalog`][event::Catalog] and drives them together. Counters
//! the hardware or the kernel refuses are left out, the rest keep working.
//!
//! ## Example
//!
//! Measure how many cycles the (inefficient) fibonacci calculation stalls on
//! cache misses.
//!
//! ```rust,no_run
//! use perf_raw_profiler::config::{Cpu, Opts, Proc};
//! use perf_raw_profiler::event::raw::Stall;
//! use perf_raw_profiler::profile::RawProfiler;
//!
//! // Current process, all CPUs.
//! let target = (Proc::CURRENT, Cpu::ALL);
//!
//! let (mut profiler, failures) = RawProfiler::new(target, &Opts::default());
//! for failure in &failures {
//!     eprintln!("{}", failure);
//! }
//!
//! profiler.start().unwrap();
//! fn fib(n: usize) -> usize {
//!     match n {
//!         0 => 0,
//!         1 => 1,
//!         n => fib(n - 1) + fib(n - 2),
//!     }
//! }
//! std::hint::black_box(fib(30));
//! profiler.stop().unwrap();
//!
//! let (profile, _) = profiler.profile().unwrap();
//! for stall in Stall::ALL {
//!     println!("{}: {:?}", stall.name(), profile.stall(stall));
//! }
//!
//! profiler.close().unwrap();
//! ```
//!
//! ## Custom events
//!
//! Any event the kernel accepts can be profiled with a custom catalog, built in code
//! or, with the `serde` feature, loaded from JSON via [`Catalog::from_json`][event::Catalog].
//! Readings of events outside the default catalog are reported in
//! [`RawProfile::extra`][profile::RawProfile::extra].

#[cfg(not(any(target_os = "linux", target_os = "android")))]
compile_error!("`perf_event_open` syscall can only be used in linux or android target");

pub mod config;
pub mod count;
pub mod event;
mod ffi;
pub mod profile;
