//! Single hardware counters.


use std::fs::File;
use std::io::Result;

use crate::config::attr::from;
use crate::config::{Opts, Target};
use crate::event::EventDesc;
use crate::ffi::bindings as b;
use crate::ffi::syscall::{close, ioctl, perf_event_open, read};

mod stat;

pub use stat::*;

/// An open counter the profiler can drive.
///
/// Every operation may fail independently of other handles.
pub trait Handle {
    /// Starts counting.
    fn enable(&self) -> Result<()>;

    /// Stops counting, the count is kept.
    fn disable(&self) -> Result<()>;

    /// Sets the count to zero.
    fn clear_count(&self) -> Result<()>;

    /// Reads the current count with its timings.
    fn stat(&self) -> Result<Stat>;

    /// Releases the underlying resource.
    ///
    /// The resource is released even when an error is returned.
    fn close(self) -> Result<()>;
}

/// Counter backed by a `perf_event_open` file descriptor.
///
/// Dropping the counter closes the descriptor silently,
/// use [`Handle::close`] to observe the error.
#[derive(Debug)]
pub struct Counter {
    target: Target,
    perf: File,
}

impl Counter {
    pub fn new(event: &EventDesc, target: impl Into<Target>, opts: &Opts) -> Result<Self> {
        let target = target.into();
        let attr = from(event, opts);
        let flags = b::PERF_FLAG_FD_CLOEXEC;
        let perf = perf_event_open(&attr, target.pid, target.cpu, -1, flags)?;

        Ok(Self { target, perf })
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn file(&self) -> &File {
        &self.perf
    }
}

impl Handle for Counter {
    fn enable(&self) -> Result<()> {
        ioctl(&self.perf, b::PERF_EVENT_IOC_ENABLE)?;
        Ok(())
    }

    fn disable(&self) -> Result<()> {
        ioctl(&self.perf, b::PERF_EVENT_IOC_DISABLE)?;
        Ok(())
    }

    fn clear_count(&self) -> Result<()> {
        ioctl(&self.perf, b::PERF_EVENT_IOC_RESET)?;
        Ok(())
    }

    fn stat(&self) -> Result<Stat> {
        let mut buf = [0; Stat::READ_SIZE];
        let len = read(&self.perf, &mut buf)?;
        Stat::from_bytes(&buf[..len])
    }

    fn close(self) -> Result<()> {
        close(self.perf)
    }
}
