//! Options forwarded to every counter the profiler opens.

pub(crate) mod attr;
mod target;

pub use target::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Opts {
    pub exclude: Priv,

    /// New child tasks of the monitored process will inherit the counter.
    ///
    /// This applies only to new children, not to any existing children at the time
    /// the counter is created (nor to any new children of existing children).
    pub inherit: bool,

    /// The counter must always be on the PMU if at all possible.
    ///
    /// A pinned counter that cannot be put onto the PMU goes into an error state,
    /// where reads return end-of-file until it is re-enabled.
    pub pin_on_pmu: bool,

    /// The counter must be the only group on the PMU when it is scheduled.
    pub only_group: bool,

    /// Enable the counter automatically on the next `execve` of the monitored process.
    pub enable_on_exec: bool,

    /// Start counting as soon as the counter is opened.
    ///
    /// Counters are opened disabled by default and wait for
    /// [`RawProfiler::start`][crate::profile::RawProfiler::start].
    pub enable: bool,
}

/// Privilege levels to exclude from counting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Priv {
    /// User space.
    pub user: bool,

    /// Kernel space.
    pub kernel: bool,

    /// Hypervisor.
    pub hv: bool,

    /// Host mode.
    pub host: bool,

    /// Guest mode.
    pub guest: bool,

    /// Idle task.
    pub idle: bool,
}
