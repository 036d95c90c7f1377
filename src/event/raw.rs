//! Raw stall events of Intel core PMUs (Skylake and later).
//!
//! Encodings are `cmask << 24 | umask << 8 | event`, see the Intel SDM
//! volume 3B, chapter "Performance Monitoring Events".

use super::EventDesc;

pub const INT_MISC_RECOVERY_CYCLES_ANY: u64 = 0x20010d;
pub const CYCLE_ACTIVITY_STALLS_L2_MISS: u64 = 0x50005a3;
pub const CYCLE_ACTIVITY_STALLS_L3_MISS: u64 = 0x60006a3;
pub const CYCLE_ACTIVITY_STALLS_L1D_MISS: u64 = 0xc000ca3;
pub const CYCLE_ACTIVITY_STALLS_MEM_ANY: u64 = 0x140014a3;

/// Events of the default catalog.
///
/// Each of them has a dedicated field in [`RawProfile`][crate::profile::RawProfile].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stall {
    /// Core cycles the allocator was stalled due to recovery from an earlier
    /// machine clear or branch mispredict, counted for any thread on the core.
    RecoveryCyclesAny,
    /// Execution stalls while an L2 cache miss demand load is outstanding.
    L2Miss,
    /// Execution stalls while an L3 cache miss demand load is outstanding.
    L3Miss,
    /// Execution stalls while an L1 data cache miss demand load is outstanding.
    L1dMiss,
    /// Execution stalls while a memory subsystem demand load is outstanding.
    MemAny,
}

impl Stall {
    pub const ALL: [Stall; 5] = [
        Stall::RecoveryCyclesAny,
        Stall::L2Miss,
        Stall::L3Miss,
        Stall::L1dMiss,
        Stall::MemAny,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Stall::RecoveryCyclesAny => "INT_MISC.RECOVERY_CYCLES_ANY",
            Stall::L2Miss => "CYCLE_ACTIVITY.STALLS_L2_MISS",
            Stall::L3Miss => "CYCLE_ACTIVITY.STALLS_L3_MISS",
            Stall::L1dMiss => "CYCLE_ACTIVITY.STALLS_L1D_MISS",
            Stall::MemAny => "CYCLE_ACTIVITY.STALLS_MEM_ANY",
        }
    }

    pub const fn config(self) -> u64 {
        match self {
            Stall::RecoveryCyclesAny => INT_MISC_RECOVERY_CYCLES_ANY,
            Stall::L2Miss => CYCLE_ACTIVITY_STALLS_L2_MISS,
            Stall::L3Miss => CYCLE_ACTIVITY_STALLS_L3_MISS,
            Stall::L1dMiss => CYCLE_ACTIVITY_STALLS_L1D_MISS,
            Stall::MemAny => CYCLE_ACTIVITY_STALLS_MEM_ANY,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|it| it.name() == name)
    }

    pub fn desc(self) -> EventDesc {
        EventDesc::raw(self.name(), self.config())
    }
}
