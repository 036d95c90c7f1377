#![allow(dead_code, non_camel_case_types)]

// Subset of `include/uapi/linux/perf_event.h` used by this crate:
// https://github.com/torvalds/linux/blob/v6.13/include/uapi/linux/perf_event.h

pub const PERF_TYPE_HARDWARE: u32 = 0;
pub const PERF_TYPE_SOFTWARE: u32 = 1;
pub const PERF_TYPE_HW_CACHE: u32 = 3;
pub const PERF_TYPE_RAW: u32 = 4;

pub const PERF_FORMAT_TOTAL_TIME_ENABLED: u64 = 1 << 0;
pub const PERF_FORMAT_TOTAL_TIME_RUNNING: u64 = 1 << 1;

pub const PERF_FLAG_FD_CLOEXEC: u64 = 1 << 3;

pub const PERF_ATTR_SIZE_VER1: u32 = 72;

// Bit positions inside the `perf_event_attr` flag word.
pub const ATTR_DISABLED: u64 = 1 << 0;
pub const ATTR_INHERIT: u64 = 1 << 1;
pub const ATTR_PINNED: u64 = 1 << 2;
pub const ATTR_EXCLUSIVE: u64 = 1 << 3;
pub const ATTR_EXCLUDE_USER: u64 = 1 << 4;
pub const ATTR_EXCLUDE_KERNEL: u64 = 1 << 5;
pub const ATTR_EXCLUDE_HV: u64 = 1 << 6;
pub const ATTR_EXCLUDE_IDLE: u64 = 1 << 7;
pub const ATTR_ENABLE_ON_EXEC: u64 = 1 << 12;
pub const ATTR_EXCLUDE_HOST: u64 = 1 << 19;
pub const ATTR_EXCLUDE_GUEST: u64 = 1 << 20;

/// `struct perf_event_attr` up to `PERF_ATTR_SIZE_VER1`.
///
/// The kernel accepts any published size, so the trailing fields added by
/// later versions are left out.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct perf_event_attr {
    pub type_: u32,
    pub size: u32,
    pub config: u64,
    pub sample_period: u64,
    pub sample_type: u64,
    pub read_format: u64,
    pub flags: u64,
    pub wakeup_events: u32,
    pub bp_type: u32,
    pub config1: u64,
    pub config2: u64,
}

const _: () = assert!(size_of::<perf_event_attr>() == PERF_ATTR_SIZE_VER1 as usize);

// `_IO('$', nr)`, the direction bits of `_IOC_NONE` differ per arch:
// https://github.com/torvalds/linux/blob/v6.13/include/uapi/asm-generic/ioctl.h
#[cfg(any(
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc64"
))]
const IOC_NONE: u64 = 1 << 29;
#[cfg(not(any(
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc64"
)))]
const IOC_NONE: u64 = 0;

const fn io(nr: u64) -> u64 {
    IOC_NONE | ((b'$' as u64) << 8) | nr
}

pub const PERF_EVENT_IOC_ENABLE: u64 = io(0);
pub const PERF_EVENT_IOC_DISABLE: u64 = io(1);
pub const PERF_EVENT_IOC_RESET: u64 = io(3);
