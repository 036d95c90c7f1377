use std::io::{Error, ErrorKind, Result};

use crate::ffi::{bindings as b, deref_offset};

/// One reading of a counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stat {
    pub count: u64,
    /// Total time the counter was enabled, in nanoseconds.
    pub time_enabled: u64,
    /// Total time the counter was actually on the PMU, in nanoseconds.
    ///
    /// Less than `time_enabled` when counters are multiplexed.
    pub time_running: u64,
}

impl Stat {
    // https://github.com/torvalds/linux/blob/v6.13/include/uapi/linux/perf_event.h#L344
    // struct read_format {
    //     u64 value;
    //     { u64 time_enabled; } && PERF_FORMAT_TOTAL_TIME_ENABLED
    //     { u64 time_running; } && PERF_FORMAT_TOTAL_TIME_RUNNING
    // };
    pub(crate) const READ_FORMAT: u64 =
        b::PERF_FORMAT_TOTAL_TIME_ENABLED | b::PERF_FORMAT_TOTAL_TIME_RUNNING;
    pub(crate) const READ_SIZE: usize = 3 * size_of::<u64>();

    /// Decodes the bytes read from a counter opened with [`Self::READ_FORMAT`].
    pub(crate) fn from_bytes(buf: &[u8]) -> Result<Self> {
        // A pinned counter in error state reads as end-of-file.
        if buf.is_empty() {
            return Err(ErrorKind::UnexpectedEof.into());
        }
        if buf.len() < Self::READ_SIZE {
            let msg = format!("short counter read: {} bytes", buf.len());
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }

        let mut ptr = buf.as_ptr();
        // The length is checked above.
        unsafe {
            Ok(Self {
                count: deref_offset(&mut ptr),
                time_enabled: deref_offset(&mut ptr),
                time_running: deref_offset(&mut ptr),
            })
        }
    }
}
