use std::fmt::{self, Display, Formatter};
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The profiler holds no counter, every open failed or the profiler was closed.
    #[error("no profiler configured")]
    NoProfiler,
    /// Some counters failed, see [`Failures`] for which.
    #[error(transparent)]
    Counters(#[from] Failures),
}

/// Operation a counter failed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Open,
    Start,
    Stop,
    Reset,
    Read,
    Close,
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let op = match self {
            Op::Open => "open",
            Op::Start => "start",
            Op::Stop => "stop",
            Op::Reset => "reset",
            Op::Read => "read",
            Op::Close => "close",
        };
        f.write_str(op)
    }
}

#[derive(Debug, Error)]
#[error("failed to {op} `{event}`: {source}")]
pub struct Failure {
    /// Name of the event whose counter failed.
    pub event: String,
    pub op: Op,
    pub source: io::Error,
}

/// Failures collected from one pass over the counters.
///
/// Empty means every counter succeeded.
#[derive(Debug, Default)]
pub struct Failures(Vec<Failure>);

impl Failures {
    pub(crate) fn push(&mut self, event: &str, op: Op, source: io::Error) {
        self.0.push(Failure {
            event: event.to_string(),
            op,
            source,
        });
    }

    pub(crate) fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Counters(self))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Failure> {
        self.0.iter()
    }

    /// Names of the failed events, in the order they failed.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|it| it.event.as_str())
    }

    pub fn contains(&self, event: &str) -> bool {
        self.events().any(|it| it == event)
    }
}

impl Display for Failures {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no failures");
        }
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            Display::fmt(failure, f)?;
        }
        Ok(())
    }
}

impl std::error::Error for Failures {}

impl IntoIterator for Failures {
    type Item = Failure;
    type IntoIter = std::vec::IntoIter<Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Failures {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
