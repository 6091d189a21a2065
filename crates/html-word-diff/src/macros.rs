// Tracing macros for html-word-diff
//
// Forward to tracing when the `tracing` feature is enabled or in tests, and
// compile to nothing otherwise. Events emitted through them:
// - trace: word counts per tokenized input, matcher granularity, each planned
//   change range, dropped orphan matches, unpaired formatting closers
// - debug: diff sizes, matching block and orphan counts, edit script length,
//   loaded configs, formatting tags left open after rendering

#[cfg(any(test, feature = "tracing"))]
macro_rules! trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) }
}

#[cfg(not(any(test, feature = "tracing")))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(any(test, feature = "tracing"))]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) }
}

#[cfg(not(any(test, feature = "tracing")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub(crate) use debug;
pub(crate) use trace;
