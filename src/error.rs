use std::io;

use thiserror::Error;

/// Errors raised while opening or controlling a counter.
///
/// None of these are retried internally, every error is terminal
/// for the operation that raised it.
#[derive(Debug, Error)]
pub enum Error {
    /// `sysconf(_SC_PAGESIZE)` reported a non-positive value.
    #[error("page size unavailable (sysconf reported {0})")]
    PageSizeUnavailable(i64),

    /// The counter status page could not be mapped.
    #[error("failed to map counter status page")]
    MappingFailed(#[source] io::Error),

    /// `perf_event_open` rejected the attributes, the target or the caller's privileges.
    #[error("failed to open counter")]
    OpenFailed(#[source] io::Error),

    /// An enable, disable or id ioctl was rejected.
    #[error("counter control failed")]
    ControlFailed(#[source] io::Error),

    /// The symbolic name backend failed to initialize, this is permanent for the process.
    #[error("event name resolution is unavailable")]
    ResolutionUnavailable,

    /// The backend does not know the event name.
    #[error("event not found: {name} (code {code})")]
    EventNotFound { name: String, code: i32 },
}

pub type Result<T> = std::result::Result<T, Error>;
