use super::EventId;
use crate::ffi::bindings as b;

/// Tracepoint event provided by the kernel tracepoint infrastructure.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tracepoint {
    /// Tracepoint ID from under debugfs `tracing/events/*/*/id` if ftrace is enabled in the kernel.
    pub id: u64,
}

super::into_id!(Tracepoint, value, EventId::new(b::PERF_TYPE_TRACEPOINT, value.id));
