use super::EventId;
use crate::ffi::bindings as b;

/// A "raw" implementation-specific event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Raw {
    /// Event config, the model specific event code (e.g. event select and umask on x86).
    pub config: u64,
}

super::into_id!(Raw, value, EventId::new(b::PERF_TYPE_RAW, value.config));
