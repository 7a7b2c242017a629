
pub(crate) mod attr;
pub mod hw;
pub mod raw;
pub mod sw;
pub mod tp;

/// Raw event identity as understood by `perf_event_open`.
///
/// `ty` is the `perf_event_attr::type` (e.g. `PERF_TYPE_HARDWARE`) and
/// `config` is the type-specific event code. Both are passed to the kernel
/// untouched, so dynamic PMU types read from
/// `/sys/bus/event_source/devices/*/type` work as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId {
    pub ty: u32,
    pub config: u64,
}

impl EventId {
    pub const fn new(ty: u32, config: u64) -> Self {
        Self { ty, config }
    }
}

macro_rules! into_id {
    ($ty:ty, $value:ident, $impl: expr) => {
        impl From<&$ty> for crate::event::EventId {
            fn from($value: &$ty) -> Self {
                $impl
            }
        }

        impl From<$ty> for crate::event::EventId {
            fn from(value: $ty) -> Self {
                (&value).into()
            }
        }
    };
}
use into_id;
