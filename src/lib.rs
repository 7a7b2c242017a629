//! Lifetime-safe handle for a single `perf_event_open` counter.
//!
//! A [`Counter`][count::Counter] pairs the perf event fd with the kernel's
//! read-only status page (`perf_event_mmap_page`) mapped from it. Both are
//! acquired together or not at all, and released together in the right order.
//!
//! Counters always measure the calling thread on any CPU, in user space only,
//! and are created disabled. A counter opened without a group leader is pinned.
//!
//! ## Example
//!
//! Open a counter by numeric type and config, or by a symbolic name:
//!
//! ```rust
//! use perf_counter::count::Counter;
//! use perf_counter::Error;
//!
//! // PERF_TYPE_SOFTWARE, PERF_COUNT_SW_TASK_CLOCK
//! let by_id = Counter::open_by_id(1, 1, None);
//! let by_name = Counter::open_by_name("task-clock", None);
//!
//! for counter in [by_id, by_name] {
//!     match counter {
//!         Ok(mut counter) => {
//!             counter.enable().unwrap();
//!             std::hint::black_box((0..1000).sum::<u64>());
//!             counter.disable().unwrap();
//!             counter.close();
//!             assert!(!counter.is_open());
//!         }
//!         // Perf events are unavailable in this environment, or the
//!         // name resolver (libpfm with its feature) does not know the name.
//!         Err(
//!             Error::OpenFailed(_)
//!             | Error::ResolutionUnavailable
//!             | Error::EventNotFound { .. },
//!         ) => (),
//!         Err(e) => panic!("{}", e),
//!     }
//! }
//! ```
//!
//! ## Symbolic names
//!
//! Without features, names are the kernel's generic events as spelled by
//! `perf list` (see [`Generic`][resolve::Generic]). With the `libpfm` feature,
//! names are resolved by libpfm4 instead, which knows the model specific
//! events of the host CPU. Either backend is initialized exactly once per
//! process, on first use.

pub mod count;
pub mod error;
pub mod event;
mod ffi;
pub mod resolve;

pub use error::{Error, Result};
pub use ffi::{Attr, Metadata};
