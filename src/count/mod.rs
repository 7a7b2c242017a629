
mod status;

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::ptr::NonNull;

use log::{debug, trace};
pub use status::page_size;
use status::StatusPage;

use crate::error::{Error, Result};
use crate::event::{attr, EventId};
use crate::ffi::{bindings as b, raw_page_size, syscall, Attr, Metadata};
use crate::resolve::{Backend, Resolver};

/// Handle of a single counter measuring the calling thread on any CPU.
///
/// A counter owns its perf event fd and the read-only status page mapped
/// from it. Both are acquired together by the `open*` constructors and
/// released together by [`close`][Self::close] or on drop, a counter is
/// never observable with only one of them.
///
/// Counters are created disabled, call [`enable`][Self::enable] to start
/// counting. Counters opened without a group leader are pinned, i.e. they
/// are always scheduled on the PMU rather than multiplexed.
///
/// # Examples
///
/// ```rust
/// use perf_counter::count::Counter;
/// use perf_counter::event::sw::Software;
///
/// match Counter::open(Software::TaskClock, None) {
///     Ok(leader) => {
///         let member = Counter::open(Software::CtxSwitch, Some(&leader)).unwrap();
///
///         leader.enable().unwrap(); // Enables the whole group.
///         std::hint::black_box((0..1000).sum::<u64>());
///         leader.disable().unwrap();
///
///         drop(member);
///     }
///     Err(e) => eprintln!("perf events unavailable: {}", e),
/// }
/// ```
pub struct Counter {
    inner: Option<Inner>,
}

// Fields drop in declaration order: the status page is unmapped
// before the fd it was mapped from is closed.
struct Inner {
    status: StatusPage,
    perf: File,
}

impl Counter {
    /// Opens a counter for a typed event.
    pub fn open(event: impl Into<EventId>, leader: Option<&Counter>) -> Result<Self> {
        let attr = attr::from_id(event.into(), leader.is_some());
        Self::from_attr(&attr, leader)
    }

    /// Opens a counter by raw `perf_event_attr::type` and `config`.
    pub fn open_by_id(ty: u32, config: u64, leader: Option<&Counter>) -> Result<Self> {
        Self::open(EventId::new(ty, config), leader)
    }

    /// Opens a counter by symbolic event name.
    ///
    /// Names are resolved by [`PFM`][crate::resolve::PFM] with the `libpfm`
    /// feature, otherwise by [`GENERIC`][crate::resolve::GENERIC].
    pub fn open_by_name(name: &str, leader: Option<&Counter>) -> Result<Self> {
        #[cfg(feature = "libpfm")]
        let resolver = &crate::resolve::PFM;
        #[cfg(not(feature = "libpfm"))]
        let resolver = &crate::resolve::GENERIC;

        Self::open_by_name_with(resolver, name, leader)
    }

    /// Opens a counter by symbolic event name using a specific resolver.
    pub fn open_by_name_with<B>(
        resolver: &Resolver<B>,
        name: &str,
        leader: Option<&Counter>,
    ) -> Result<Self>
    where
        B: Backend,
    {
        let attr = resolver.attr(name, leader.is_some())?;
        Self::from_attr(&attr, leader)
    }

    pub(crate) fn from_attr(attr: &Attr, leader: Option<&Counter>) -> Result<Self> {
        Self::from_attr_with(attr, leader, raw_page_size)
    }

    pub(crate) fn from_attr_with<F>(
        attr: &Attr,
        leader: Option<&Counter>,
        page_size: F,
    ) -> Result<Self>
    where
        F: FnOnce() -> i64,
    {
        let group_fd = match leader {
            Some(leader) => match leader.file() {
                Some(file) => file.as_raw_fd(),
                None => {
                    debug!("group leader is closed");
                    return Err(Error::OpenFailed(ebadf()));
                }
            },
            None => -1,
        };

        // pid = 0, cpu = -1: the calling thread on any CPU.
        let perf = syscall!(perf_event_open, attr, 0, -1, group_fd, 0).map_err(|e| {
            debug!(
                "perf_event_open failed for type {} config {:#x}: {}",
                attr.type_, attr.config, e
            );
            Error::OpenFailed(e)
        })?;
        // `perf` is closed on drop if mapping fails.
        let status = StatusPage::with_page_size(&perf, page_size())?;

        trace!(
            "opened counter fd {} for type {} config {:#x}, status page of {} bytes",
            perf.as_raw_fd(),
            attr.type_,
            attr.config,
            status.len()
        );

        Ok(Self {
            inner: Some(Inner { status, perf }),
        })
    }

    /// Returns `true` until the counter is closed.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// The perf event fd, `None` once closed.
    pub fn file(&self) -> Option<&File> {
        self.inner.as_ref().map(|it| &it.perf)
    }

    /// The kernel-maintained status page, `None` once closed.
    ///
    /// The kernel updates the page concurrently, reads must follow the
    /// `lock` seqlock protocol described in `perf_event_mmap_page`.
    pub fn status_page(&self) -> Option<NonNull<Metadata>> {
        self.inner.as_ref().map(|it| it.status.as_ptr())
    }

    /// Starts counting.
    ///
    /// On a group leader this enables every counter in the group.
    pub fn enable(&self) -> Result<()> {
        self.group_ioctl(b::PERF_EVENT_IOC_ENABLE)
    }

    /// Stops counting.
    ///
    /// On a group leader this disables every counter in the group.
    pub fn disable(&self) -> Result<()> {
        self.group_ioctl(b::PERF_EVENT_IOC_DISABLE)
    }

    /// Returns the kernel's unique id of this counter.
    pub fn id(&self) -> Result<u64> {
        let perf = self.live()?;
        let mut id: u64 = 0;
        syscall!(ioctl_argp, perf, b::PERF_EVENT_IOC_ID, &mut id).map_err(Error::ControlFailed)?;
        Ok(id)
    }

    /// Releases the status page, then the fd.
    ///
    /// Closing an already closed counter does nothing. Every other
    /// operation on a closed counter fails.
    pub fn close(&mut self) {
        if let Some(inner) = self.inner.take() {
            let fd = inner.perf.as_raw_fd();
            drop(inner);
            trace!("closed counter fd {}", fd);
        }
    }

    fn live(&self) -> Result<&File> {
        self.file().ok_or_else(|| Error::ControlFailed(ebadf()))
    }

    fn group_ioctl(&self, op: u64) -> Result<()> {
        let perf = self.live()?;
        syscall!(ioctl_arg, perf, op, b::PERF_IOC_FLAG_GROUP as u64).map_err(|e| {
            debug!("ioctl {:#x} failed on fd {}: {}", op, perf.as_raw_fd(), e);
            Error::ControlFailed(e)
        })?;
        Ok(())
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        self.close();
    }
}

fn ebadf() -> io::Error {
    io::Error::from_raw_os_error(libc::EBADF)
}
