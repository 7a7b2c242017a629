use std::fs::File;
use std::ptr::{null_mut, NonNull};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::ffi::{raw_page_size, syscall, Metadata};

/// Returns the memory page size of the host.
pub fn page_size() -> Result<usize> {
    checked_page_size(raw_page_size())
}

pub(crate) fn checked_page_size(raw: i64) -> Result<usize> {
    if raw < 1 {
        debug!("sysconf(_SC_PAGESIZE) reported {}", raw);
        return Err(Error::PageSizeUnavailable(raw));
    }
    Ok(raw as _)
}

/// The read-only `perf_event_mmap_page` of a counter.
///
/// Unmapped on drop with the exact length it was mapped with.
pub(crate) struct StatusPage {
    ptr: NonNull<Metadata>,
    len: usize,
}

// The mapping is read-only for user space and only the kernel writes to it.
unsafe impl Send for StatusPage {}
unsafe impl Sync for StatusPage {}

impl StatusPage {
    pub fn with_page_size(file: &File, raw_page_size: i64) -> Result<Self> {
        let len = checked_page_size(raw_page_size)?;

        let prot = libc::PROT_READ;
        // https://github.com/torvalds/linux/blob/v6.13/kernel/events/core.c#L6582
        let flags = libc::MAP_SHARED;
        let ptr = unsafe { syscall!(mmap, null_mut::<()>(), len, prot, flags, file, 0) }
            .map_err(|e| {
                debug!("failed to map counter status page: {}", e);
                Error::MappingFailed(e)
            })?;

        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self { ptr, len }),
            // Only possible with `MAP_FIXED`, which we never pass.
            None => Err(Error::MappingFailed(std::io::Error::other("null mapping"))),
        }
    }

    pub fn as_ptr(&self) -> NonNull<Metadata> {
        self.ptr
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl Drop for StatusPage {
    fn drop(&mut self) {
        if let Err(e) = unsafe { syscall!(munmap, self.ptr.as_ptr(), self.len) } {
            warn!("failed to unmap counter status page: {}", e);
        }
    }
}
