#[cfg(test)]
mod test;

pub mod bindings;
#[cfg(feature = "libpfm")]
pub mod pfm;
#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod linux_syscall;

macro_rules! syscall {
    ($syscall:ident, $($arg:expr),* $(,)?) => {{
        #[cfg(any(target_os = "linux", target_os = "android"))]
        let val = $crate::ffi::linux_syscall::$syscall($($arg),*);
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        let val = {
            $(let _ = $arg;)*
            Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
        };
        val
    }};
}
pub(crate) use syscall;

/// Raw `sysconf(_SC_PAGESIZE)`, non-positive values mean the query failed.
pub fn raw_page_size() -> i64 {
    syscall!(sysconf, libc::_SC_PAGESIZE).unwrap_or(-1)
}

pub type Attr = bindings::perf_event_attr;
pub type Metadata = bindings::perf_event_mmap_page;
