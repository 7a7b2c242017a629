use std::ffi::CString;
use std::ptr::null_mut;

use super::Backend;
use crate::error::{Error, Result};
use crate::ffi::pfm::{
    pfm_get_os_event_encoding, pfm_initialize, pfm_perf_encode_arg_t, PFM_ERR_INVAL,
    PFM_OS_PERF_EVENT_EXT, PFM_PLM3, PFM_SUCCESS,
};
use crate::ffi::Attr;

/// Backend for CPU-model specific event names known to libpfm4,
/// such as `INST_RETIRED:ANY_P` or `MEM_LOAD_RETIRED:L3_MISS`.
///
/// `pfm_initialize` is not safe to call more than once, always use
/// this backend through a [`Resolver`][super::Resolver] (e.g. [`PFM`][super::PFM]).
#[derive(Clone, Copy, Debug, Default)]
pub struct Pfm;

impl Backend for Pfm {
    fn initialize(&self) -> bool {
        unsafe { pfm_initialize() == PFM_SUCCESS }
    }

    fn encode(&self, name: &str, attr: &mut Attr) -> Result<()> {
        let not_found = |code| Error::EventNotFound {
            name: name.to_owned(),
            code,
        };
        let name_c = CString::new(name).map_err(|_| not_found(PFM_ERR_INVAL))?;

        let mut arg = pfm_perf_encode_arg_t {
            attr: attr as *mut Attr,
            fstr: null_mut(),
            size: size_of::<pfm_perf_encode_arg_t>(),
            idx: 0,
            cpu: 0,
            flags: 0,
            pad0: 0,
        };

        // libpfm only writes through `arg.attr` during this call.
        let ret = unsafe {
            pfm_get_os_event_encoding(name_c.as_ptr(), PFM_PLM3, PFM_OS_PERF_EVENT_EXT, &mut arg)
        };
        if ret != PFM_SUCCESS {
            return Err(not_found(ret));
        }

        Ok(())
    }
}
