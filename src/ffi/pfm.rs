#![allow(non_camel_case_types)]

// Subset of libpfm4 `perfmon/pfmlib.h` and `perfmon/pfmlib_perf_event.h`:
// https://sourceforge.net/p/perfmon2/libpfm4/ci/master/tree/include/perfmon/

use std::ffi::{c_char, c_int};

use super::Attr;

pub const PFM_SUCCESS: c_int = 0;
pub const PFM_ERR_INVAL: c_int = -2;

/// Privilege level 3, user space only.
pub const PFM_PLM3: c_int = 0x08;

// enum pfm_os_t { PFM_OS_NONE, PFM_OS_PERF_EVENT, PFM_OS_PERF_EVENT_EXT }
pub const PFM_OS_PERF_EVENT_EXT: c_int = 2;

// typedef struct {
//     struct perf_event_attr *attr;
//     char **fstr;
//     size_t size;
//     int idx;
//     int cpu;
//     int flags;
//     int pad0;
// } pfm_perf_encode_arg_t;
#[repr(C)]
pub struct pfm_perf_encode_arg_t {
    pub attr: *mut Attr,
    pub fstr: *mut *mut c_char,
    pub size: usize,
    pub idx: c_int,
    pub cpu: c_int,
    pub flags: c_int,
    pub pad0: c_int,
}

#[link(name = "pfm")]
extern "C" {
    pub fn pfm_initialize() -> c_int;

    pub fn pfm_get_os_event_encoding(
        name: *const c_char,
        dfl_plm: c_int,
        os: c_int,
        args: *mut pfm_perf_encode_arg_t,
    ) -> c_int;
}
