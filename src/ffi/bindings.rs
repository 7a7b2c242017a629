#![allow(non_camel_case_types)]

// Subset of `include/uapi/linux/perf_event.h` used by this crate:
// https://github.com/torvalds/linux/blob/v6.13/include/uapi/linux/perf_event.h

pub const PERF_TYPE_HARDWARE: u32 = 0;
pub const PERF_TYPE_SOFTWARE: u32 = 1;
pub const PERF_TYPE_TRACEPOINT: u32 = 2;
pub const PERF_TYPE_HW_CACHE: u32 = 3;
pub const PERF_TYPE_RAW: u32 = 4;

pub const PERF_COUNT_HW_CPU_CYCLES: u64 = 0;
pub const PERF_COUNT_HW_INSTRUCTIONS: u64 = 1;
pub const PERF_COUNT_HW_CACHE_REFERENCES: u64 = 2;
pub const PERF_COUNT_HW_CACHE_MISSES: u64 = 3;
pub const PERF_COUNT_HW_BRANCH_INSTRUCTIONS: u64 = 4;
pub const PERF_COUNT_HW_BRANCH_MISSES: u64 = 5;
pub const PERF_COUNT_HW_BUS_CYCLES: u64 = 6;
pub const PERF_COUNT_HW_STALLED_CYCLES_FRONTEND: u64 = 7;
pub const PERF_COUNT_HW_STALLED_CYCLES_BACKEND: u64 = 8;
pub const PERF_COUNT_HW_REF_CPU_CYCLES: u64 = 9;

pub const PERF_COUNT_HW_CACHE_L1D: u64 = 0;
pub const PERF_COUNT_HW_CACHE_L1I: u64 = 1;
pub const PERF_COUNT_HW_CACHE_LL: u64 = 2;
pub const PERF_COUNT_HW_CACHE_DTLB: u64 = 3;
pub const PERF_COUNT_HW_CACHE_ITLB: u64 = 4;
pub const PERF_COUNT_HW_CACHE_BPU: u64 = 5;
pub const PERF_COUNT_HW_CACHE_NODE: u64 = 6;

pub const PERF_COUNT_HW_CACHE_OP_READ: u64 = 0;
pub const PERF_COUNT_HW_CACHE_OP_WRITE: u64 = 1;
pub const PERF_COUNT_HW_CACHE_OP_PREFETCH: u64 = 2;

pub const PERF_COUNT_HW_CACHE_RESULT_ACCESS: u64 = 0;
pub const PERF_COUNT_HW_CACHE_RESULT_MISS: u64 = 1;

pub const PERF_COUNT_SW_CPU_CLOCK: u64 = 0;
pub const PERF_COUNT_SW_TASK_CLOCK: u64 = 1;
pub const PERF_COUNT_SW_PAGE_FAULTS: u64 = 2;
pub const PERF_COUNT_SW_CONTEXT_SWITCHES: u64 = 3;
pub const PERF_COUNT_SW_CPU_MIGRATIONS: u64 = 4;
pub const PERF_COUNT_SW_PAGE_FAULTS_MIN: u64 = 5;
pub const PERF_COUNT_SW_PAGE_FAULTS_MAJ: u64 = 6;
pub const PERF_COUNT_SW_ALIGNMENT_FAULTS: u64 = 7;
pub const PERF_COUNT_SW_EMULATION_FAULTS: u64 = 8;
pub const PERF_COUNT_SW_DUMMY: u64 = 9;
pub const PERF_COUNT_SW_BPF_OUTPUT: u64 = 10;
pub const PERF_COUNT_SW_CGROUP_SWITCHES: u64 = 11;

pub const PERF_IOC_FLAG_GROUP: u32 = 1;

pub const PERF_ATTR_SIZE_VER8: u32 = 136;

// #define PERF_EVENT_IOC_ENABLE  _IO ('$', 0)
// #define PERF_EVENT_IOC_DISABLE _IO ('$', 1)
// #define PERF_EVENT_IOC_ID      _IOR('$', 7, __u64 *)
//
// `_IOC_NONE` and `_IOC_READ` differ on a few architectures:
// https://github.com/torvalds/linux/blob/v6.13/arch/powerpc/include/uapi/asm/ioctl.h
#[cfg(any(
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc",
    target_arch = "sparc64",
))]
mod ioc {
    pub const NONE: u64 = 1;
    pub const READ: u64 = 2;
    pub const SIZE_BITS: u64 = 13;
}
#[cfg(not(any(
    target_arch = "powerpc",
    target_arch = "powerpc64",
    target_arch = "mips",
    target_arch = "mips64",
    target_arch = "sparc",
    target_arch = "sparc64",
)))]
mod ioc {
    pub const NONE: u64 = 0;
    pub const READ: u64 = 2;
    pub const SIZE_BITS: u64 = 14;
}

const fn ioc(dir: u64, nr: u64, size: u64) -> u64 {
    (dir << (16 + ioc::SIZE_BITS)) | (size << 16) | ((b'$' as u64) << 8) | nr
}

pub const PERF_EVENT_IOC_ENABLE: u64 = ioc(ioc::NONE, 0, 0);
pub const PERF_EVENT_IOC_DISABLE: u64 = ioc(ioc::NONE, 1, 0);
pub const PERF_EVENT_IOC_ID: u64 = ioc(ioc::READ, 7, size_of::<*mut u64>() as u64);

// struct perf_event_attr {
//     __u32 type;
//     __u32 size;
//     __u64 config;
//     union { __u64 sample_period; __u64 sample_freq; };
//     __u64 sample_type;
//     __u64 read_format;
//     __u64 disabled : 1, inherit : 1, pinned : 1, ... __reserved_1 : 26;
//     union { __u32 wakeup_events; __u32 wakeup_watermark; };
//     __u32 bp_type;
//     union { __u64 bp_addr; __u64 kprobe_func; __u64 uprobe_path; __u64 config1; };
//     union { __u64 bp_len; __u64 kprobe_addr; __u64 probe_offset; __u64 config2; };
//     __u64 branch_sample_type;
//     __u64 sample_regs_user;
//     __u32 sample_stack_user;
//     __s32 clockid;
//     __u64 sample_regs_intr;
//     __u32 aux_watermark;
//     __u16 sample_max_stack;
//     __u16 __reserved_2;
//     __u32 aux_sample_size;
//     __u32 aux_action;
//     __u64 sig_data;
//     __u64 config3;
// };
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct perf_event_attr {
    pub type_: u32,
    pub size: u32,
    pub config: u64,
    pub sample_period: u64,
    pub sample_type: u64,
    pub read_format: u64,
    pub flags: u64,
    pub wakeup_events: u32,
    pub bp_type: u32,
    pub config1: u64,
    pub config2: u64,
    pub branch_sample_type: u64,
    pub sample_regs_user: u64,
    pub sample_stack_user: u32,
    pub clockid: i32,
    pub sample_regs_intr: u64,
    pub aux_watermark: u32,
    pub sample_max_stack: u16,
    pub __reserved_2: u16,
    pub aux_sample_size: u32,
    pub aux_action: u32,
    pub sig_data: u64,
    pub config3: u64,
}

macro_rules! bits {
    ($($bit:literal => $get:ident, $set:ident;)+) => {
        impl perf_event_attr {
            $(
            #[inline]
            pub fn $get(&self) -> u64 {
                (self.flags >> $bit) & 1
            }

            #[inline]
            pub fn $set(&mut self, val: u64) {
                self.flags = (self.flags & !(1 << $bit)) | ((val & 1) << $bit);
            }
            )+
        }
    };
}

bits! {
    0 => disabled, set_disabled;
    1 => inherit, set_inherit;
    2 => pinned, set_pinned;
    3 => exclusive, set_exclusive;
    4 => exclude_user, set_exclude_user;
    5 => exclude_kernel, set_exclude_kernel;
    6 => exclude_hv, set_exclude_hv;
    7 => exclude_idle, set_exclude_idle;
    19 => exclude_host, set_exclude_host;
    20 => exclude_guest, set_exclude_guest;
}

// Leading fields of `struct perf_event_mmap_page`, the page is never
// constructed here, only viewed through the kernel mapping.
// https://github.com/torvalds/linux/blob/v6.13/include/uapi/linux/perf_event.h#L580
#[repr(C)]
#[derive(Debug)]
pub struct perf_event_mmap_page {
    pub version: u32,
    pub compat_version: u32,
    pub lock: u32,
    pub index: u32,
    pub offset: i64,
    pub time_enabled: u64,
    pub time_running: u64,
    pub capabilities: u64,
    pub pmc_width: u16,
    pub time_shift: u16,
    pub time_mult: u32,
    pub time_offset: u64,
    pub time_zero: u64,
    pub size: u32,
    pub __reserved_1: u32,
    pub time_cycles: u64,
    pub time_mask: u64,
}

const _: () = assert!(size_of::<perf_event_attr>() == PERF_ATTR_SIZE_VER8 as usize);
