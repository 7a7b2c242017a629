use std::fs;

use log::debug;

use super::Backend;
use crate::error::{Error, Result};
use crate::event::hw::Hardware;
use crate::event::raw::Raw;
use crate::event::sw::Software;
use crate::event::EventId;
use crate::ffi::Attr;

const PARANOID_PATH: &str = "/proc/sys/kernel/perf_event_paranoid";

/// Backend for the generic event names the kernel itself defines.
///
/// Accepts the spellings used by `perf list` (`cycles`, `instructions`,
/// `task-clock`, ...) and raw PMU codes written as `r` followed by hex
/// digits (`r1a8`). Initialization only succeeds if the running kernel
/// exposes perf events at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct Generic;

impl Generic {
    /// Looks up the event id for a generic event name.
    pub fn lookup(name: &str) -> Option<EventId> {
        let id: EventId = match name {
            "cpu-cycles" | "cycles" => Hardware::CpuCycle.into(),
            "instructions" => Hardware::Instr.into(),
            "cache-references" => Hardware::CacheAccess.into(),
            "cache-misses" => Hardware::CacheMiss.into(),
            "branch-instructions" | "branches" => Hardware::BranchInstr.into(),
            "branch-misses" => Hardware::BranchMiss.into(),
            "bus-cycles" => Hardware::BusCycle.into(),
            "stalled-cycles-frontend" | "idle-cycles-frontend" => {
                Hardware::FrontendStalledCycle.into()
            }
            "stalled-cycles-backend" | "idle-cycles-backend" => {
                Hardware::BackendStalledCycle.into()
            }
            "ref-cycles" => Hardware::RefCpuCycle.into(),

            "cpu-clock" => Software::CpuClock.into(),
            "task-clock" => Software::TaskClock.into(),
            "page-faults" | "faults" => Software::PageFault.into(),
            "minor-faults" => Software::MinorPageFault.into(),
            "major-faults" => Software::MajorPageFault.into(),
            "context-switches" | "cs" => Software::CtxSwitch.into(),
            "cpu-migrations" | "migrations" => Software::CpuMigration.into(),
            "alignment-faults" => Software::AlignFault.into(),
            "emulation-faults" => Software::EmuFault.into(),
            "cgroup-switches" => Software::CgroupSwitch.into(),
            "bpf-output" => Software::BpfOutput.into(),
            "dummy" => Software::Dummy.into(),

            _ => return parse_raw(name),
        };
        Some(id)
    }
}

// `perf` raw event syntax, e.g. `r003c`.
fn parse_raw(name: &str) -> Option<EventId> {
    let hex = name.strip_prefix('r')?;
    if hex.is_empty() || hex.len() > 16 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let config = u64::from_str_radix(hex, 16).ok()?;
    Some(Raw { config }.into())
}

impl Backend for Generic {
    fn initialize(&self) -> bool {
        match fs::read_to_string(PARANOID_PATH) {
            Ok(level) => match level.trim().parse::<i32>() {
                Ok(level) => {
                    debug!("perf events available, paranoid level {}", level);
                    true
                }
                Err(e) => {
                    debug!("unexpected content in {}: {}", PARANOID_PATH, e);
                    false
                }
            },
            Err(e) => {
                debug!("perf events unavailable, failed to read {}: {}", PARANOID_PATH, e);
                false
            }
        }
    }

    fn encode(&self, name: &str, attr: &mut Attr) -> Result<()> {
        let Some(id) = Self::lookup(name) else {
            return Err(Error::EventNotFound {
                name: name.to_owned(),
                code: libc::ENOENT,
            });
        };

        attr.type_ = id.ty;
        attr.config = id.config;
        attr.set_exclude_kernel(1);
        attr.set_exclude_hv(1);

        Ok(())
    }
}
