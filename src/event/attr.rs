use super::EventId;
use crate::ffi::Attr;

pub(crate) fn empty() -> Attr {
    Attr {
        size: size_of::<Attr>() as _,
        ..Default::default()
    }
}

/// Attributes for a counter opened by numeric type and config.
pub(crate) fn from_id(id: EventId, grouped: bool) -> Attr {
    let mut attr = empty();
    attr.type_ = id.ty;
    attr.config = id.config;

    // User space only.
    attr.set_exclude_kernel(1);
    attr.set_exclude_hv(1);

    fix_policy(&mut attr, grouped);
    attr
}

/// Applies the scheduling policy shared by every counter of this crate.
///
/// Counters are always created disabled and must be enabled explicitly.
/// Only a group leader can be pinned:
/// https://github.com/torvalds/linux/blob/v6.13/kernel/events/core.c#L12982
pub(crate) fn fix_policy(attr: &mut Attr, grouped: bool) {
    if !grouped {
        attr.set_pinned(1);
    }
    attr.set_disabled(1);
}
