use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use super::{Backend, Generic, InitOnce, InitState, Resolver};
use crate::count::Counter;
use crate::error::{Error, Result};
use crate::event::attr::empty;
use crate::event::EventId;
use crate::ffi::bindings as b;
use crate::ffi::Attr;

const THREADS: usize = 16;

/// Backend double counting its calls, with a slow initializer.
struct Probe {
    succeed: bool,
    delay: Duration,
    inits: AtomicUsize,
    encodes: AtomicUsize,
}

impl Probe {
    fn new(succeed: bool, delay: Duration) -> Self {
        Self {
            succeed,
            delay,
            inits: AtomicUsize::new(0),
            encodes: AtomicUsize::new(0),
        }
    }
}

impl Backend for Probe {
    fn initialize(&self) -> bool {
        self.inits.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.succeed
    }

    fn encode(&self, name: &str, attr: &mut Attr) -> Result<()> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        if name != "known" {
            return Err(Error::EventNotFound {
                name: name.to_owned(),
                code: -4,
            });
        }
        attr.type_ = b::PERF_TYPE_RAW;
        attr.config = 0x1a8;
        attr.set_exclude_kernel(1);
        Ok(())
    }
}

// Every thread resolves a name for the first time at once.
fn race(resolver: &Resolver<Probe>) -> Vec<bool> {
    let barrier = &Barrier::new(THREADS);
    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    match resolver.attr("known", false) {
                        Ok(attr) => {
                            assert_eq!(attr.config, 0x1a8);
                            true
                        }
                        Err(Error::ResolutionUnavailable) => false,
                        Err(e) => panic!("unexpected: {}", e),
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn test_concurrent_init_runs_once() {
    let resolver = Resolver::new(Probe::new(true, Duration::from_millis(50)));
    assert_eq!(resolver.state(), InitState::Uninitialized);

    let verdicts = race(&resolver);

    let probe = resolver.backend();
    assert_eq!(probe.inits.load(Ordering::SeqCst), 1);
    assert_eq!(probe.encodes.load(Ordering::SeqCst), THREADS);
    assert_eq!(verdicts, vec![true; THREADS]);
    assert_eq!(resolver.state(), InitState::Success);
}

#[test]
fn test_concurrent_init_failure_is_shared() {
    let resolver = Resolver::new(Probe::new(false, Duration::from_millis(50)));

    let verdicts = race(&resolver);

    let probe = resolver.backend();
    assert_eq!(probe.inits.load(Ordering::SeqCst), 1);
    assert_eq!(probe.encodes.load(Ordering::SeqCst), 0);
    assert_eq!(verdicts, vec![false; THREADS]);
    assert_eq!(resolver.state(), InitState::Failed);
}

#[test]
fn test_failed_init_is_permanent() {
    let resolver = Resolver::new(Probe::new(false, Duration::ZERO));

    for _ in 0..3 {
        let result = resolver.attr("known", false);
        assert!(matches!(result, Err(Error::ResolutionUnavailable)));
    }

    let probe = resolver.backend();
    assert_eq!(probe.inits.load(Ordering::SeqCst), 1);
    assert_eq!(probe.encodes.load(Ordering::SeqCst), 0);
}

#[test]
fn test_resolved_attr_policy() {
    let resolver = Resolver::new(Probe::new(true, Duration::ZERO));

    let leader = resolver.attr("known", false).unwrap();
    assert_eq!(leader.type_, b::PERF_TYPE_RAW);
    assert_eq!(leader.config, 0x1a8);
    assert_eq!(leader.size, b::PERF_ATTR_SIZE_VER8);
    assert_eq!(leader.pinned(), 1);
    assert_eq!(leader.disabled(), 1);
    assert_eq!(leader.exclude_kernel(), 1);

    let member = resolver.attr("known", true).unwrap();
    assert_eq!(member.pinned(), 0);
    assert_eq!(member.disabled(), 1);

    assert_eq!(resolver.backend().inits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_name() {
    let resolver = Resolver::new(Probe::new(true, Duration::ZERO));

    match resolver.attr("nonexistent-event", false) {
        Err(Error::EventNotFound { name, code }) => {
            assert_eq!(name, "nonexistent-event");
            assert_eq!(code, -4);
        }
        other => panic!("unexpected: {:?}", other.map(|it| it.config)),
    }
    // Lookup failures do not affect the initialization state.
    assert_eq!(resolver.state(), InitState::Success);
}

#[test]
fn test_init_once_states() {
    let once = InitOnce::new();
    assert_eq!(once.state(), InitState::Uninitialized);

    assert!(once.call_once(|| {
        assert_eq!(once.state(), InitState::InProgress);
        true
    }));
    assert_eq!(once.state(), InitState::Success);
    assert!(once.call_once(|| unreachable!()));
}

#[test]
fn test_init_once_panic_is_failure() {
    let once = InitOnce::new();

    let result = catch_unwind(AssertUnwindSafe(|| once.call_once(|| panic!("init"))));
    assert!(result.is_err());

    assert_eq!(once.state(), InitState::Failed);
    assert!(!once.call_once(|| true));
}

#[test]
fn test_generic_lookup() {
    let cases = [
        ("cycles", EventId::new(b::PERF_TYPE_HARDWARE, 0)),
        ("cpu-cycles", EventId::new(b::PERF_TYPE_HARDWARE, 0)),
        ("instructions", EventId::new(b::PERF_TYPE_HARDWARE, 1)),
        ("branches", EventId::new(b::PERF_TYPE_HARDWARE, 4)),
        ("ref-cycles", EventId::new(b::PERF_TYPE_HARDWARE, 9)),
        ("task-clock", EventId::new(b::PERF_TYPE_SOFTWARE, 1)),
        ("cs", EventId::new(b::PERF_TYPE_SOFTWARE, 3)),
        ("major-faults", EventId::new(b::PERF_TYPE_SOFTWARE, 6)),
        ("dummy", EventId::new(b::PERF_TYPE_SOFTWARE, 9)),
        ("r1a8", EventId::new(b::PERF_TYPE_RAW, 0x1a8)),
        ("rFFFFFFFFFFFFFFFF", EventId::new(b::PERF_TYPE_RAW, u64::MAX)),
    ];
    for (name, id) in cases {
        assert_eq!(Generic::lookup(name), Some(id), "{}", name);
    }

    for name in ["", "r", "r+1", "rxyz", "r1FFFFFFFFFFFFFFFF", "Cycles", "nonexistent-event"] {
        assert_eq!(Generic::lookup(name), None, "{}", name);
    }
}

#[test]
fn test_generic_encode() {
    let mut attr = empty();
    Generic.encode("page-faults", &mut attr).unwrap();
    assert_eq!(attr.type_, b::PERF_TYPE_SOFTWARE);
    assert_eq!(attr.config, 2);
    assert_eq!(attr.exclude_kernel(), 1);
    assert_eq!(attr.exclude_hv(), 1);
    assert_eq!(attr.exclude_user(), 0);

    let mut attr = empty();
    let result = Generic.encode("nonexistent-event", &mut attr);
    assert!(matches!(
        result,
        Err(Error::EventNotFound { code, .. }) if code == libc::ENOENT
    ));
    assert_eq!(attr, empty());
}

#[test]
fn test_concurrent_open_by_name() {
    let resolver = Resolver::new(Generic);
    let barrier = &Barrier::new(THREADS);

    let opened: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let resolver = &resolver;
                s.spawn(move || {
                    barrier.wait();
                    match Counter::open_by_name_with(resolver, "dummy", None) {
                        Ok(counter) => Some(counter.is_open()),
                        Err(Error::ResolutionUnavailable | Error::OpenFailed(_)) => None,
                        Err(e) => panic!("unexpected: {}", e),
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    match resolver.state() {
        InitState::Success => assert!(opened.iter().all(|it| *it != Some(false))),
        InitState::Failed => assert!(opened.iter().all(Option::is_none)),
        state => panic!("unexpected state: {:?}", state),
    }
}

#[cfg(feature = "libpfm")]
#[test]
fn test_pfm_encode_arg_layout() {
    use crate::ffi::pfm::pfm_perf_encode_arg_t;

    #[cfg(target_pointer_width = "64")]
    assert_eq!(size_of::<pfm_perf_encode_arg_t>(), 40);
    assert_eq!(
        std::mem::offset_of!(pfm_perf_encode_arg_t, idx),
        3 * size_of::<usize>()
    );
}

#[cfg(feature = "libpfm")]
#[test]
fn test_pfm_unknown_name() {
    use super::PFM;

    if PFM.ensure_init().is_err() {
        eprintln!("skipped, libpfm unavailable");
        return;
    }
    match PFM.attr("nonexistent-event", false) {
        Err(Error::EventNotFound { name, code }) => {
            assert_eq!(name, "nonexistent-event");
            assert!(code < 0);
        }
        other => panic!("unexpected: {:?}", other.map(|it| it.config)),
    }
    // Interior NUL bytes can not reach libpfm.
    assert!(matches!(
        PFM.attr("cycles\0", false),
        Err(Error::EventNotFound { code, .. }) if code == crate::ffi::pfm::PFM_ERR_INVAL
    ));
}
