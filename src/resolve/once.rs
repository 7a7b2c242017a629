use std::hint;
use std::sync::atomic::{AtomicU8, Ordering};

use log::trace;

/// Progress of a one-time initialization.
///
/// `Success` and `Failed` are terminal, a failed initialization is never retried.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitState {
    Uninitialized = 0,
    InProgress = 1,
    Success = 2,
    Failed = 3,
}

impl InitState {
    fn from_u8(val: u8) -> Self {
        match val {
            0 => Self::Uninitialized,
            1 => Self::InProgress,
            2 => Self::Success,
            _ => Self::Failed,
        }
    }
}

/// Runs a non-idempotent initializer exactly once across all threads.
///
/// The first caller to claim the state runs the initializer, every other
/// concurrent caller spins until the outcome is published and then returns
/// the same verdict. Callers arriving after that return immediately.
///
/// Waiters busy-wait without timeout, so this is only suited to short
/// initializers run during startup.
///
/// # Examples
///
/// ```rust
/// use perf_counter::resolve::{InitOnce, InitState};
///
/// static INIT: InitOnce = InitOnce::new();
///
/// assert!(INIT.call_once(|| true));
/// // Later calls never rerun the initializer.
/// assert!(INIT.call_once(|| unreachable!()));
/// assert_eq!(INIT.state(), InitState::Success);
/// ```
#[derive(Debug, Default)]
pub struct InitOnce {
    state: AtomicU8,
}

impl InitOnce {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(InitState::Uninitialized as _),
        }
    }

    pub fn state(&self) -> InitState {
        InitState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Returns `true` if the initializer (run now or earlier) succeeded.
    pub fn call_once<F>(&self, init: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        match self.state() {
            InitState::Success => return true,
            InitState::Failed => return false,
            InitState::Uninitialized | InitState::InProgress => (),
        }

        let claimed = self
            .state
            .compare_exchange(
                InitState::Uninitialized as _,
                InitState::InProgress as _,
                Ordering::Acquire,
                Ordering::Acquire,
            )
            .is_ok();

        if claimed {
            trace!("claimed one-time initialization");
            // Publishes `Failed` if `init` unwinds.
            let mut guard = Publish {
                state: &self.state,
                verdict: InitState::Failed,
            };
            if init() {
                guard.verdict = InitState::Success;
            }
            trace!("one-time initialization finished: {:?}", guard.verdict);
            return guard.verdict == InitState::Success;
        }

        loop {
            match self.state() {
                InitState::InProgress => hint::spin_loop(),
                state => return state == InitState::Success,
            }
        }
    }
}

struct Publish<'a> {
    state: &'a AtomicU8,
    verdict: InitState,
}

impl Drop for Publish<'_> {
    fn drop(&mut self) {
        // Pairs with the acquire loads of the waiters, side effects of the
        // initializer happen-before any observation of the terminal state.
        self.state.store(self.verdict as _, Ordering::Release);
    }
}
