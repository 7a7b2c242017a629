//! Symbolic event name resolution.
//!
//! A [`Resolver`] pairs a name-translation [`Backend`] with an [`InitOnce`],
//! so the backend's global initialization runs exactly once no matter how
//! many threads race to open their first counter by name.

#[cfg(test)]
mod test;

mod generic;
mod once;
#[cfg(feature = "libpfm")]
mod pfm;

use log::debug;

pub use generic::*;
pub use once::*;
#[cfg(feature = "libpfm")]
pub use pfm::*;

use crate::error::{Error, Result};
use crate::event::attr;
use crate::ffi::Attr;

/// A library able to translate event names into `perf_event_attr` encodings.
pub trait Backend {
    /// Global initialization, called at most once per [`Resolver`].
    ///
    /// Returns `false` if the backend is unusable.
    fn initialize(&self) -> bool;

    /// Encodes `name` into `attr` at user space only privilege scope.
    ///
    /// `attr` arrives zeroed except for its `size`. Backends may set any
    /// bits they need besides type and config.
    fn encode(&self, name: &str, attr: &mut Attr) -> Result<()>;
}

/// Name resolver with exactly-once backend initialization.
#[derive(Debug, Default)]
pub struct Resolver<B> {
    once: InitOnce,
    backend: B,
}

impl<B> Resolver<B> {
    pub const fn new(backend: B) -> Self {
        Self {
            once: InitOnce::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> InitState {
        self.once.state()
    }
}

impl<B: Backend> Resolver<B> {
    /// Initializes the backend on first use.
    ///
    /// Once initialization has failed every later call fails fast with
    /// [`Error::ResolutionUnavailable`] without touching the backend.
    pub fn ensure_init(&self) -> Result<()> {
        if self.once.call_once(|| self.backend.initialize()) {
            Ok(())
        } else {
            Err(Error::ResolutionUnavailable)
        }
    }

    /// Builds the attributes of a counter for the named event.
    pub(crate) fn attr(&self, name: &str, grouped: bool) -> Result<Attr> {
        self.ensure_init()?;

        let mut attr = attr::empty();
        self.backend.encode(name, &mut attr).inspect_err(|e| {
            debug!("failed to resolve event {:?}: {}", name, e);
        })?;
        attr::fix_policy(&mut attr, grouped);

        Ok(attr)
    }
}

/// Process-wide resolver for the kernel's generic event names.
pub static GENERIC: Resolver<Generic> = Resolver::new(Generic);

/// Process-wide resolver backed by libpfm4.
#[cfg(feature = "libpfm")]
pub static PFM: Resolver<Pfm> = Resolver::new(Pfm);
