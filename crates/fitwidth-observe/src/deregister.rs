#![forbid(unsafe_code)]

//! Deregistration capabilities and the handle that owns one.

use std::fmt;

use fitwidth_core::{FitError, NodeId, Result};
use tracing::{debug, warn};

/// A one-shot capability that stops an observation and frees its resources.
pub struct Deregister {
    run: Box<dyn FnOnce()>,
}

impl Deregister {
    pub fn new(run: impl FnOnce() + 'static) -> Self {
        Self { run: Box::new(run) }
    }

    /// A capability with nothing to release.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|| {})
    }

    /// Stop the observation.
    pub fn call(self) {
        (self.run)();
    }
}

impl fmt::Debug for Deregister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deregister(..)")
    }
}

/// Owns exactly one [`Deregister`] from a successful attach.
///
/// [`release`](Self::release) runs it at most once. A handle dropped without
/// being released runs it from `Drop`, so the capability is never lost.
pub struct ObservationHandle {
    observer: String,
    target: Option<NodeId>,
    release: Option<Deregister>,
}

impl fmt::Debug for ObservationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservationHandle")
            .field("observer", &self.observer)
            .field("target", &self.target)
            .field("released", &self.is_released())
            .finish()
    }
}

impl ObservationHandle {
    #[must_use]
    pub fn new(observer: impl Into<String>, target: Option<NodeId>, release: Deregister) -> Self {
        Self {
            observer: observer.into(),
            target,
            release: Some(release),
        }
    }

    /// Name of the observer that produced this handle.
    #[must_use]
    pub fn observer(&self) -> &str {
        &self.observer
    }

    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }

    /// Run the deregistration capability. Returns `false` if it already ran.
    pub fn release(&mut self) -> bool {
        match self.release.take() {
            Some(dereg) => {
                dereg.call();
                debug!(
                    message = "fitwidth.observer.released",
                    observer = %self.observer
                );
                true
            }
            None => false,
        }
    }
}

impl Drop for ObservationHandle {
    fn drop(&mut self) {
        if let Some(dereg) = self.release.take() {
            warn!(
                message = "fitwidth.observer.released_on_drop",
                observer = %self.observer
            );
            dereg.call();
        }
    }
}

/// Check the result of an attach call.
///
/// Runs once, synchronously, right after attaching.
pub fn validate_attachment(
    observer: &str,
    target: Option<NodeId>,
    attached: Option<Deregister>,
) -> Result<ObservationHandle> {
    match attached {
        Some(dereg) => Ok(ObservationHandle::new(observer, target, dereg)),
        None => {
            warn!(message = "fitwidth.observer.invalid", observer);
            Err(FitError::invalid_observer(observer))
        }
    }
}
