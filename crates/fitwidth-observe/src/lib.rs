#![forbid(unsafe_code)]

//! Change observers: strategies that watch for size-relevant events and hand
//! back a capability to stop watching.
//!
//! # Contract
//!
//! [`ChangeObserver::attach`] receives the host, the container node (if one
//! was captured), and a zero-argument `notify` callback. It returns
//! `Some(Deregister)` on success. `None` means the strategy could not provide
//! a way to stop observing; [`validate_attachment`] turns that into
//! [`FitError::InvalidObserverContract`](fitwidth_core::FitError) so mounting
//! fails instead of leaking a subscription.
//!
//! `notify` may fire any number of times. Each call means "geometry might have
//! changed", never "geometry did change"; callers re-measure to find out.
//!
//! # Strategies
//!
//! - [`ViewportObserver`] (default): the viewport resize signal. Ignores the
//!   target node entirely.
//! - [`ContainerObserver`]: the host's native per-node resize observation.
//! - [`FnObserver`]: any closure with the attach signature.

pub mod container;
pub mod deregister;
pub mod observer;
pub mod viewport;

pub use container::ContainerObserver;
pub use deregister::{Deregister, ObservationHandle, validate_attachment};
pub use observer::{ChangeObserver, FnObserver, Notify, observer_fn, observer_for};
pub use viewport::ViewportObserver;

#[cfg(test)]
pub(crate) mod test_host;
