#![forbid(unsafe_code)]

//! The change-observer contract.

use std::fmt;
use std::rc::Rc;

use fitwidth_core::{LayoutHost, Listener, NodeId, ObserverKind};

use crate::container::ContainerObserver;
use crate::deregister::Deregister;
use crate::viewport::ViewportObserver;

/// Zero-argument "re-check geometry" callback.
pub type Notify = Listener;

/// A strategy for watching size-relevant change.
pub trait ChangeObserver {
    /// Begin observing and return the capability that stops it.
    ///
    /// `target` is the container captured at probe mount, if any. Strategies
    /// are free to ignore it.
    fn attach(
        &self,
        host: &dyn LayoutHost,
        target: Option<NodeId>,
        notify: Notify,
    ) -> Option<Deregister>;

    /// Short name for logs and errors.
    fn name(&self) -> &str;
}

/// A [`ChangeObserver`] backed by a closure.
pub struct FnObserver<F> {
    name: String,
    attach: F,
}

impl<F> fmt::Debug for FnObserver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver")
            .field("name", &self.name)
            .finish()
    }
}

/// Wrap a closure as a named observer.
pub fn observer_fn<F>(name: impl Into<String>, attach: F) -> FnObserver<F>
where
    F: Fn(&dyn LayoutHost, Option<NodeId>, Notify) -> Option<Deregister>,
{
    FnObserver {
        name: name.into(),
        attach,
    }
}

impl<F> ChangeObserver for FnObserver<F>
where
    F: Fn(&dyn LayoutHost, Option<NodeId>, Notify) -> Option<Deregister>,
{
    fn attach(
        &self,
        host: &dyn LayoutHost,
        target: Option<NodeId>,
        notify: Notify,
    ) -> Option<Deregister> {
        (self.attach)(host, target, notify)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// The built-in observer for a configured kind.
#[must_use]
pub fn observer_for(kind: ObserverKind) -> Rc<dyn ChangeObserver> {
    match kind {
        ObserverKind::Viewport => Rc::new(ViewportObserver),
        ObserverKind::Container => Rc::new(ContainerObserver),
    }
}
