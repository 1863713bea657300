#![forbid(unsafe_code)]

//! Default strategy: the top-level viewport resize signal.
//!
//! A viewport resize cascades into most reflows, so this is a conservative
//! superset of the cases where a container's width can change. It is also
//! coarse in both directions:
//!
//! - it misses container-only changes (sibling content, animations,
//!   programmatic style changes);
//! - it fires when the viewport changed but this container did not, which the
//!   probe's unchanged-width check absorbs.
//!
//! The `target` argument is ignored. Observers that care about the container
//! itself should use [`ContainerObserver`](crate::ContainerObserver).

use fitwidth_core::{LayoutHost, NodeId};
use tracing::trace;

use crate::deregister::Deregister;
use crate::observer::{ChangeObserver, Notify};

#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportObserver;

impl ChangeObserver for ViewportObserver {
    fn attach(
        &self,
        host: &dyn LayoutHost,
        _target: Option<NodeId>,
        notify: Notify,
    ) -> Option<Deregister> {
        let signal = host.viewport_resize().clone();
        let id = signal.subscribe(notify);
        trace!(
            message = "fitwidth.observer.attached",
            observer = "viewport",
            subscription = id.raw()
        );
        Some(Deregister::new(move || {
            signal.unsubscribe(id);
        }))
    }

    fn name(&self) -> &str {
        "viewport"
    }
}
