#![forbid(unsafe_code)]

//! Fine-grained strategy: native resize observation of the container node.
//!
//! Fires only for the observed node, so it catches container-only changes the
//! viewport strategy misses. It needs both a target and a host that supports
//! per-node observation; without either it returns no capability, and the
//! mount fails loudly instead of silently never notifying.

use fitwidth_core::{LayoutHost, NodeId};
use tracing::{trace, warn};

use crate::deregister::Deregister;
use crate::observer::{ChangeObserver, Notify};

#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerObserver;

impl ChangeObserver for ContainerObserver {
    fn attach(
        &self,
        host: &dyn LayoutHost,
        target: Option<NodeId>,
        notify: Notify,
    ) -> Option<Deregister> {
        let Some(node) = target else {
            warn!(
                message = "fitwidth.observer.no_target",
                observer = "container"
            );
            return None;
        };
        let Some(signals) = host.node_resize() else {
            warn!(
                message = "fitwidth.observer.unsupported",
                observer = "container",
                node = node.raw()
            );
            return None;
        };
        let signals = signals.clone();
        let id = signals.subscribe(node, notify);
        trace!(
            message = "fitwidth.observer.attached",
            observer = "container",
            node = node.raw(),
            subscription = id.raw()
        );
        Some(Deregister::new(move || {
            signals.unsubscribe(&node, id);
        }))
    }

    fn name(&self) -> &str {
        "container"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::SignalHost;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, Notify) {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        (hits, Rc::new(move || h.set(h.get() + 1)))
    }

    #[test]
    fn watches_only_its_target() {
        let host = SignalHost::with_node_resize();
        let (hits, notify) = counter();
        let dereg = ContainerObserver
            .attach(&host, Some(NodeId::new(1)), notify)
            .expect("target and native observation available");

        let nodes = host.nodes.as_ref().unwrap();
        nodes.emit(&NodeId::new(2));
        assert_eq!(hits.get(), 0);
        nodes.emit(&NodeId::new(1));
        assert_eq!(hits.get(), 1);

        host.viewport.emit();
        assert_eq!(hits.get(), 1);

        dereg.call();
        nodes.emit(&NodeId::new(1));
        assert_eq!(hits.get(), 1);
        assert_eq!(nodes.total_listeners(), 0);
    }

    #[test]
    fn no_target_yields_no_capability() {
        let host = SignalHost::with_node_resize();
        let (_hits, notify) = counter();
        assert!(ContainerObserver.attach(&host, None, notify).is_none());
    }

    #[test]
    fn unsupported_host_yields_no_capability() {
        let host = SignalHost::default();
        let (_hits, notify) = counter();
        assert!(
            ContainerObserver
                .attach(&host, Some(NodeId::new(1)), notify)
                .is_none()
        );
    }
}
