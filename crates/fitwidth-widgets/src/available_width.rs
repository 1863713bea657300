#![forbid(unsafe_code)]

//! The available-width wrapper and its per-mount lifecycle.
//!
//! # Protocol
//!
//! The host drives each [`AvailableWidthInstance`] through:
//!
//! 1. [`render`](AvailableWidthInstance::render): a [`ProbeElement`] while no
//!    width is known, the wrapped content otherwise.
//! 2. [`probe_attached`](AvailableWidthInstance::probe_attached): after the
//!    probe is committed. Reads its width, captures the container, the
//!    container's width and the probe's position, then schedules a render.
//! 3. [`did_mount`](AvailableWidthInstance::did_mount): attaches the change
//!    observer and validates the returned capability.
//! 4. [`teardown`](AvailableWidthInstance::teardown): releases the observation.
//!
//! Geometry is only read after a commit, never while rendering.
//!
//! # Re-measurement
//!
//! Each notification first compares the container's width with the last
//! known value. If it is unchanged (and `skip_unchanged` is on) nothing
//! happens. Otherwise the configured [`RemeasurePolicy`] runs:
//!
//! - `InPlace` re-reads the node at the probe's recorded position. Hosts
//!   commit content under a node there that is laid out like the probe, so
//!   it keeps reporting the space available rather than the content's own
//!   width. If that node is gone, the instance falls back to a full reset.
//! - `FullReset` forgets the width and renders a fresh probe.
//!
//! Notifications are not batched here; each accepted one schedules exactly
//! one render.
//!
//! # Invariants
//!
//! 1. At most one observation is attached per instance, and its
//!    deregistration runs exactly once.
//! 2. An instance whose observer returned no capability is never mounted.
//! 3. Notifications after teardown are ignored.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use fitwidth_core::{
    ContainerRef, InstanceId, LayoutHost, NodeId, ProbeConfig, RemeasurePolicy, Result, Width,
};
use fitwidth_observe::{
    ChangeObserver, Notify, ObservationHandle, observer_for, validate_attachment,
};
use tracing::{debug, debug_span, trace};

use crate::content::{Content, WidthProps};
use crate::probe::{DirtyCycle, ProbeElement, ProbeState, ProbeStyle, Rendered, StyleScope};

// ─── Diagnostics ─────────────────────────────────────────────────────────────

static PROBE_MEASUREMENTS_TOTAL: AtomicU64 = AtomicU64::new(0);
static SPURIOUS_NOTIFICATIONS_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Total probe reads across all instances.
#[must_use]
pub fn probe_measurements_total() -> u64 {
    PROBE_MEASUREMENTS_TOTAL.load(Ordering::Relaxed)
}

/// Total notifications dropped because the container width was unchanged.
#[must_use]
pub fn spurious_notifications_total() -> u64 {
    SPURIOUS_NOTIFICATIONS_TOTAL.load(Ordering::Relaxed)
}

// ─── Factory ─────────────────────────────────────────────────────────────────

/// Options accepted by [`AvailableWidth::with_options`].
#[derive(Clone, Default)]
pub struct AvailableWidthOptions {
    /// Replaces the configured built-in observer when set.
    pub observer_implementation: Option<Rc<dyn ChangeObserver>>,
    pub probe: ProbeConfig,
}

impl fmt::Debug for AvailableWidthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailableWidthOptions")
            .field(
                "observer_implementation",
                &self.observer_implementation.as_ref().map(|o| o.name()),
            )
            .field("probe", &self.probe)
            .finish()
    }
}

/// A content component wrapped so that it receives its available width.
///
/// This is the factory result: cheap to clone, and each
/// [`instance`](Self::instance) is one independent mount.
pub struct AvailableWidth<C> {
    content: Rc<C>,
    observer: Option<Rc<dyn ChangeObserver>>,
    config: ProbeConfig,
}

impl<C> Clone for AvailableWidth<C> {
    fn clone(&self) -> Self {
        Self {
            content: Rc::clone(&self.content),
            observer: self.observer.clone(),
            config: self.config,
        }
    }
}

impl<C> fmt::Debug for AvailableWidth<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailableWidth")
            .field("observer", &self.observer_name())
            .field("config", &self.config)
            .finish()
    }
}

impl<C> AvailableWidth<C> {
    /// Wrap `content` with the default configuration (viewport observer,
    /// in-place re-measurement, unchanged-width skipping).
    pub fn new(content: C) -> Self {
        Self::with_options(content, AvailableWidthOptions::default())
    }

    pub fn with_options(content: C, options: AvailableWidthOptions) -> Self {
        Self {
            content: Rc::new(content),
            observer: options.observer_implementation,
            config: options.probe,
        }
    }

    /// Use a custom observer instead of the configured built-in one.
    #[must_use]
    pub fn observer(mut self, observer: impl ChangeObserver + 'static) -> Self {
        self.observer = Some(Rc::new(observer));
        self
    }

    /// Wrap `content` with the configuration read from `FITWIDTH_*`
    /// environment variables. Malformed values are an error.
    pub fn from_env(content: C) -> Result<Self> {
        Ok(Self::new(content).config(ProbeConfig::from_env()?))
    }

    /// Like [`from_env`](Self::from_env), reading keys through `lookup`.
    pub fn from_lookup(content: C, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self::new(content).config(ProbeConfig::from_lookup(lookup)?))
    }

    #[must_use]
    pub fn config(mut self, config: ProbeConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn probe_config(&self) -> ProbeConfig {
        self.config
    }

    /// Name of the observer instances will attach.
    #[must_use]
    pub fn observer_name(&self) -> String {
        self.resolve_observer().name().to_owned()
    }

    fn resolve_observer(&self) -> Rc<dyn ChangeObserver> {
        match &self.observer {
            Some(obs) => Rc::clone(obs),
            None => observer_for(self.config.observer),
        }
    }

    /// Create a new mount in the `Initial` state.
    #[must_use]
    pub fn instance(&self) -> AvailableWidthInstance<C> {
        let id = InstanceId::next();
        trace!(message = "fitwidth.instance.created", instance = id.raw());
        AvailableWidthInstance {
            content: Rc::clone(&self.content),
            observer: self.resolve_observer(),
            config: self.config,
            state: Rc::new(RefCell::new(InstanceState::new(id))),
        }
    }
}

// ─── Per-instance state ──────────────────────────────────────────────────────

/// Side-channel state captured when the probe attaches and threaded through
/// every later callback.
struct MountContext {
    host: Rc<dyn LayoutHost>,
    container: Option<ContainerRef>,
    last_container_width: Option<Width>,
    probe_index: Option<usize>,
}

struct InstanceState {
    id: InstanceId,
    phase: ProbeState,
    available_width: Option<Width>,
    cycle: DirtyCycle,
    context: Option<MountContext>,
    handle: Option<ObservationHandle>,
    mounted: bool,
    version: u64,
}

/// What a notification asks of the host.
enum NotifyOutcome {
    Ignore,
    Render(Rc<dyn LayoutHost>),
}

impl InstanceState {
    fn new(id: InstanceId) -> Self {
        Self {
            id,
            phase: ProbeState::Initial,
            available_width: None,
            cycle: DirtyCycle::new(),
            context: None,
            handle: None,
            mounted: false,
            version: 0,
        }
    }

    fn reset(&mut self) {
        self.available_width = None;
        self.phase = ProbeState::Initial;
        self.cycle.invalidate();
        self.version += 1;
    }

    fn on_notify(&mut self, config: ProbeConfig) -> NotifyOutcome {
        if !self.mounted || self.phase == ProbeState::Unmounted {
            return NotifyOutcome::Ignore;
        }
        let Some(ctx) = self.context.as_mut() else {
            return NotifyOutcome::Ignore;
        };
        let host = Rc::clone(&ctx.host);
        let current = ctx.container.and_then(|c| c.width(host.as_ref()));

        if config.skip_unchanged && current == ctx.last_container_width {
            SPURIOUS_NOTIFICATIONS_TOTAL.fetch_add(1, Ordering::Relaxed);
            debug!(
                message = "fitwidth.notify.spurious",
                instance = self.id.raw(),
                container_width = current.map(Width::get)
            );
            return NotifyOutcome::Ignore;
        }

        let previous_container = ctx.last_container_width;
        ctx.last_container_width = current;

        match config.policy {
            RemeasurePolicy::FullReset => {
                self.reset();
                debug!(
                    message = "fitwidth.remeasure",
                    instance = self.id.raw(),
                    policy = "full-reset",
                    generation = self.cycle.generation()
                );
                NotifyOutcome::Render(host)
            }
            RemeasurePolicy::InPlace => {
                if self.phase == ProbeState::Initial {
                    // A probe is already pending; its attach will measure.
                    return NotifyOutcome::Ignore;
                }
                self.phase = ProbeState::Stale;
                let remeasured = ctx
                    .container
                    .zip(ctx.probe_index)
                    .and_then(|(c, idx)| c.child_at(host.as_ref(), idx))
                    .and_then(|node| host.offset_width(node));

                let Some(width) = remeasured else {
                    debug!(
                        message = "fitwidth.remeasure.fallback",
                        instance = self.id.raw(),
                        reason = "measurement point gone"
                    );
                    self.reset();
                    return NotifyOutcome::Render(host);
                };

                self.phase = ProbeState::Measured;
                debug!(
                    message = "fitwidth.remeasure",
                    instance = self.id.raw(),
                    policy = "in-place",
                    from_container = previous_container.map(Width::get),
                    to_container = current.map(Width::get),
                    width = width.get()
                );
                if self.available_width == Some(width) {
                    return NotifyOutcome::Ignore;
                }
                self.available_width = Some(width);
                self.version += 1;
                NotifyOutcome::Render(host)
            }
        }
    }
}

// ─── Instance ────────────────────────────────────────────────────────────────

/// One mount of an [`AvailableWidth`] component.
///
/// Dropping an instance without calling [`teardown`](Self::teardown) still
/// releases its observation.
pub struct AvailableWidthInstance<C> {
    content: Rc<C>,
    observer: Rc<dyn ChangeObserver>,
    config: ProbeConfig,
    state: Rc<RefCell<InstanceState>>,
}

impl<C> fmt::Debug for AvailableWidthInstance<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("AvailableWidthInstance")
            .field("id", &state.id)
            .field("phase", &state.phase)
            .field("available_width", &state.available_width)
            .field("mounted", &state.mounted)
            .field("observer", &self.observer.name())
            .finish()
    }
}

impl<C> AvailableWidthInstance<C> {
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.state.borrow().id
    }

    #[must_use]
    pub fn state(&self) -> ProbeState {
        self.state.borrow().phase
    }

    /// Measured width, or `None` during the probe phase.
    #[must_use]
    pub fn available_width(&self) -> Option<Width> {
        self.state.borrow().available_width
    }

    /// Whether `did_mount` completed successfully and teardown has not run.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted
    }

    /// Bumped on every state change that schedules a render.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    #[must_use]
    pub fn dirty_cycle(&self) -> DirtyCycle {
        self.state.borrow().cycle
    }

    #[must_use]
    pub fn container(&self) -> Option<ContainerRef> {
        self.state.borrow().context.as_ref().and_then(|c| c.container)
    }

    /// Container width recorded at the last measurement.
    #[must_use]
    pub fn last_container_width(&self) -> Option<Width> {
        self.state
            .borrow()
            .context
            .as_ref()
            .and_then(|c| c.last_container_width)
    }

    /// Position the probe occupied among the container's children.
    #[must_use]
    pub fn probe_index(&self) -> Option<usize> {
        self.state.borrow().context.as_ref().and_then(|c| c.probe_index)
    }

    #[must_use]
    pub fn observer_name(&self) -> &str {
        self.observer.name()
    }

    #[must_use]
    pub fn config(&self) -> ProbeConfig {
        self.config
    }

    /// Render either the probe or the content.
    pub fn render<P>(&self, props: &P) -> Rendered<C::Output>
    where
        C: Content<P>,
    {
        let (id, width, generation) = {
            let state = self.state.borrow();
            (state.id, state.available_width, state.cycle.generation())
        };
        let _span = debug_span!(
            "fitwidth.render",
            instance = id.raw(),
            probe = width.is_none()
        )
        .entered();

        match width {
            None => {
                let scope = (self.config.hide_siblings_during_probe
                    && self.config.policy == RemeasurePolicy::FullReset)
                    .then(|| StyleScope::new(id));
                Rendered::Probe(ProbeElement {
                    instance: id,
                    key: generation,
                    style: ProbeStyle::FILL,
                    scope,
                })
            }
            Some(available_width) => Rendered::Content(
                self.content
                    .render(&WidthProps::new(props, available_width)),
            ),
        }
    }

    /// The committed probe node is in the live tree; read its geometry.
    ///
    /// Returns the measured width, or `None` if the node was not attached
    /// or the instance is already torn down.
    pub fn probe_attached(&self, host: &Rc<dyn LayoutHost>, probe: NodeId) -> Option<Width> {
        let id = {
            let mut state = self.state.borrow_mut();
            if state.phase == ProbeState::Unmounted {
                return None;
            }
            let Some(width) = host.offset_width(probe) else {
                debug!(
                    message = "fitwidth.probe.detached",
                    instance = state.id.raw(),
                    node = probe.raw()
                );
                return None;
            };

            let container = host.parent(probe).map(ContainerRef::new);
            let last_container_width = container.and_then(|c| c.width(host.as_ref()));
            let probe_index = host.index_in_parent(probe);

            state.context = Some(MountContext {
                host: Rc::clone(host),
                container,
                last_container_width,
                probe_index,
            });
            state.available_width = Some(width);
            state.phase = ProbeState::Measured;
            state.cycle.settle();
            state.version += 1;
            PROBE_MEASUREMENTS_TOTAL.fetch_add(1, Ordering::Relaxed);

            debug!(
                message = "fitwidth.probe.measured",
                instance = state.id.raw(),
                width = width.get(),
                container = container.map(|c| c.node().raw()),
                container_width = last_container_width.map(Width::get),
                index = probe_index,
                generation = state.cycle.generation()
            );
            state.id
        };
        host.schedule_render(id);
        self.available_width()
    }

    /// Attach the change observer. Fails if it returns no deregistration
    /// capability, in which case the instance never becomes mounted.
    ///
    /// Calling this again on a mounted instance does nothing.
    pub fn did_mount(&self, host: &Rc<dyn LayoutHost>) -> Result<()> {
        let (id, target) = {
            let state = self.state.borrow();
            if state.mounted || state.phase == ProbeState::Unmounted {
                return Ok(());
            }
            let target = state
                .context
                .as_ref()
                .and_then(|c| c.container)
                .map(ContainerRef::node);
            (state.id, target)
        };

        let attached = self
            .observer
            .attach(host.as_ref(), target, self.notify_callback());
        let handle = validate_attachment(self.observer.name(), target, attached)?;

        debug!(
            message = "fitwidth.observer.attached",
            instance = id.raw(),
            observer = self.observer.name(),
            target = target.map(NodeId::raw)
        );
        let mut state = self.state.borrow_mut();
        state.handle = Some(handle);
        state.mounted = true;
        Ok(())
    }

    /// The callback handed to the observer. Holds only a weak reference, so
    /// a forgotten subscription cannot keep the instance alive.
    fn notify_callback(&self) -> Notify {
        let weak: Weak<RefCell<InstanceState>> = Rc::downgrade(&self.state);
        let config = self.config;
        Rc::new(move || {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let (outcome, id) = {
                let mut s = state.borrow_mut();
                (s.on_notify(config), s.id)
            };
            if let NotifyOutcome::Render(host) = outcome {
                host.schedule_render(id);
            }
        })
    }

    /// Deliver a notification as if the observer fired. Hosts that multiplex
    /// their own events can call this directly.
    pub fn notify(&self) {
        (self.notify_callback())();
    }

    /// Release the observation and enter `Unmounted`.
    ///
    /// Returns `true` if a deregistration ran. Later calls return `false`.
    pub fn teardown(&self) -> bool {
        let (id, handle) = {
            let mut state = self.state.borrow_mut();
            if state.phase == ProbeState::Unmounted {
                return false;
            }
            state.phase = ProbeState::Unmounted;
            state.mounted = false;
            state.context = None;
            (state.id, state.handle.take())
        };
        let released = handle.is_some_and(|mut h| h.release());
        debug!(message = "fitwidth.teardown", instance = id.raw(), released);
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::content_fn;
    use crate::test_host::GeometryHost;
    use fitwidth_core::ObserverKind;
    use fitwidth_observe::{Deregister, observer_fn};
    use std::cell::Cell;

    fn label() -> impl Content<&'static str, Output = String> {
        content_fn(|p: &WidthProps<'_, &'static str>| format!("{}:{}", p.props, p.available_width))
    }

    fn mount<C>(
        host: &Rc<GeometryHost>,
        instance: &AvailableWidthInstance<C>,
        container_width: u32,
    ) -> (NodeId, NodeId) {
        let container = host.add_root(container_width);
        let probe = host.add_child(container, container_width);
        let dyn_host: Rc<dyn LayoutHost> = host.clone();
        instance.probe_attached(&dyn_host, probe);
        instance.did_mount(&dyn_host).expect("mount succeeds");
        (container, probe)
    }

    #[test]
    fn initial_render_is_probe() {
        let widget = AvailableWidth::new(label());
        let instance = widget.instance();
        let rendered = instance.render(&"hi");
        let probe = rendered.probe().expect("probe first");
        assert_eq!(probe.instance, instance.id());
        assert_eq!(probe.key, 0);
        assert_eq!(probe.style, ProbeStyle::FILL);
        assert!(probe.scope.is_none());
        assert_eq!(instance.state(), ProbeState::Initial);
    }

    #[test]
    fn probe_measurement_swaps_to_content() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        let (container, _probe) = mount(&host, &instance, 320);

        assert_eq!(instance.available_width(), Some(Width::px(320)));
        assert_eq!(instance.state(), ProbeState::Measured);
        assert_eq!(instance.container().map(ContainerRef::node), Some(container));
        assert_eq!(instance.probe_index(), Some(0));
        assert_eq!(host.scheduled(), vec![instance.id()]);
        assert_eq!(
            instance.render(&"hi").into_content(),
            Some("hi:320px".to_owned())
        );
    }

    #[test]
    fn invalid_observer_blocks_mount() {
        let host = Rc::new(GeometryHost::default());
        let widget = AvailableWidth::new(label()).observer(observer_fn("bogus", |_, _, _| None));
        let instance = widget.instance();
        let container = host.add_root(100);
        let probe = host.add_child(container, 100);
        let dyn_host: Rc<dyn LayoutHost> = host.clone();
        instance.probe_attached(&dyn_host, probe);

        let err = instance.did_mount(&dyn_host).unwrap_err();
        assert!(err.is_observer_contract());
        assert!(!instance.is_mounted());
        assert!(!instance.teardown());
    }

    #[test]
    fn spurious_notify_leaves_state_untouched() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        mount(&host, &instance, 300);
        host.take_scheduled();
        let version = instance.version();
        let before = spurious_notifications_total();

        host.viewport.emit();
        host.viewport.emit();

        assert_eq!(instance.version(), version);
        assert!(host.scheduled().is_empty());
        assert!(spurious_notifications_total() >= before + 2);
    }

    #[test]
    fn in_place_remeasure_updates_width() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        let (container, probe) = mount(&host, &instance, 300);
        host.take_scheduled();

        host.set_width(container, 150);
        host.set_width(probe, 150);
        host.viewport.emit();

        assert_eq!(instance.available_width(), Some(Width::px(150)));
        assert_eq!(instance.state(), ProbeState::Measured);
        assert_eq!(instance.last_container_width(), Some(Width::px(150)));
        assert_eq!(host.take_scheduled(), vec![instance.id()]);
    }

    #[test]
    fn each_real_change_schedules_its_own_render() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        let (container, probe) = mount(&host, &instance, 300);
        host.take_scheduled();

        host.set_width(container, 200);
        host.set_width(probe, 200);
        host.viewport.emit();
        host.set_width(container, 100);
        host.set_width(probe, 100);
        host.viewport.emit();

        // No render ran in between: both changes are still queued.
        assert_eq!(host.scheduled(), vec![instance.id(), instance.id()]);
        assert_eq!(instance.available_width(), Some(Width::px(100)));
        assert_eq!(instance.last_container_width(), Some(Width::px(100)));
    }

    #[test]
    fn config_can_come_from_a_key_lookup() {
        let widget = AvailableWidth::from_lookup(label(), |key| {
            (key == "FITWIDTH_REMEASURE").then(|| "full-reset".to_owned())
        })
        .unwrap();
        assert_eq!(widget.probe_config().policy, RemeasurePolicy::FullReset);
        assert!(widget.probe_config().skip_unchanged);

        let err = AvailableWidth::from_lookup(label(), |key| {
            (key == "FITWIDTH_SKIP_UNCHANGED").then(|| "maybe".to_owned())
        })
        .unwrap_err();
        assert!(matches!(err, fitwidth_core::FitError::InvalidConfig { .. }));
    }

    #[test]
    fn in_place_falls_back_to_reset_when_point_is_gone() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        let (container, probe) = mount(&host, &instance, 300);
        host.set_width(container, 200);
        host.detach(probe);

        host.viewport.emit();

        assert_eq!(instance.state(), ProbeState::Initial);
        assert_eq!(instance.available_width(), None);
        assert_eq!(instance.dirty_cycle().generation(), 1);
        assert!(instance.render(&"x").is_probe());
    }

    #[test]
    fn full_reset_rekeys_probe() {
        let host = Rc::new(GeometryHost::default());
        let config = ProbeConfig::default()
            .with_policy(RemeasurePolicy::FullReset)
            .with_hide_siblings(true);
        let instance = AvailableWidth::new(label()).config(config).instance();
        let (container, _) = mount(&host, &instance, 300);

        host.set_width(container, 280);
        host.viewport.emit();

        let rendered = instance.render(&"x");
        let probe = rendered.probe().expect("reset renders a probe");
        assert_eq!(probe.key, 1);
        assert_eq!(probe.scope, Some(StyleScope::new(instance.id())));
        assert!(instance.dirty_cycle().is_dirty());
    }

    #[test]
    fn without_skip_every_notify_rerenders() {
        let host = Rc::new(GeometryHost::default());
        let config = ProbeConfig::default()
            .with_policy(RemeasurePolicy::FullReset)
            .with_skip_unchanged(false);
        let instance = AvailableWidth::new(label()).config(config).instance();
        mount(&host, &instance, 300);

        host.viewport.emit();
        assert_eq!(instance.state(), ProbeState::Initial);
    }

    #[test]
    fn teardown_releases_once_and_silences_notify() {
        let host = Rc::new(GeometryHost::default());
        let releases = Rc::new(Cell::new(0));
        let r = Rc::clone(&releases);
        let widget = AvailableWidth::new(label()).observer(observer_fn(
            "counting",
            move |host: &dyn LayoutHost, _, notify| {
                let signal = host.viewport_resize().clone();
                let id = signal.subscribe(notify);
                let r = Rc::clone(&r);
                Some(Deregister::new(move || {
                    signal.unsubscribe(id);
                    r.set(r.get() + 1);
                }))
            },
        ));
        let instance = widget.instance();
        let (container, _) = mount(&host, &instance, 300);

        assert!(instance.teardown());
        assert!(!instance.teardown());
        drop(instance);
        assert_eq!(releases.get(), 1);

        host.set_width(container, 10);
        assert_eq!(host.viewport.emit(), 0);
    }

    #[test]
    fn dropping_instance_releases_observation() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        mount(&host, &instance, 300);
        assert_eq!(host.viewport.listener_count(), 1);
        drop(instance);
        assert_eq!(host.viewport.listener_count(), 0);
    }

    #[test]
    fn observer_follows_config_unless_overridden() {
        let widget = AvailableWidth::new(label());
        assert_eq!(widget.observer_name(), "viewport");
        let widget = widget.config(ProbeConfig::default().with_observer(ObserverKind::Container));
        assert_eq!(widget.observer_name(), "container");

        let options = AvailableWidthOptions {
            observer_implementation: Some(Rc::new(observer_fn("custom", |_, _, _| {
                Some(Deregister::noop())
            }))),
            probe: ProbeConfig::default().with_observer(ObserverKind::Container),
        };
        let widget = AvailableWidth::with_options(label(), options);
        assert_eq!(widget.observer_name(), "custom");
    }

    #[test]
    fn did_mount_is_idempotent() {
        let host = Rc::new(GeometryHost::default());
        let instance = AvailableWidth::new(label()).instance();
        mount(&host, &instance, 50);
        let dyn_host: Rc<dyn LayoutHost> = host.clone();
        instance.did_mount(&dyn_host).unwrap();
        assert_eq!(host.viewport.listener_count(), 1);
    }
}
