#![forbid(unsafe_code)]

//! The placeholder element and the probe lifecycle state.

use fitwidth_core::InstanceId;

/// Lifecycle of one wrapped component.
///
/// ```text
/// Initial ──measure──▶ Measured ──notify──▶ Stale ──re-read──▶ Measured
///    ▲                    │                   │
///    └──── full reset ────┴───────────────────┘
/// any ──teardown──▶ Unmounted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeState {
    /// No geometry yet; the probe is rendered.
    Initial,
    /// Width known; content is rendered.
    Measured,
    /// Width known but flagged for re-measurement.
    Stale,
    /// Torn down. Terminal.
    Unmounted,
}

impl ProbeState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Measured => "measured",
            Self::Stale => "stale",
            Self::Unmounted => "unmounted",
        }
    }
}

/// Validity of the measured content across invalidations.
///
/// `generation` keys the probe element so the host builds a new node after
/// each invalidation instead of reusing one whose reflow may be suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DirtyCycle {
    dirty: bool,
    generation: u64,
}

impl Default for DirtyCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtyCycle {
    /// Start dirty at generation zero: nothing has been measured yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dirty: true,
            generation: 0,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Mark content invalid and advance the generation.
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.generation += 1;
    }

    /// Mark content valid for the current generation.
    pub fn settle(&mut self) {
        self.dirty = false;
    }
}

/// Layout request for the probe: grow into all free space along the main
/// axis and span the full cross extent. It has no content of its own, so its
/// size is purely the parent's allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeStyle {
    pub flex_grow: u32,
    pub width_percent: u8,
}

impl ProbeStyle {
    pub const FILL: Self = Self {
        flex_grow: 1,
        width_percent: 100,
    };
}

impl Default for ProbeStyle {
    fn default() -> Self {
        Self::FILL
    }
}

/// A style rule scoped to one instance, hiding the probe's following
/// siblings while the probe is in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleScope {
    instance: InstanceId,
}

impl StyleScope {
    /// Attribute the host sets on the probe node.
    pub const ATTRIBUTE: &'static str = "data-fitwidth-probe";

    #[must_use]
    pub const fn new(instance: InstanceId) -> Self {
        Self { instance }
    }

    #[must_use]
    pub const fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Value for [`Self::ATTRIBUTE`].
    #[must_use]
    pub fn attribute_value(&self) -> String {
        self.instance.raw().to_string()
    }

    /// The scoped rule text.
    #[must_use]
    pub fn rule(&self) -> String {
        format!(
            "[{}=\"{}\"] ~ * {{ visibility: hidden; }}",
            Self::ATTRIBUTE,
            self.instance.raw()
        )
    }
}

/// The transient placeholder a wrapped component renders before it knows
/// its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeElement {
    pub instance: InstanceId,
    /// Changes after each invalidation; a host must not reuse a probe node
    /// across keys.
    pub key: u64,
    pub style: ProbeStyle,
    pub scope: Option<StyleScope>,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered<T> {
    Probe(ProbeElement),
    Content(T),
}

impl<T> Rendered<T> {
    #[must_use]
    pub fn is_probe(&self) -> bool {
        matches!(self, Self::Probe(_))
    }

    #[must_use]
    pub fn probe(&self) -> Option<&ProbeElement> {
        match self {
            Self::Probe(p) => Some(p),
            Self::Content(_) => None,
        }
    }

    #[must_use]
    pub fn content(&self) -> Option<&T> {
        match self {
            Self::Probe(_) => None,
            Self::Content(c) => Some(c),
        }
    }

    #[must_use]
    pub fn into_content(self) -> Option<T> {
        match self {
            Self::Probe(_) => None,
            Self::Content(c) => Some(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirty_cycle_starts_dirty() {
        let cycle = DirtyCycle::new();
        assert!(cycle.is_dirty());
        assert_eq!(cycle.generation(), 0);
    }

    #[test]
    fn invalidate_bumps_generation_every_time() {
        let mut cycle = DirtyCycle::new();
        cycle.settle();
        assert!(!cycle.is_dirty());
        cycle.invalidate();
        cycle.invalidate();
        assert!(cycle.is_dirty());
        assert_eq!(cycle.generation(), 2);
        cycle.settle();
        assert_eq!(cycle.generation(), 2);
    }

    #[test]
    fn scope_rule_targets_following_siblings() {
        let id = InstanceId::next();
        let scope = StyleScope::new(id);
        assert_eq!(
            scope.rule(),
            format!("[data-fitwidth-probe=\"{}\"] ~ * {{ visibility: hidden; }}", id.raw())
        );
        assert_eq!(scope.attribute_value(), id.raw().to_string());
    }

    #[test]
    fn probe_style_fills() {
        assert_eq!(ProbeStyle::default(), ProbeStyle::FILL);
        assert_eq!(ProbeStyle::FILL.flex_grow, 1);
        assert_eq!(ProbeStyle::FILL.width_percent, 100);
    }

    #[test]
    fn rendered_accessors() {
        let r: Rendered<u8> = Rendered::Content(3);
        assert!(!r.is_probe());
        assert_eq!(r.content(), Some(&3));
        assert!(r.probe().is_none());
        assert_eq!(r.into_content(), Some(3));
    }
}
