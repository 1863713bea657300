#![forbid(unsafe_code)]

//! Probe and observer configuration.
//!
//! Defaults favour the cheapest correct behaviour: re-measure in place and
//! skip notifications that did not change the container width. Every field
//! can be overridden from the environment via [`ProbeConfig::from_env`].
//!
//! | Variable                  | Values                     | Default    |
//! |---------------------------|----------------------------|------------|
//! | `FITWIDTH_REMEASURE`      | `in-place`, `full-reset`   | `in-place` |
//! | `FITWIDTH_SKIP_UNCHANGED` | `1`, `true`, `0`, `false`  | `true`     |
//! | `FITWIDTH_HIDE_SIBLINGS`  | `1`, `true`, `0`, `false`  | `false`    |
//! | `FITWIDTH_OBSERVER`       | `viewport`, `container`    | `viewport` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

pub const ENV_REMEASURE: &str = "FITWIDTH_REMEASURE";
pub const ENV_SKIP_UNCHANGED: &str = "FITWIDTH_SKIP_UNCHANGED";
pub const ENV_HIDE_SIBLINGS: &str = "FITWIDTH_HIDE_SIBLINGS";
pub const ENV_OBSERVER: &str = "FITWIDTH_OBSERVER";

/// What to do once a notification is accepted as a real width change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemeasurePolicy {
    /// Keep the content rendered and re-read the width at the probe's
    /// recorded position in the container.
    #[default]
    InPlace,
    /// Drop the measured width and run the probe phase again with a fresh
    /// placeholder node.
    FullReset,
}

impl RemeasurePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InPlace => "in-place",
            Self::FullReset => "full-reset",
        }
    }
}

impl fmt::Display for RemeasurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemeasurePolicy {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-place" | "inplace" => Ok(Self::InPlace),
            "full-reset" | "reset" => Ok(Self::FullReset),
            _ => Err(FitError::invalid_config(ENV_REMEASURE, s)),
        }
    }
}

/// Built-in change observer strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObserverKind {
    /// Watch the top-level viewport resize signal. Coarse but always available.
    #[default]
    Viewport,
    /// Watch the container node through the host's native resize observation.
    Container,
}

impl ObserverKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewport => "viewport",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for ObserverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObserverKind {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viewport" | "window" => Ok(Self::Viewport),
            "container" | "node" => Ok(Self::Container),
            _ => Err(FitError::invalid_config(ENV_OBSERVER, s)),
        }
    }
}

/// Per-component probe configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Re-measurement strategy after an accepted notification.
    pub policy: RemeasurePolicy,

    /// Compare the container width against the last known value before
    /// acting on a notification, and ignore it when unchanged.
    /// Default: true.
    pub skip_unchanged: bool,

    /// While a probe is active under [`RemeasurePolicy::FullReset`], emit a
    /// scoped style rule that hides the probe's following siblings.
    /// Default: false.
    pub hide_siblings_during_probe: bool,

    /// Built-in observer used when no custom implementation is supplied.
    pub observer: ObserverKind,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            policy: RemeasurePolicy::InPlace,
            skip_unchanged: true,
            hide_siblings_during_probe: false,
            observer: ObserverKind::Viewport,
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn with_policy(mut self, policy: RemeasurePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    #[must_use]
    pub fn with_hide_siblings(mut self, hide: bool) -> Self {
        self.hide_siblings_during_probe = hide;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: ObserverKind) -> Self {
        self.observer = observer;
        self
    }

    /// Build a config from the process environment, starting from defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Missing keys keep their defaults; malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(val) = lookup(ENV_REMEASURE) {
            config.policy = val.parse()?;
        }
        if let Some(val) = lookup(ENV_SKIP_UNCHANGED) {
            config.skip_unchanged = parse_flag(ENV_SKIP_UNCHANGED, &val)?;
        }
        if let Some(val) = lookup(ENV_HIDE_SIBLINGS) {
            config.hide_siblings_during_probe = parse_flag(ENV_HIDE_SIBLINGS, &val)?;
        }
        if let Some(val) = lookup(ENV_OBSERVER) {
            config.observer = val.parse()?;
        }
        Ok(config)
    }
}

fn parse_flag(key: &str, val: &str) -> Result<bool> {
    let v = val.trim();
    if v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes") {
        Ok(true)
    } else if v == "0" || v.eq_ignore_ascii_case("false") || v.eq_ignore_ascii_case("no") {
        Ok(false)
    } else {
        Err(FitError::invalid_config(key, val))
    }
}
