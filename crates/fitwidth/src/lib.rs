#![forbid(unsafe_code)]

//! fitwidth public facade crate.
//!
//! This crate provides the stable surface area for users: the wrapper, the
//! built-in observers, configuration, and errors.

pub use fitwidth_core::{FitError, ObserverKind, ProbeConfig, RemeasurePolicy, Result, Width};
pub use fitwidth_observe::{
    ChangeObserver, ContainerObserver, Deregister, ViewportObserver, observer_fn,
};
pub use fitwidth_widgets::{AvailableWidth, AvailableWidthOptions, Content, WidthProps, content_fn};

pub mod prelude {
    pub use fitwidth_core as core;
    #[cfg(feature = "harness")]
    pub use fitwidth_harness as harness;
    pub use fitwidth_observe as observe;
    pub use fitwidth_widgets as widgets;
}
