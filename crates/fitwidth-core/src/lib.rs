#![forbid(unsafe_code)]

//! Core: geometry, host contract, subscription signals, errors, and configuration.

pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod node;
pub mod signal;

pub use config::{ObserverKind, ProbeConfig, RemeasurePolicy};
pub use error::{FitError, Result};
pub use geometry::Width;
pub use host::LayoutHost;
pub use node::{ContainerRef, InstanceId, NodeId};
pub use signal::{KeyedSignal, Listener, Signal, SubscriptionId};
