#![forbid(unsafe_code)]

//! Test harness: a deterministic host render tree and a stage that drives
//! wrapped components through render, commit, notify, and teardown.
//!
//! [`HostTree`] lays out a small node tree (block and flex-row containers,
//! fixed and growing children) and exposes it through
//! [`LayoutHost`](fitwidth_core::LayoutHost). [`Stage`] plays the host
//! environment's role: it commits probe and content nodes, calls the
//! lifecycle hooks in order, and drains scheduled renders.

pub mod stage;
pub mod tree;

pub use stage::{Mount, Stage};
pub use tree::{Display, HostTree, NodeStyle};
