#![forbid(unsafe_code)]

//! Available-width probing for arbitrary content.
//!
//! [`AvailableWidth`] wraps a [`Content`] and injects the width its rendering
//! context allocates to it. The first render emits a placeholder
//! ([`ProbeElement`]) that grows to fill the parent's free space; once the host
//! commits it, its width is read and the placeholder is swapped for the real
//! content. A [`ChangeObserver`](fitwidth_observe::ChangeObserver) then keeps
//! the width current for the lifetime of the mount.

pub mod available_width;
pub mod content;
pub mod probe;
pub mod props;

pub use available_width::{
    AvailableWidth, AvailableWidthInstance, AvailableWidthOptions, probe_measurements_total,
    spurious_notifications_total,
};
pub use content::{Content, FnContent, WidthProps, content_fn};
pub use probe::{DirtyCycle, ProbeElement, ProbeState, ProbeStyle, Rendered, StyleScope};
pub use props::{AVAILABLE_WIDTH_KEY, PropMap, merge_available_width, merge_width_as};

#[cfg(test)]
pub(crate) mod test_host;
