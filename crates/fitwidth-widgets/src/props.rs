#![forbid(unsafe_code)]

//! Untyped pass-through: props as a JSON object.
//!
//! The merge is shallow. The width goes in first and every incoming prop is
//! laid over it, so an incoming prop with the same key wins.

use fitwidth_core::Width;
use serde_json::{Map, Value};

use crate::content::WidthProps;

/// Dynamic props.
pub type PropMap = Map<String, Value>;

/// Key the width is injected under by default.
pub const AVAILABLE_WIDTH_KEY: &str = "availableWidth";

/// `props` plus `availableWidth`.
#[must_use]
pub fn merge_available_width(props: &PropMap, width: Width) -> PropMap {
    merge_width_as(props, width, AVAILABLE_WIDTH_KEY)
}

/// `props` plus the width under a caller-chosen key.
#[must_use]
pub fn merge_width_as(props: &PropMap, width: Width, key: &str) -> PropMap {
    let mut merged = PropMap::with_capacity(props.len() + 1);
    merged.insert(key.to_owned(), Value::from(width.get()));
    for (k, v) in props {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

impl WidthProps<'_, PropMap> {
    /// Flatten into a single map with `availableWidth` injected.
    #[must_use]
    pub fn merged(&self) -> PropMap {
        merge_available_width(self.props, self.available_width)
    }
}
