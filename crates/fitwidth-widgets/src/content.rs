#![forbid(unsafe_code)]

//! Content rendered once a width is known.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use fitwidth_core::Width;

/// The caller's props plus the measured width.
///
/// Derefs to the caller's props, so content reads them as if unwrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthProps<'a, P> {
    pub props: &'a P,
    pub available_width: Width,
}

impl<'a, P> WidthProps<'a, P> {
    #[must_use]
    pub fn new(props: &'a P, available_width: Width) -> Self {
        Self {
            props,
            available_width,
        }
    }
}

impl<P> Deref for WidthProps<'_, P> {
    type Target = P;

    fn deref(&self) -> &P {
        self.props
    }
}

/// Something that renders given props and an available width.
pub trait Content<P> {
    type Output;

    fn render(&self, props: &WidthProps<'_, P>) -> Self::Output;
}

/// [`Content`] backed by a closure.
pub struct FnContent<F, O> {
    render: F,
    _output: PhantomData<fn() -> O>,
}

impl<F, O> fmt::Debug for FnContent<F, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnContent(..)")
    }
}

/// Wrap a render closure as [`Content`].
pub fn content_fn<P, O, F>(render: F) -> FnContent<F, O>
where
    F: Fn(&WidthProps<'_, P>) -> O,
{
    FnContent {
        render,
        _output: PhantomData,
    }
}

impl<P, O, F> Content<P> for FnContent<F, O>
where
    F: Fn(&WidthProps<'_, P>) -> O,
{
    type Output = O;

    fn render(&self, props: &WidthProps<'_, P>) -> O {
        (self.render)(props)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Greeting {
        name: &'static str,
    }

    #[test]
    fn fn_content_sees_props_and_width() {
        let content = content_fn(|p: &WidthProps<'_, Greeting>| {
            format!("{} @ {}", p.name, p.available_width)
        });
        let props = Greeting { name: "ada" };
        let out = content.render(&WidthProps::new(&props, Width::px(320)));
        assert_eq!(out, "ada @ 320px");
    }

    #[test]
    fn deref_exposes_inner_props() {
        let props = Greeting { name: "x" };
        let wp = WidthProps::new(&props, Width::ZERO);
        assert_eq!(wp.name, "x");
    }
}
