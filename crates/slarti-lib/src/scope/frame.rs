//! Lookup frames: the descriptions visible at a point of the walk.

use crate::descriptions::Description;

/// An immutable chain of description slices, searched outer to inner.
///
/// Nested calls extend a frame with [`Frame::push`] instead of copying it, so
/// a callee can never observe or disturb the caller's entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct Frame<'a> {
    outer: Option<&'a Frame<'a>>,
    entries: &'a [Description],
}

impl<'a> Frame<'a> {
    pub fn new(entries: &'a [Description]) -> Self {
        Self {
            outer: None,
            entries,
        }
    }

    /// This frame followed by `entries`.
    pub fn push<'b>(&'b self, entries: &'b [Description]) -> Frame<'b> {
        Frame {
            outer: Some(self),
            entries,
        }
    }

    /// Every visible description, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Description> {
        let mut segments = Vec::new();
        let mut frame = Some(self);
        while let Some(f) = frame {
            segments.push(f.entries);
            frame = f.outer;
        }
        segments.into_iter().rev().flatten()
    }

    /// First description named exactly `name`.
    pub fn lookup(&self, name: &str) -> Option<&'a Description> {
        self.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len() + self.outer.map_or(0, |o| o.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
