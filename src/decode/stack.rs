//! The stack of open constructed values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use smallvec::SmallVec;
use crate::tag::Tag;
use super::error::Pos;


//------------ Stack ---------------------------------------------------------

/// The frames of all constructed values currently open.
///
/// The innermost value is at the top. Most messages nest only a few levels
/// deep, so the frames are kept inline until that gets exceeded.
#[derive(Clone, Debug)]
pub(crate) struct Stack<'g, S> {
    items: SmallVec<[Frame<'g, S>; 8]>,
}

impl<S> Default for Stack<'_, S> {
    fn default() -> Self {
        Self { items: SmallVec::new() }
    }
}

impl<'g, S> Stack<'g, S> {
    pub fn push(&mut self, frame: Frame<'g, S>) {
        self.items.push(frame)
    }

    pub fn pop(&mut self) -> Option<Frame<'g, S>> {
        self.items.pop()
    }

    pub fn top(&self) -> Option<&Frame<'g, S>> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear()
    }

    /// Returns the position all content must end before.
    ///
    /// This is the end of the innermost definite-length value, if there is
    /// one.
    pub fn limit(&self) -> Option<usize> {
        self.top().and_then(|frame| frame.limit)
    }

    /// Returns whether the innermost frame ends at `pos`.
    pub fn top_ends_at(&self, pos: usize) -> bool {
        self.top().map(|frame| frame.end == Some(pos)).unwrap_or(false)
    }

    /// Returns whether the innermost frame has indefinite length.
    pub fn top_is_indefinite(&self) -> bool {
        self.top().map(|frame| frame.end.is_none()).unwrap_or(false)
    }
}


//------------ Frame ---------------------------------------------------------

/// An open constructed value.
#[derive(Clone, Debug)]
pub(crate) struct Frame<'g, S> {
    /// The tag of the value.
    pub tag: Tag,

    /// The position of the first identifier octet.
    pub start: Pos,

    /// The position after the last content octet.
    ///
    /// This is `None` for an indefinite-length value which ends with an
    /// end-of-contents marker instead.
    pub end: Option<usize>,

    /// The position all content must end before.
    ///
    /// For a definite-length value, this is `end`. An indefinite-length
    /// value inherits the limit of its enclosing value.
    pub limit: Option<usize>,

    /// The states the content may end in.
    pub ends: &'g [S],

    /// The state to switch to when the frame is closed.
    pub resume: Option<S>,
}

impl<'g, S: PartialEq> Frame<'g, S> {
    /// Creates a frame for a value nested in `stack`.
    pub fn new(
        stack: &Stack<'g, S>,
        tag: Tag,
        start: Pos,
        end: Option<usize>,
        ends: &'g [S],
        resume: Option<S>,
    ) -> Self {
        Frame {
            tag, start, end,
            limit: end.or_else(|| stack.limit()),
            ends, resume
        }
    }

    /// Returns whether the content may end in `state`.
    pub fn may_end_in(&self, state: &S) -> bool {
        self.ends.contains(state)
    }
}


//============ Tests =========================================================
