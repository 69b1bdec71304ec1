//! The state of a decoding session.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::{Buf, Bytes, BytesMut};
use crate::grammar::{Action, Transition};
use crate::tag::Tag;
use crate::tlv::Tlv;
use super::error::Pos;
use super::stack::Stack;


//------------ Container -----------------------------------------------------

/// Everything a decoding session needs to remember between calls.
///
/// The container owns the input that hasn’t been consumed yet, the frames
/// of the constructed values currently open, the grammar state, the value
/// currently being read, and the output under construction. Since all of it
/// lives here rather than on the call stack, decoding can stop whenever
/// the input runs dry and pick up again once more data arrives.
pub struct Container<'g, S, A: Action> {
    /// The input not consumed yet.
    pub(super) buf: BytesMut,

    /// The stream position of the first octet in `buf`.
    pub(super) pos: usize,

    /// The stream position where the current message started.
    pub(super) pdu_start: usize,

    /// The open constructed values.
    pub(super) stack: Stack<'g, S>,

    /// The current grammar state.
    pub(super) state: S,

    /// How far the current value has been read.
    pub(super) phase: Phase<'g, S, A>,

    /// The value most recently handed to an action.
    pub(super) tlv: Option<Tlv>,

    /// The output under construction.
    pub(super) output: A::Output,
}

impl<'g, S: Copy, A: Action> Container<'g, S, A> {
    pub(super) fn new(init: S) -> Self {
        Container {
            buf: BytesMut::new(),
            pos: 0,
            pdu_start: 0,
            stack: Stack::default(),
            state: init,
            phase: Phase::Tag,
            tlv: None,
            output: A::Output::default(),
        }
    }

    /// Returns the stream position of the next octet to be read.
    pub fn pos(&self) -> Pos {
        self.pos.into()
    }

    /// Returns the current grammar state.
    pub fn state(&self) -> S {
        self.state
    }

    /// Returns the number of constructed values currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the number of octets received but not consumed yet.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Returns the value most recently handed to an action.
    pub fn current_tlv(&self) -> Option<&Tlv> {
        self.tlv.as_ref()
    }

    /// Returns a reference to the output under construction.
    pub fn output(&self) -> &A::Output {
        &self.output
    }

    /// Skips over `len` octets of input.
    pub(super) fn advance(&mut self, len: usize) {
        self.buf.advance(len);
        self.pos += len;
    }

    /// Splits off the next `len` octets of input.
    pub(super) fn take(&mut self, len: usize) -> Bytes {
        self.pos += len;
        self.buf.split_to(len).freeze()
    }

    /// Prepares for the next message in the same stream.
    ///
    /// Input already received is kept.
    pub(super) fn restart(&mut self, init: S) {
        self.pdu_start = self.pos;
        self.stack.clear();
        self.state = init;
        self.phase = Phase::Tag;
        self.tlv = None;
    }
}


//------------ Phase ---------------------------------------------------------

/// How far the current value has been read.
pub(super) enum Phase<'g, S, A> {
    /// Waiting for the identifier octets.
    Tag,

    /// Waiting for the length octets.
    ///
    /// The transition is `None` for an end-of-contents marker.
    Length {
        tag: Tag,
        start: Pos,
        transition: Option<&'g Transition<S, A>>,
    },

    /// Waiting for all content octets of a primitive value.
    Value {
        tag: Tag,
        start: Pos,
        length: usize,
        transition: &'g Transition<S, A>,
    },
}

impl<S, A> Phase<'_, S, A> {
    pub(super) fn is_tag(&self) -> bool {
        matches!(self, Phase::Tag)
    }
}
