//! The resumable decoder.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, mem};
use std::marker::PhantomData;
use log::{debug, trace};
use crate::grammar::{Action, Grammar, State, Transition};
use crate::length::Length;
use crate::mode::{Ber, Der, Mode};
use crate::tag::Tag;
use crate::tlv::Tlv;
use super::container::{Container, Phase};
use super::error::{DecodeError, Pos};
use super::stack::Frame;


//------------ DecodeOutcome -------------------------------------------------

/// The result of feeding a chunk of data to a decoder.
#[derive(Debug, Eq, PartialEq)]
#[must_use]
pub enum DecodeOutcome<T> {
    /// All data has been consumed but the message isn’t complete yet.
    NeedMoreData,

    /// A message has been decoded.
    ///
    /// There may be more data buffered already which belongs to the next
    /// message. Check [`Decoder::buffered`].
    Complete(T),

    /// Decoding failed.
    Failed(DecodeError),
}

impl<T> DecodeOutcome<T> {
    /// Returns whether more data is needed.
    pub fn is_need_more_data(&self) -> bool {
        matches!(self, DecodeOutcome::NeedMoreData)
    }

    /// Returns whether a message was completed.
    pub fn is_complete(&self) -> bool {
        matches!(self, DecodeOutcome::Complete(_))
    }

    /// Returns whether decoding failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, DecodeOutcome::Failed(_))
    }

    /// Converts the outcome into a result.
    ///
    /// Returns `Ok(None)` if more data is needed.
    pub fn into_result(self) -> Result<Option<T>, DecodeError> {
        match self {
            DecodeOutcome::NeedMoreData => Ok(None),
            DecodeOutcome::Complete(res) => Ok(Some(res)),
            DecodeOutcome::Failed(err) => Err(err),
        }
    }
}


//------------ Limits --------------------------------------------------------

/// Limits protecting a decoder against hostile input.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    /// The maximum number of nested constructed values.
    max_depth: usize,

    /// The maximum size of an encoded message in octets.
    max_pdu_size: usize,
}

impl Limits {
    /// The default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 32;

    /// The default maximum message size of one mebibyte.
    pub const DEFAULT_MAX_PDU_SIZE: usize = 1 << 20;

    /// Sets the maximum number of nested constructed values.
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Limits { max_depth, ..self }
    }

    /// Sets the maximum size of a message in octets.
    ///
    /// Use `usize::MAX` to effectively disable the limit.
    pub fn with_max_pdu_size(self, max_pdu_size: usize) -> Self {
        Limits { max_pdu_size, ..self }
    }

    /// Returns the maximum nesting depth.
    pub fn max_depth(self) -> usize {
        self.max_depth
    }

    /// Returns the maximum message size.
    pub fn max_pdu_size(self) -> usize {
        self.max_pdu_size
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_pdu_size: Self::DEFAULT_MAX_PDU_SIZE,
        }
    }
}


//------------ Decoder -------------------------------------------------------

/// A decoding session for messages described by a grammar.
///
/// The decoder is fed the encoded data in chunks of arbitrary size through
/// [`decode`][Self::decode]. Whenever a chunk ends in the middle of a
/// message, the decoder keeps everything it needs and returns
/// [`DecodeOutcome::NeedMoreData`]. Once the grammar reaches its end state,
/// the output is returned and the decoder starts over with the next message
/// of the stream.
///
/// The encoding rules are selected through the type argument `M`. It
/// defaults to [`Ber`].
///
/// Any error is fatal. Afterwards, the decoder refuses to continue until it
/// is [reset][Self::reset].
pub struct Decoder<'g, S, A: Action, M = Ber> {
    /// The grammar describing the messages.
    grammar: &'g Grammar<S, A>,

    /// The session state.
    container: Container<'g, S, A>,

    /// The limits for the session.
    limits: Limits,

    /// Has there been a fatal error?
    poisoned: bool,

    /// The encoding rules.
    marker: PhantomData<M>,
}

impl<'g, S: State, A: Action> Decoder<'g, S, A, Ber> {
    /// Creates a new decoder using the Basic Encoding Rules.
    pub fn new(grammar: &'g Grammar<S, A>) -> Self {
        Self::with_mode(grammar)
    }
}

impl<'g, S: State, A: Action> Decoder<'g, S, A, Der> {
    /// Creates a new decoder using the Distinguished Encoding Rules.
    pub fn new_der(grammar: &'g Grammar<S, A>) -> Self {
        Self::with_mode(grammar)
    }
}

impl<'g, S: State, A: Action, M: Mode> Decoder<'g, S, A, M> {
    /// Creates a new decoder for the encoding rules given by `M`.
    pub fn with_mode(grammar: &'g Grammar<S, A>) -> Self {
        Decoder {
            grammar,
            container: Container::new(grammar.init()),
            limits: Limits::default(),
            poisoned: false,
            marker: PhantomData,
        }
    }

    /// Sets the limits of the decoder.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Sets the maximum number of nested constructed values.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.limits = self.limits.with_max_depth(max_depth);
        self
    }

    /// Sets the maximum size of a message in octets.
    pub fn with_max_pdu_size(mut self, max_pdu_size: usize) -> Self {
        self.limits = self.limits.with_max_pdu_size(max_pdu_size);
        self
    }

    /// Returns the grammar of the decoder.
    pub fn grammar(&self) -> &'g Grammar<S, A> {
        self.grammar
    }

    /// Returns the limits of the decoder.
    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Returns the session state.
    pub fn container(&self) -> &Container<'g, S, A> {
        &self.container
    }

    /// Returns the stream position of the next octet to be read.
    pub fn pos(&self) -> Pos {
        self.container.pos()
    }

    /// Returns the number of octets received but not consumed yet.
    pub fn buffered(&self) -> usize {
        self.container.buffered()
    }

    /// Returns whether the decoder has failed.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Discards all state and starts over with a fresh stream.
    ///
    /// This also clears the error state of a failed decoder.
    pub fn reset(&mut self) {
        self.container = Container::new(self.grammar.init());
        self.poisoned = false;
    }

    /// Feeds a chunk of data to the decoder.
    ///
    /// The chunk is appended to any data that was left over from earlier
    /// calls. The decoder then reads values until either the message is
    /// complete, the data runs out, or an error happens.
    ///
    /// If a message is complete, data after it stays buffered. Calling the
    /// method again, with an empty chunk if nothing else has arrived, will
    /// continue with the next message.
    pub fn decode(&mut self, chunk: &[u8]) -> DecodeOutcome<A::Output> {
        if self.poisoned {
            return DecodeOutcome::Failed(DecodeError::Poisoned)
        }
        self.container.buf.extend_from_slice(chunk);
        match self.run() {
            Ok(Some(res)) => DecodeOutcome::Complete(res),
            Ok(None) => DecodeOutcome::NeedMoreData,
            Err(err) => {
                debug!("{}: decoding failed: {}", self.grammar.name(), err);
                self.poisoned = true;
                DecodeOutcome::Failed(err)
            }
        }
    }

    /// Reads values until the message is done or the data runs out.
    fn run(&mut self) -> Result<Option<A::Output>, DecodeError> {
        loop {
            if self.is_complete() {
                return Ok(Some(self.finish()))
            }
            if !self.step()? {
                debug!(
                    "{}: suspended at {} in state {:?}",
                    self.grammar.name(), self.container.pos(),
                    self.container.state,
                );
                return Ok(None)
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.container.phase.is_tag()
            && self.container.stack.is_empty()
            && self.container.state == self.grammar.end()
    }

    /// Hands out the output and prepares for the next message.
    fn finish(&mut self) -> A::Output {
        debug!(
            "{}: decoded message of {} octets at {}",
            self.grammar.name(), self.container.pos - self.container.pdu_start,
            Pos::from(self.container.pdu_start),
        );
        let res = mem::take(&mut self.container.output);
        self.container.restart(self.grammar.init());
        res
    }

    /// Makes progress on the current value.
    ///
    /// Returns `Ok(false)` if there wasn’t enough data to do so.
    fn step(&mut self) -> Result<bool, DecodeError> {
        match mem::replace(&mut self.container.phase, Phase::Tag) {
            Phase::Tag => self.step_tag(),
            Phase::Length { tag, start, transition } => {
                self.step_length(tag, start, transition)
            }
            Phase::Value { tag, start, length, transition } => {
                self.step_value(tag, start, length, transition)
            }
        }
    }

    fn step_tag(&mut self) -> Result<bool, DecodeError> {
        let start = self.container.pos;
        let Some((tag, len)) = Tag::take_from::<M>(
            &self.container.buf, start.into()
        )? else {
            return Ok(false)
        };
        self.check_pdu_size(start + len, start.into())?;
        self.container.advance(len);

        let transition = if tag.is_end_of_contents() {
            if !self.container.stack.top_is_indefinite() {
                return Err(DecodeError::MalformedTag {
                    reason: "unexpected end-of-contents", pos: start.into()
                })
            }
            None
        }
        else {
            let state = self.container.state;
            let Some(transition) = self.grammar.get_transition(
                state, tag.first_octet()
            ) else {
                return Err(DecodeError::BadTransition {
                    grammar: self.grammar.name(),
                    state: format!("{:?}", state),
                    tag,
                    pos: start.into(),
                })
            };
            Some(transition)
        };
        self.container.phase = Phase::Length {
            tag, start: start.into(), transition
        };
        Ok(true)
    }

    fn step_length(
        &mut self,
        tag: Tag,
        start: Pos,
        transition: Option<&'g Transition<S, A>>,
    ) -> Result<bool, DecodeError> {
        let Some((length, len)) = Length::take_from::<M>(
            &self.container.buf, self.container.pos()
        )? else {
            self.container.phase = Phase::Length { tag, start, transition };
            return Ok(false)
        };
        self.container.advance(len);
        self.check_enclosing(self.container.pos, start)?;

        let Some(transition) = transition else {
            self.end_of_contents(length, start)?;
            return Ok(true)
        };

        trace!(
            "{}: {} {} at {}, state {:?} -> {:?}",
            self.grammar.name(), tag, length, start,
            transition.from(), transition.to(),
        );

        let end = match length.definite() {
            Some(length) => {
                let end = self.container.pos.saturating_add(length);
                self.check_enclosing(end, start)?;
                self.check_pdu_size(end, start)?;
                Some(end)
            }
            None => None
        };

        if tag.is_constructed() {
            self.open(tag, length, start, end, transition)?;
        }
        else {
            let Some(length) = length.definite() else {
                return Err(DecodeError::MalformedLength {
                    reason: "indefinite length primitive value", pos: start
                })
            };
            self.container.phase = Phase::Value {
                tag, start, length, transition
            };
        }
        Ok(true)
    }

    fn step_value(
        &mut self,
        tag: Tag,
        start: Pos,
        length: usize,
        transition: &'g Transition<S, A>,
    ) -> Result<bool, DecodeError> {
        if self.container.buf.len() < length {
            self.container.phase = Phase::Value {
                tag, start, length, transition
            };
            return Ok(false)
        }
        let value = self.container.take(length);
        self.apply(transition, Tlv::primitive(tag, value, start))?;
        self.close_finished()?;
        Ok(true)
    }

    /// Enters a constructed value.
    fn open(
        &mut self,
        tag: Tag,
        length: Length,
        start: Pos,
        end: Option<usize>,
        transition: &'g Transition<S, A>,
    ) -> Result<(), DecodeError> {
        if self.container.stack.len() >= self.limits.max_depth {
            return Err(DecodeError::TooDeep {
                limit: self.limits.max_depth, pos: start
            })
        }
        self.apply(transition, Tlv::constructed(tag, length, start))?;
        let frame = Frame::new(
            &self.container.stack, tag, start, end,
            transition.ends(), transition.resume(),
        );
        self.container.stack.push(frame);
        debug!(
            "{}: entered {} at {}, depth {}",
            self.grammar.name(), tag, start, self.container.stack.len()
        );
        self.close_finished()
    }

    /// Processes an end-of-contents marker.
    fn end_of_contents(
        &mut self, length: Length, start: Pos
    ) -> Result<(), DecodeError> {
        if !length.is_zero() {
            return Err(DecodeError::MalformedLength {
                reason: "end-of-contents with non-zero length", pos: start
            })
        }
        if let Some(frame) = self.container.stack.pop() {
            self.close(frame)?;
        }
        self.close_finished()
    }

    /// Runs the action of a transition and moves to the next state.
    fn apply(
        &mut self, transition: &'g Transition<S, A>, tlv: Tlv
    ) -> Result<(), DecodeError> {
        if let Some(action) = transition.action() {
            action.run::<M>(
                &tlv, &mut self.container.output
            ).map_err(|err| {
                DecodeError::Action {
                    grammar: self.grammar.name(),
                    state: format!("{:?}", transition.from()),
                    tag: tlv.tag(),
                    pos: tlv.pos(),
                    source: err,
                }
            })?;
        }
        self.container.state = transition.to();
        self.container.tlv = Some(tlv);
        Ok(())
    }

    /// Closes all definite-length values that end at the current position.
    ///
    /// Once the outermost value is closed, the grammar must have reached its
    /// end state.
    fn close_finished(&mut self) -> Result<(), DecodeError> {
        while self.container.stack.top_ends_at(self.container.pos) {
            let Some(frame) = self.container.stack.pop() else {
                break
            };
            self.close(frame)?;
        }
        if self.container.stack.is_empty()
            && self.container.state != self.grammar.end()
        {
            return Err(self.unexpected_end())
        }
        Ok(())
    }

    /// Leaves a constructed value.
    ///
    /// The content must have ended in one of the states the value’s
    /// transition allows.
    fn close(&mut self, frame: Frame<'g, S>) -> Result<(), DecodeError> {
        if !frame.may_end_in(&self.container.state) {
            return Err(self.unexpected_end())
        }
        debug!(
            "{}: left {} from {} at {}",
            self.grammar.name(), frame.tag, frame.start, self.container.pos()
        );
        if let Some(resume) = frame.resume {
            self.container.state = resume;
        }
        Ok(())
    }

    fn unexpected_end(&self) -> DecodeError {
        DecodeError::UnexpectedEnd {
            grammar: self.grammar.name(),
            state: format!("{:?}", self.container.state),
            pos: self.container.pos(),
        }
    }

    /// Checks that content ending at `end` fits into the enclosing value.
    fn check_enclosing(
        &self, end: usize, start: Pos
    ) -> Result<(), DecodeError> {
        match self.container.stack.limit() {
            Some(limit) if end > limit => {
                Err(DecodeError::ExceedsEnclosing { pos: start })
            }
            _ => Ok(())
        }
    }

    /// Checks that a message extending to `end` isn’t too large.
    fn check_pdu_size(
        &self, end: usize, start: Pos
    ) -> Result<(), DecodeError> {
        if end - self.container.pdu_start > self.limits.max_pdu_size {
            return Err(DecodeError::TooLarge {
                limit: self.limits.max_pdu_size, pos: start
            })
        }
        Ok(())
    }
}

impl<S: State, A: Action, M: Mode> fmt::Debug for Decoder<'_, S, A, M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("grammar", &self.grammar.name())
            .field("mode", &M::NAME)
            .field("pos", &self.container.pos())
            .field("state", &self.container.state)
            .field("depth", &self.container.stack.len())
            .field("buffered", &self.container.buffered())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::{ActionError, ScalarError};
    use crate::grammar::GrammarBuilder;
    use crate::scalar::{Boolean, Integer};
    use super::*;

    // A made-up message for exercising the decoder:
    //
    //   Message ::= SEQUENCE {
    //       version  INTEGER,
    //       items    SEQUENCE OF INTEGER,
    //       flag     BOOLEAN
    //   }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum St { Init, Message, Version, Items, ItemsDone, Flag, End }

    #[derive(Clone, Copy, Debug)]
    enum Act { Version, Item, Flag }

    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    struct Message {
        version: i32,
        items: Vec<i64>,
        flag: bool,
    }

    impl Action for Act {
        type Output = Message;

        fn run<M: Mode>(
            &self, tlv: &Tlv, output: &mut Message
        ) -> Result<(), ActionError> {
            match self {
                Act::Version => {
                    output.version = Integer::decode_i32::<M>(
                        tlv.content()?
                    )?;
                }
                Act::Item => {
                    output.items.push(
                        Integer::decode_i64::<M>(tlv.content()?)?
                    );
                }
                Act::Flag => {
                    output.flag = Boolean::decode::<M>(tlv.content()?)?;
                }
            }
            Ok(())
        }
    }

    fn grammar() -> Grammar<St, Act> {
        let mut builder = GrammarBuilder::new("Message", St::Init, St::End);
        builder
            .add(
                Transition::new(St::Init, 0x30, St::Message)
                    .ends_in(St::Flag).on_close(St::End)
            )
            .add(
                Transition::new(St::Message, 0x02, St::Version)
                    .with_action(Act::Version)
            )
            .add(
                Transition::new(St::Version, 0x30, St::Items)
                    .ends_in(St::Items).on_close(St::ItemsDone)
            )
            .add(
                Transition::new(St::Items, 0x02, St::Items)
                    .with_action(Act::Item)
            )
            .add(
                Transition::new(St::ItemsDone, 0x01, St::Flag)
                    .with_action(Act::Flag)
            );
        builder.build()
    }

    const DEFINITE: &[u8] = b"\x30\x0e\
        \x02\x01\x05\
        \x30\x06\x02\x01\x01\x02\x01\x02\
        \x01\x01\xff";

    const INDEFINITE: &[u8] = b"\x30\x80\
        \x02\x01\x05\
        \x30\x80\x02\x01\x01\x02\x01\x02\x00\x00\
        \x01\x01\xff\
        \x00\x00";

    fn expected() -> Message {
        Message { version: 5, items: vec![1, 2], flag: true }
    }

    fn failure(data: &[u8]) -> DecodeError {
        let grammar = grammar();
        let err = match Decoder::new(&grammar).decode(data) {
            DecodeOutcome::Failed(err) => err,
            other => panic!("unexpected outcome {:?}", other),
        };
        err
    }

    #[test]
    fn decode_complete() {
        let grammar = grammar();
        let mut decoder = Decoder::new(&grammar);
        assert_eq!(
            decoder.decode(DEFINITE), DecodeOutcome::Complete(expected())
        );
        assert_eq!(decoder.buffered(), 0);
        assert_eq!(decoder.pos(), Pos::from(DEFINITE.len()));

        let mut decoder = Decoder::new_der(&grammar);
        assert_eq!(
            decoder.decode(DEFINITE), DecodeOutcome::Complete(expected())
        );
    }

    #[test]
    fn split_at_every_offset() {
        let grammar = grammar();
        for data in [DEFINITE, INDEFINITE] {
            for split in 0..data.len() {
                let mut decoder = Decoder::new(&grammar);
                let (head, tail) = data.split_at(split);
                assert_eq!(decoder.decode(head), DecodeOutcome::NeedMoreData);
                assert_eq!(
                    decoder.decode(tail), DecodeOutcome::Complete(expected())
                );
            }
        }
    }

    #[test]
    fn octet_by_octet() {
        let grammar = grammar();
        let mut decoder = Decoder::new(&grammar);
        let (last, head) = INDEFINITE.split_last().unwrap();
        for octet in head {
            assert!(decoder.decode(&[*octet]).is_need_more_data());
        }
        assert_eq!(
            decoder.decode(&[*last]), DecodeOutcome::Complete(expected())
        );
    }

    #[test]
    fn suspended_state() {
        let grammar = grammar();
        let mut decoder = Decoder::new(&grammar);
        assert!(decoder.decode(&DEFINITE[..9]).is_need_more_data());
        let container = decoder.container();
        assert_eq!(container.state(), St::Items);
        assert_eq!(container.depth(), 2);
        assert_eq!(container.pos(), Pos::from(9));
        assert_eq!(container.buffered(), 0);
        assert_eq!(container.output().version, 5);
        assert_eq!(
            container.current_tlv().map(Tlv::tag), Some(Tag::SEQUENCE)
        );

        // Inside the second item’s identifier and length octets.
        assert!(decoder.decode(&DEFINITE[9..11]).is_need_more_data());
        assert_eq!(decoder.container().output().items, [1]);
        assert_eq!(decoder.pos(), Pos::from(11));
    }

    #[test]
    fn indefinite_in_der() {
        let grammar = grammar();
        let mut decoder = Decoder::new_der(&grammar);
        assert_eq!(
            decoder.decode(INDEFINITE),
            DecodeOutcome::Failed(DecodeError::MalformedLength {
                reason: "indefinite length in DER", pos: 1.into()
            })
        );
    }

    #[test]
    fn bad_transition() {
        assert_eq!(
            failure(b"\x30\x03\x01\x01\xff"),
            DecodeError::BadTransition {
                grammar: "Message",
                state: "Message".into(),
                tag: Tag::BOOLEAN,
                pos: 2.into(),
            }
        );
        assert_eq!(
            failure(b"\x31\x00"),
            DecodeError::BadTransition {
                grammar: "Message",
                state: "Init".into(),
                tag: Tag::SET,
                pos: 0.into(),
            }
        );
    }

    #[test]
    fn malformed_structure() {
        // Version longer than the message.
        assert_eq!(
            failure(b"\x30\x03\x02\x05\x00\x00\x00\x00\x00"),
            DecodeError::ExceedsEnclosing { pos: 2.into() }
        );

        // Message ends right after the version.
        assert_eq!(
            failure(b"\x30\x03\x02\x01\x05"),
            DecodeError::UnexpectedEnd {
                grammar: "Message", state: "Version".into(), pos: 5.into()
            }
        );

        // End-of-contents in a definite-length value.
        assert_eq!(
            failure(b"\x30\x02\x00\x00"),
            DecodeError::MalformedTag {
                reason: "unexpected end-of-contents", pos: 2.into()
            }
        );

        // End-of-contents with content.
        assert_eq!(
            failure(b"\x30\x80\x00\x01\x00"),
            DecodeError::MalformedLength {
                reason: "end-of-contents with non-zero length", pos: 2.into()
            }
        );

        // Indefinite length primitive.
        assert_eq!(
            failure(b"\x30\x80\x02\x80"),
            DecodeError::MalformedLength {
                reason: "indefinite length primitive value", pos: 2.into()
            }
        );

        // Items closing in the middle of the message.
        assert_eq!(
            failure(b"\x30\x80\x02\x01\x05\
                \x30\x80\x02\x01\x01\x00\x00\x00\x00"),
            DecodeError::UnexpectedEnd {
                grammar: "Message", state: "ItemsDone".into(), pos: 14.into()
            }
        );

        // The flag inside the items.
        assert_eq!(
            failure(b"\x30\x0b\x02\x01\x05\
                \x30\x06\x02\x01\x01\x01\x01\xff"),
            DecodeError::BadTransition {
                grammar: "Message",
                state: "Items".into(),
                tag: Tag::BOOLEAN,
                pos: 10.into(),
            }
        );
    }

    #[test]
    fn malformed_octets() {
        // End-of-contents outside of any value.
        assert_eq!(
            failure(b"\x00\x00"),
            DecodeError::MalformedTag {
                reason: "unexpected end-of-contents", pos: 0.into()
            }
        );

        // High tag number form with a leading zero.
        assert_eq!(
            failure(b"\x30\x80\x1f\x80\x01\x00"),
            DecodeError::MalformedTag {
                reason: "leading zero in tag number", pos: 2.into()
            }
        );

        // High tag number form with too many octets.
        assert_eq!(
            failure(b"\x30\x80\x1f\xff\xff\xff\x01\x00"),
            DecodeError::MalformedTag {
                reason: "tag number too large", pos: 2.into()
            }
        );

        // Nine length octets.
        assert_eq!(
            failure(b"\x30\x89\x00\x00\x00\x00\x00\x00\x00\x00\x03"),
            DecodeError::MalformedLength {
                reason: "excessive length", pos: 1.into()
            }
        );

        // Length octets 0xFF.
        assert_eq!(
            failure(b"\x30\xff"),
            DecodeError::MalformedLength {
                reason: "illegal length octets", pos: 1.into()
            }
        );
    }

    #[test]
    fn der_content() {
        let grammar = grammar();

        // Flag of 0x01 instead of 0xFF.
        let mut data = DEFINITE.to_vec();
        data[15] = 0x01;
        assert_eq!(
            Decoder::new(&grammar).decode(&data),
            DecodeOutcome::Complete(expected())
        );
        assert_eq!(
            Decoder::new_der(&grammar).decode(&data),
            DecodeOutcome::Failed(DecodeError::Action {
                grammar: "Message",
                state: "ItemsDone".into(),
                tag: Tag::BOOLEAN,
                pos: 13.into(),
                source: ActionError::Scalar(ScalarError::NonCanonical),
            })
        );

        // Version 5 in two octets.
        let data = b"\x30\x0f\x02\x02\x00\x05\
            \x30\x06\x02\x01\x01\x02\x01\x02\x01\x01\xff";
        assert_eq!(grammar.decode_slice::<Ber>(data), Ok(expected()));
        assert_eq!(
            grammar.decode_slice::<Der>(data),
            Err(DecodeError::Action {
                grammar: "Message",
                state: "Message".into(),
                tag: Tag::INTEGER,
                pos: 2.into(),
                source: ActionError::Scalar(ScalarError::NonCanonical),
            })
        );
    }

    #[test]
    fn action_failure() {
        assert_eq!(
            failure(b"\x30\x02\x02\x00"),
            DecodeError::Action {
                grammar: "Message",
                state: "Message".into(),
                tag: Tag::INTEGER,
                pos: 2.into(),
                source: ActionError::Scalar(ScalarError::EmptyValue),
            }
        );
    }

    #[test]
    fn limits() {
        let grammar = grammar();
        let mut decoder = Decoder::new(&grammar).with_max_depth(1);
        assert_eq!(
            decoder.decode(DEFINITE),
            DecodeOutcome::Failed(DecodeError::TooDeep {
                limit: 1, pos: 5.into()
            })
        );

        let mut decoder = Decoder::new(&grammar).with_max_pdu_size(8);
        assert_eq!(
            decoder.decode(DEFINITE),
            DecodeOutcome::Failed(DecodeError::TooLarge {
                limit: 8, pos: 0.into()
            })
        );

        let mut decoder = Decoder::new(&grammar).with_limits(
            Limits::default().with_max_pdu_size(DEFINITE.len())
        );
        assert!(decoder.decode(DEFINITE).is_complete());
        assert_eq!(decoder.limits().max_depth(), Limits::DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn poisoned_and_reset() {
        let grammar = grammar();
        let mut decoder = Decoder::new(&grammar);
        assert!(decoder.decode(b"\x31\x00").is_failed());
        assert!(decoder.is_poisoned());
        assert_eq!(
            decoder.decode(DEFINITE),
            DecodeOutcome::Failed(DecodeError::Poisoned)
        );

        decoder.reset();
        assert!(!decoder.is_poisoned());
        assert_eq!(
            decoder.decode(DEFINITE).into_result(), Ok(Some(expected()))
        );
    }

    #[test]
    fn several_messages() {
        let grammar = grammar();
        let mut data = DEFINITE.to_vec();
        data.extend_from_slice(INDEFINITE);
        data.extend_from_slice(&DEFINITE[..4]);

        let mut decoder = Decoder::new(&grammar);
        assert_eq!(decoder.decode(&data), DecodeOutcome::Complete(expected()));
        assert_eq!(decoder.buffered(), INDEFINITE.len() + 4);
        assert_eq!(decoder.decode(b""), DecodeOutcome::Complete(expected()));
        assert_eq!(decoder.buffered(), 4);
        assert_eq!(decoder.decode(b""), DecodeOutcome::NeedMoreData);
        assert_eq!(
            decoder.decode(&DEFINITE[4..]),
            DecodeOutcome::Complete(expected())
        );
        assert_eq!(decoder.buffered(), 0);
    }

    #[test]
    fn decode_slice() {
        let grammar = grammar();
        assert_eq!(grammar.decode_slice::<Ber>(INDEFINITE), Ok(expected()));
        assert_eq!(
            grammar.decode_slice::<Ber>(&DEFINITE[..10]),
            Err(DecodeError::Incomplete)
        );
        let mut data = DEFINITE.to_vec();
        data.push(0);
        assert_eq!(
            grammar.decode_slice::<Der>(&data),
            Err(DecodeError::TrailingData { pos: DEFINITE.len().into() })
        );
    }
}
