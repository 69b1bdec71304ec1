//! Table-driven grammars.
//!
//! A [`Grammar`] describes the structure of one kind of protocol message as
//! a state machine. Its transitions are keyed by the current state and the
//! first identifier octet of the next value. Each [`Transition`] names the
//! next state and, optionally, an [`Action`] that moves data from the value
//! into the output under construction.
//!
//! Grammars are built once through a [`GrammarBuilder`] and are immutable
//! afterwards. Protocol modules keep them in a `static` and hand out shared
//! references, so a single grammar serves any number of concurrent decoding
//! sessions.
//!
//! # Nested values
//!
//! When a transition is taken for a constructed value, the decoder opens a
//! frame for that value which is closed again once all its content has been
//! consumed. The transition lists the states the content may end in via
//! [`Transition::ends_in`]. If the grammar is in any other state when the
//! frame closes, the content is incomplete and decoding fails. Afterwards,
//! the state switches to the one given through [`Transition::on_close`].
//! This way, a single-level state machine can describe arbitrarily nested
//! structures. The transition for the outermost value typically resumes to
//! the grammar’s end state.
//!
//! An explicitly tagged field is a constructed value of its own. Its
//! transition should end in the state reached after the wrapped value and
//! resume to a separate state for the field being done. Otherwise, the
//! transitions for the following fields would also be available inside the
//! explicit tag.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use crate::decode::{ActionError, DecodeError, DecodeOutcome, Decoder};
use crate::mode::Mode;
use crate::tlv::Tlv;


//------------ State ---------------------------------------------------------

/// The requirements for the state type of a grammar.
///
/// States are typically a fieldless enum per grammar, or an enum that wraps
/// the state enums of the sub-structures it embeds. There is a blanket
/// implementation for all types that qualify.
pub trait State: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static { }

impl<T> State for T
where T: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static { }


//------------ Action --------------------------------------------------------

/// The behaviour attached to a transition.
///
/// An action is called with the value that triggered the transition and the
/// output under construction. For constructed values, the action is run as
/// soon as tag and length are known. For primitive values, it is run once
/// the complete content is available.
///
/// The encoding rules of the decoding session are passed in as `M` so that
/// the action can apply the stricter rules of DER to the content.
pub trait Action: fmt::Debug + Send + Sync + 'static {
    /// The type of the decoded message.
    type Output: Default;

    /// Runs the action.
    fn run<M: Mode>(
        &self, tlv: &Tlv, output: &mut Self::Output
    ) -> Result<(), ActionError>;
}


//------------ Transition ----------------------------------------------------

/// An edge of a grammar’s state machine.
#[derive(Clone, Debug)]
pub struct Transition<S, A> {
    /// The state the transition starts in.
    from: S,

    /// The first identifier octet of the triggering value.
    tag: u8,

    /// The state after the transition was taken.
    to: S,

    /// The action to run, if any.
    action: Option<A>,

    /// The states the content of a constructed value may end in.
    ends: Vec<S>,

    /// The state to switch to when the value’s frame closes.
    resume: Option<S>,
}

impl<S: Copy, A> Transition<S, A> {
    /// Creates a new transition without an action.
    pub fn new(from: S, tag: u8, to: S) -> Self {
        Self { from, tag, to, action: None, ends: Vec::new(), resume: None }
    }

    /// Adds an action to the transition.
    pub fn with_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Adds a state the content of the value may end in.
    ///
    /// This can be given more than once for content that may end in several
    /// ways, e.g., because of optional fields at its end. Content that may
    /// be empty needs to list `to`. A constructed value closing in a state
    /// not given here is an error. In particular, a constructed value
    /// without any of these states can never be closed.
    ///
    /// This only makes sense for constructed values.
    pub fn ends_in(mut self, state: S) -> Self {
        self.ends.push(state);
        self
    }

    /// Sets the state to resume to when the value is closed.
    ///
    /// This only makes sense for constructed values.
    pub fn on_close(mut self, state: S) -> Self {
        self.resume = Some(state);
        self
    }

    /// Returns the state the transition starts in.
    pub fn from(&self) -> S {
        self.from
    }

    /// Returns the first identifier octet that triggers the transition.
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Returns the state after the transition.
    pub fn to(&self) -> S {
        self.to
    }

    /// Returns the action of the transition if there is one.
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    /// Returns the states the content of a constructed value may end in.
    pub fn ends(&self) -> &[S] {
        &self.ends
    }

    /// Returns the resume state if there is one.
    pub fn resume(&self) -> Option<S> {
        self.resume
    }
}


//------------ Grammar -------------------------------------------------------

/// An immutable transition table for one kind of message.
///
/// The table is sparse: only the legal combinations of state and tag octet
/// are stored. Every other combination has no transition, which the decoder
/// treats as a fatal error.
pub struct Grammar<S, A> {
    /// The name of the grammar for diagnostics.
    name: &'static str,

    /// The initial state.
    init: S,

    /// The final state.
    end: S,

    /// The transitions keyed by start state and tag octet.
    table: HashMap<(S, u8), Transition<S, A>>,
}

impl<S: State, A> Grammar<S, A> {
    /// Starts building a new grammar.
    pub fn builder(
        name: &'static str, init: S, end: S
    ) -> GrammarBuilder<S, A> {
        GrammarBuilder::new(name, init, end)
    }

    /// Returns the name of the grammar.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the initial state.
    pub fn init(&self) -> S {
        self.init
    }

    /// Returns the final state.
    pub fn end(&self) -> S {
        self.end
    }

    /// Returns the transition for the given state and tag octet.
    ///
    /// For multi-octet tags, the first identifier octet is used.
    pub fn get_transition(
        &self, state: S, tag: u8
    ) -> Option<&Transition<S, A>> {
        self.table.get(&(state, tag))
    }

    /// Returns an iterator over all transitions in no particular order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition<S, A>> {
        self.table.values()
    }

    /// Returns the number of transitions.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns whether the grammar has no transitions at all.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<S: State, A: Action> Grammar<S, A> {
    /// Decodes a complete message from a slice using mode `M`.
    ///
    /// Fails with [`DecodeError::Incomplete`] if the data ends before the
    /// message is complete and with [`DecodeError::TrailingData`] if there
    /// is data left after it.
    pub fn decode_slice<M: Mode>(
        &self, data: &[u8]
    ) -> Result<A::Output, DecodeError> {
        let mut decoder = Decoder::<S, A, M>::with_mode(self);
        match decoder.decode(data) {
            DecodeOutcome::Complete(res) => {
                if decoder.buffered() > 0 {
                    Err(DecodeError::TrailingData { pos: decoder.pos() })
                }
                else {
                    Ok(res)
                }
            }
            DecodeOutcome::NeedMoreData => Err(DecodeError::Incomplete),
            DecodeOutcome::Failed(err) => Err(err),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Grammar<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("name", &self.name)
            .field("init", &self.init)
            .field("end", &self.end)
            .field("transitions", &self.table.len())
            .finish()
    }
}


//------------ GrammarBuilder ------------------------------------------------

/// Collects the transitions of a new grammar.
pub struct GrammarBuilder<S, A> {
    grammar: Grammar<S, A>,
}

impl<S: State, A> GrammarBuilder<S, A> {
    /// Creates a builder for a grammar with the given name and states.
    pub fn new(name: &'static str, init: S, end: S) -> Self {
        GrammarBuilder {
            grammar: Grammar {
                name, init, end,
                table: HashMap::new(),
            }
        }
    }

    /// Adds a transition.
    ///
    /// # Panics
    ///
    /// The method panics if there already is a transition for the same
    /// start state and tag octet. Since grammars are static, this is a
    /// programming error.
    pub fn add(&mut self, transition: Transition<S, A>) -> &mut Self {
        let key = (transition.from, transition.tag);
        if self.grammar.table.insert(key, transition).is_some() {
            panic!(
                "{}: duplicate transition from {:?} for tag 0x{:02x}",
                self.grammar.name, key.0, key.1
            )
        }
        self
    }

    /// Finishes building.
    pub fn build(self) -> Grammar<S, A> {
        self.grammar
    }
}


//============ Tests =========================================================
