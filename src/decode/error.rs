//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use std::{fmt, ops, str};
use thiserror::Error;
use crate::tag::Tag;


//------------ DecodeError ---------------------------------------------------

/// An error that aborted a decoding session.
///
/// All errors of this type are fatal: once a decoder has produced one, it
/// refuses to continue until it is reset. The only non-fatal condition,
/// missing data, isn’t an error at all but is signalled through
/// [`DecodeOutcome::NeedMoreData`][crate::decode::DecodeOutcome].
///
/// Positions given in the variants are stream positions, i.e., they count
/// octets since the decoder was created or last reset.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DecodeError {
    /// The identifier octets were malformed.
    #[error("malformed tag at {pos}: {reason}")]
    MalformedTag { reason: &'static str, pos: Pos },

    /// The length octets were malformed.
    #[error("malformed length at {pos}: {reason}")]
    MalformedLength { reason: &'static str, pos: Pos },

    /// A value claims to be longer than the value it is contained in.
    #[error("value at {pos} exceeds its enclosing value")]
    ExceedsEnclosing { pos: Pos },

    /// Constructed values were nested deeper than allowed.
    #[error("nesting deeper than {limit} levels at {pos}")]
    TooDeep { limit: usize, pos: Pos },

    /// The encoded data unit is larger than allowed.
    #[error("value at {pos} exceeds the maximum PDU size of {limit} octets")]
    TooLarge { limit: usize, pos: Pos },

    /// The grammar doesn’t allow the tag in the current state.
    #[error(
        "{grammar}: no transition from state {state} for tag {tag} at {pos}"
    )]
    BadTransition {
        grammar: &'static str,
        state: String,
        tag: Tag,
        pos: Pos,
    },

    /// A constructed value ended in a state where it must not end.
    #[error("{grammar}: value ends prematurely in state {state} at {pos}")]
    UnexpectedEnd {
        grammar: &'static str,
        state: String,
        pos: Pos,
    },

    /// The action of a transition failed.
    #[error(
        "{grammar}: invalid {tag} value in state {state} at {pos}: {source}"
    )]
    Action {
        grammar: &'static str,
        state: String,
        tag: Tag,
        pos: Pos,
        #[source]
        source: ActionError,
    },

    /// The data ended before a complete value was decoded.
    #[error("unexpected end of data")]
    Incomplete,

    /// There was data left after a complete value.
    #[error("trailing data at {pos}")]
    TrailingData { pos: Pos },

    /// The decoder has failed before and needs to be reset.
    #[error("decoder used after a fatal error")]
    Poisoned,
}


//------------ ActionError ---------------------------------------------------

/// An error returned by a grammar action.
///
/// The decoder wraps these into a [`DecodeError::Action`] that adds the
/// grammar, state, tag, and position where the action failed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ActionError {
    /// Decoding a scalar value failed.
    #[error(transparent)]
    Scalar(#[from] ScalarError),

    /// The action needs the content of a primitive value.
    #[error("expected a primitive value")]
    NotPrimitive,

    /// A string value wasn’t valid UTF-8.
    #[error("invalid string: {0}")]
    Utf8(#[from] str::Utf8Error),

    /// A field had a value other than the one required by the protocol.
    #[error("unexpected {field} {found}, expected {expected}")]
    Unexpected {
        field: &'static str,
        expected: i64,
        found: i64,
    },

    /// Some other semantic constraint was violated.
    #[error("{0}")]
    Invalid(&'static str),
}


//------------ ScalarError ---------------------------------------------------

/// An error happening while decoding the content of a primitive value.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ScalarError {
    /// The content was empty.
    #[error("empty value")]
    EmptyValue,

    /// The content had more octets than the target type can hold.
    #[error("value of {len} octets exceeds the maximum of {max}")]
    TooLong { len: usize, max: usize },

    /// The content had a length other than the one required.
    #[error("value of {len} octets where {expected} are required")]
    WrongLength { len: usize, expected: usize },

    /// The decoded integer was outside the permitted range.
    #[error("value {value} outside of range {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },

    /// The content wasn’t encoded in the form required by DER.
    #[error("non-canonical encoding")]
    NonCanonical,

    /// The initial octet of a bit string was invalid.
    #[error("invalid number of unused bits {0}")]
    InvalidUnusedBits(u8),
}


//------------ Pos -----------------------------------------------------------

/// The logical position within a stream of encoded data.
///
/// Values of this type can only be used for diagnostics. This is why we use
/// a newtype.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Pos(usize);

impl Pos {
    /// Returns the position as a plain octet offset.
    pub fn offset(self) -> usize {
        self.0
    }
}

impl From<usize> for Pos {
    fn from(pos: usize) -> Pos {
        Pos(pos)
    }
}

impl ops::Add<usize> for Pos {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        Pos(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scalar_errors_convert() {
        let err: ActionError = ScalarError::EmptyValue.into();
        assert_eq!(err, ActionError::Scalar(ScalarError::EmptyValue));
        assert_eq!(err.to_string(), "empty value");
    }

    #[test]
    fn action_error_display() {
        let err = DecodeError::Action {
            grammar: "AP-REQ",
            state: "Pvno".into(),
            tag: Tag::INTEGER,
            pos: 7.into(),
            source: ActionError::Unexpected {
                field: "pvno", expected: 5, found: 4
            },
        };
        assert_eq!(
            err.to_string(),
            "AP-REQ: invalid INTEGER value in state Pvno at 7: \
             unexpected pvno 4, expected 5"
        );
    }
}
