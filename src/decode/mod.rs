//! Decoding data in Basic Encoding Rules.
//!
//! This module provides the machinery for decoding a stream of BER or DER
//! encoded data according to a [`Grammar`][crate::grammar::Grammar].
//!
//! The [`Decoder`] is push-driven. Data is fed to it in chunks of whatever
//! size it happens to arrive in. Each call to [`Decoder::decode`] reads as
//! many complete values from the data as possible, runs the grammar’s
//! actions for them, and returns a [`DecodeOutcome`]: either the message
//! isn’t complete yet and more data is needed, or the decoded message, or
//! an error. All the state kept between calls lives in a [`Container`] which
//! can be inspected through [`Decoder::container`].
//!
//! Errors are described by three types. [`ScalarError`] is returned by the
//! decoders for primitive values in [`scalar`][crate::scalar].
//! [`ActionError`] is returned by grammar actions and can be created from a
//! scalar error via `?`. [`DecodeError`] finally is what the decoder reports.
//! It wraps action errors with information on where they happened.

pub use self::container::Container;
pub use self::decoder::{DecodeOutcome, Decoder, Limits};
pub use self::error::{ActionError, DecodeError, Pos, ScalarError};

mod container;
mod decoder;
mod error;
mod stack;
