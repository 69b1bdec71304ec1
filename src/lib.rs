//! Streaming, grammar-driven decoding of data in Basic Encoding Rules.
//!
//! This crate decodes messages encoded in the Basic Encoding Rules (BER) or
//! their restricted subset, the Distinguished Encoding Rules (DER), as
//! defined in [ITU-T X.690]. Instead of a decoding function per type, the
//! structure of a message is described by a table-driven state machine, a
//! [`Grammar`][grammar::Grammar]. A [`Decoder`][decode::Decoder] reads one
//! tag-length-value triple after the other, looks up the transition for the
//! current state and the tag, and runs the transition’s action to fill in
//! the output.
//!
//! Since all of the decoder’s state is kept in explicit data structures
//! rather than on the call stack, decoding can be suspended whenever the
//! data runs out and resumed once more arrives. Data can thus be fed to
//! the decoder in chunks of any size straight from the network.
//!
//! The crate is organized as follows:
//!
//! * [`Tag`], [`Length`], and [`Tlv`] are the building blocks of encoded
//!   data,
//! * the [`mode`] module selects between BER and DER,
//! * the [`grammar`] module provides the grammar and its transitions,
//! * the [`decode`] module contains the decoder and the error types,
//! * the [`scalar`] module decodes the content of primitive values, and
//! * the [`kerberos`] module has grammars for Kerberos messages.
//!
//! [ITU-T X.690]: https://www.itu.int/rec/T-REC-X.690/en

pub use self::length::Length;
pub use self::mode::{Ber, Der, Mode};
pub use self::tag::{Class, Tag};
pub use self::tlv::Tlv;

pub mod decode;
pub mod grammar;
pub mod kerberos;
pub mod mode;
pub mod scalar;

mod length;
mod tag;
mod tlv;
