//! A complete tag-length-value triple.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::{ActionError, Pos};
use crate::length::Length;
use crate::tag::Tag;


//------------ Tlv -----------------------------------------------------------

/// A value as seen by a grammar action.
///
/// For a primitive value, the decoder only hands out a `Tlv` once all its
/// content octets have arrived, so the content is always complete. For a
/// constructed value, the `Tlv` is handed out as soon as the tag and length
/// are known. It has no content since that consists of further values which
/// are decoded one by one afterwards.
///
/// The content is kept as a [`Bytes`] value split off the decoder’s input
/// buffer. It can be kept around cheaply by the decoded output.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tlv {
    /// The identifier octets.
    tag: Tag,

    /// The length octets.
    length: Length,

    /// The content octets of a primitive value.
    value: Option<Bytes>,

    /// The stream position of the first identifier octet.
    pos: Pos,
}

impl Tlv {
    /// Creates a TLV for a constructed value.
    pub fn constructed(tag: Tag, length: Length, pos: Pos) -> Self {
        Tlv { tag, length, value: None, pos }
    }

    /// Creates a TLV for a primitive value.
    pub fn primitive(tag: Tag, value: Bytes, pos: Pos) -> Self {
        Tlv { tag, length: value.len().into(), value: Some(value), pos }
    }

    /// Returns the tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Returns the length.
    pub fn length(&self) -> Length {
        self.length
    }

    /// Returns the stream position of the value.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Returns whether this is a constructed value.
    pub fn is_constructed(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the content octets of a primitive value.
    pub fn value(&self) -> Option<&Bytes> {
        self.value.as_ref()
    }

    /// Returns the content octets or an error if the value is constructed.
    pub fn content(&self) -> Result<&[u8], ActionError> {
        self.value.as_deref().ok_or(ActionError::NotPrimitive)
    }

    /// Returns a copy of the content octets as a `Bytes` value.
    ///
    /// This is cheap as it only increases a reference count.
    pub fn content_bytes(&self) -> Result<Bytes, ActionError> {
        self.value.clone().ok_or(ActionError::NotPrimitive)
    }
}


//============ Tests =========================================================
