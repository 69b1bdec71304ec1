//! BER encoded booleans.
//!
//! This is a private module. Its public items are re-exported by the parent.

use log::warn;
use crate::decode::ScalarError;
use crate::mode::Mode;


//------------ Boolean -------------------------------------------------------

/// The content of a BOOLEAN value.
///
/// A boolean is encoded as a single content octet. Zero means false and
/// every other value means true. Only 0xFF is canonical for true, though,
/// and DER insists on it. The type keeps track of whether the encoding was
/// canonical so the caller can decide what to make of it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Boolean {
    /// The value.
    value: bool,

    /// Was the value canonically encoded?
    canonical: bool,
}

impl Boolean {
    /// Parses the content octets of a boolean.
    ///
    /// Fails if there isn’t exactly one octet. A non-canonical value is
    /// accepted but flagged.
    pub fn from_content(content: &[u8]) -> Result<Self, ScalarError> {
        match *content {
            [] => Err(ScalarError::EmptyValue),
            [octet] => Ok(Boolean {
                value: octet != 0,
                canonical: octet == 0 || octet == 0xFF,
            }),
            _ => Err(ScalarError::WrongLength {
                len: content.len(), expected: 1
            }),
        }
    }

    /// Decodes a boolean according to the rules of mode `M`.
    ///
    /// In BER, a non-canonical value is logged as a warning but decoded.
    /// In DER, it is rejected.
    pub fn decode<M: Mode>(content: &[u8]) -> Result<bool, ScalarError> {
        let res = Self::from_content(content)?;
        if !res.canonical {
            if M::IS_RESTRICTED {
                return Err(ScalarError::NonCanonical)
            }
            warn!(
                "non-canonical {} boolean value 0x{:02x}",
                M::NAME, content.first().copied().unwrap_or_default()
            );
        }
        Ok(res.value)
    }

    /// Returns the value.
    pub fn value(self) -> bool {
        self.value
    }

    /// Returns whether the value was encoded canonically.
    pub fn is_canonical(self) -> bool {
        self.canonical
    }
}

impl From<Boolean> for bool {
    fn from(src: Boolean) -> bool {
        src.value
    }
}


//============ Tests =========================================================
