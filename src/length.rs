//! The length octets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use std::mem::size_of;
use crate::decode::{DecodeError, Pos};
use crate::mode::Mode;


//------------ Length -------------------------------------------------------

/// The length octets of an encoded value.
///
/// A length value can either be definite, meaning it provides the actual
/// number of content octets in the value, or indefinite, in which case the
/// content is delimited by a special end-of-contents marker.
///
/// # BER Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the definite length. Thus, if the first octet is
/// less than 128, it provides the definite length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. If they specify that there are zero more octets, i.e., the
/// value of the first octet is 128, the length is indefinite. Otherwise,
/// those following octets give the big-endian encoding of the definite
/// length of the content octets.
///
/// Under DER rules, a definite length must be encoded in the minimum number
/// of octets and the indefinite form is not allowed at all.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Length(Option<usize>);

impl Length {
    /// The indefinite length.
    pub const INDEFINITE: Self = Length(None);

    /// The maximum number of octets following the first length octet.
    const MAX_OCTETS: usize = size_of::<usize>();

    /// Creates a new length from the given optional length.
    ///
    /// If the length is `None`, creates an indefinite length value.
    pub fn new(length: Option<usize>) -> Self {
        Length(length)
    }

    /// Returns the length if it is definite.
    pub fn definite(self) -> Option<usize> {
        self.0
    }

    /// Returns whether the length is indefinite.
    pub fn is_indefinite(self) -> bool {
        self.0.is_none()
    }

    /// Returns whether the length is definite and zero.
    pub fn is_zero(self) -> bool {
        self.0 == Some(0)
    }

    /// Takes the length octets from the beginning of `data`.
    ///
    /// Returns the length and the number of octets it occupied. If `data`
    /// ends before the length octets are complete, returns `Ok(None)`. In
    /// this case nothing has been looked at that would have to be looked at
    /// again, so the read can simply be retried with more data.
    pub fn take_from<M: Mode>(
        data: &[u8], pos: Pos
    ) -> Result<Option<(Self, usize)>, DecodeError> {
        let len = match FirstOctet::from_octet::<M>(data.first(), pos)? {
            None => return Ok(None),
            Some(FirstOctet::Single(res)) => return Ok(Some((res, 1))),
            Some(FirstOctet::Multi(len)) => len,
        };
        if len > Self::MAX_OCTETS {
            return Err(DecodeError::MalformedLength {
                reason: "excessive length", pos
            })
        }
        let Some(octets) = data.get(1..=len) else {
            return Ok(None)
        };

        // The difference to the BER case is the first of the following
        // octets can’t be zero and a single following octet can’t be less
        // than 0x80. In both cases, there is a shorter encoding.
        if M::IS_RESTRICTED {
            if let Some(&second) = octets.first() {
                if second == 0 || (second < 0x80 && len == 1) {
                    return Err(DecodeError::MalformedLength {
                        reason: "non-minimal length in DER", pos
                    })
                }
            }
        }

        let res = octets.iter().fold(0usize, |res, &octet| {
            // Can’t overflow: we have at most size_of::<usize>() octets.
            res << 8 | usize::from(octet)
        });
        Ok(Some((Length(Some(res)), len + 1)))
    }
}


//--- From

impl From<usize> for Length {
    fn from(len: usize) -> Self {
        Length(Some(len))
    }
}


//--- Display and Debug

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(len) => len.fmt(f),
            None => f.write_str("indefinite"),
        }
    }
}

impl fmt::Debug for Length {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Length({})", self)
    }
}


//------------ FirstOctet ---------------------------------------------------

/// The first octet of the encoded length.
enum FirstOctet {
    /// The first octet is a length in and of itself.
    Single(Length),

    /// The first octet indicates the number of octets to follow.
    Multi(usize),
}

impl FirstOctet {
    /// Looks at the first octet and checks what it means.
    fn from_octet<M: Mode>(
        octet: Option<&u8>, pos: Pos
    ) -> Result<Option<Self>, DecodeError> {
        let Some(&octet) = octet else {
            return Ok(None)
        };
        match octet {
            // Bit 7 clear: single.
            n if (n & 0x80) == 0 => {
                Ok(Some(FirstOctet::Single(Length(Some(usize::from(n))))))
            }

            // 0x80: indefinite.
            0x80 => {
                if M::ALLOW_INDEFINITE {
                    Ok(Some(FirstOctet::Single(Length::INDEFINITE)))
                }
                else {
                    Err(DecodeError::MalformedLength {
                        reason: "indefinite length in DER", pos
                    })
                }
            }

            // 0xFF: illegal.
            0xFF => {
                Err(DecodeError::MalformedLength {
                    reason: "illegal length octets", pos
                })
            }

            // anything else: clear left bit, number of octets.
            n => Ok(Some(FirstOctet::Multi(usize::from(n & 0x7F))))
        }
    }
}


//============ Tests =========================================================
