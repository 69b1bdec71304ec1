//! The identifier octets of a BER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use crate::decode::{DecodeError, Pos};
use crate::mode::Mode;


//------------ Tag -----------------------------------------------------------

/// The identifier octets of a BER encoded value.
///
/// Each BER encoded value starts with a sequence of one or more octets called
/// the _identifier octets._ They encode the class of the tag, its number,
/// and whether the value uses primitive or constructed encoding. Unlike the
/// tags of ASN.1 proper, a `Tag` keeps the constructed bit since it is what
/// grammars dispatch on: `0x30` is a SEQUENCE and `0xA0` the explicit
/// context specific tag 0.
///
/// # Limitations
///
/// We can only decode up to four identifier octets. That is, we only support
/// tag numbers between 0 and 1fffff.
//
//  Unused trailing octets are always zero, so the derived comparison
//  traits do the right thing.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct Tag([u8; 4]);

/// # Constants for Often Used Tag Values
///
impl Tag {
    /// The mask for checking the class.
    const CLASS_MASK: u8 = 0xc0;

    /// The mask for checking whether the value is constructed.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The mask for the tag number in the first octet.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The mask for the tag number in subsequent octets.
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The bit marking that another identifier octet follows.
    const LAST_OCTET_MASK: u8 = 0x80;

    /// The largest tag number possible with three subsequent octets.
    const MAX_VAL_SPAN_3_OCTETS: u32 = 0x001f_ffff;

    /// The largest tag number possible with two subsequent octets.
    const MAX_VAL_SPAN_2_OCTETS: u32 = 0x3fff;

    /// The largest tag number possible with one subsequent octet.
    const MAX_VAL_SPAN_1_OCTET: u32 = 0x7f;

    /// The largest tag number that fits into the first octet.
    const MAX_VAL_FIRST_OCTET: u32 = 0x1e;

    /// The tag marking the end-of-contents in an indefinite length value.
    ///
    /// This is UNIVERSAL 0.
    pub const END_OF_CONTENTS: Self = Tag([0, 0, 0, 0]);

    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Tag([1, 0, 0, 0]);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Tag([2, 0, 0, 0]);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Tag([3, 0, 0, 0]);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Tag([4, 0, 0, 0]);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Tag([5, 0, 0, 0]);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Tag([6, 0, 0, 0]);

    /// The tag for the ENUMERATED type, UNIVERSAL 10.
    pub const ENUMERATED: Self = Tag([10, 0, 0, 0]);

    /// The tag for the UTF8String type, UNIVERSAL 12.
    pub const UTF8_STRING: Self = Tag([12, 0, 0, 0]);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    ///
    /// Since a SEQUENCE is always constructed, the constant has the
    /// constructed bit set.
    pub const SEQUENCE: Self = Tag([0x30, 0, 0, 0]);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    ///
    /// Since a SET is always constructed, the constant has the
    /// constructed bit set.
    pub const SET: Self = Tag([0x31, 0, 0, 0]);

    /// The tag for the PrintableString type, UNIVERSAL 19.
    pub const PRINTABLE_STRING: Self = Tag([19, 0, 0, 0]);

    /// The tag for the IA5String type, UNIVERSAL 22.
    pub const IA5_STRING: Self = Tag([22, 0, 0, 0]);

    /// The tag for the UTCTime type, UNIVERSAL 23.
    pub const UTC_TIME: Self = Tag([23, 0, 0, 0]);

    /// The tag for the GeneralizedTime type, UNIVERSAL 24.
    pub const GENERALIZED_TIME: Self = Tag([24, 0, 0, 0]);

    /// The tag for the GeneralString type, UNIVERSAL 27.
    pub const GENERAL_STRING: Self = Tag([27, 0, 0, 0]);
}

impl Tag {
    /// Encodes a class and number into identifier octets.
    ///
    /// There are two forms:
    /// * low tag number (for tag numbers between 0 and 30):
    ///     One octet. Bits 8 and 7 specify the class, bit 6 indicates whether
    ///     the encoding is primitive (0), and bits 5-1 give the tag number.
    /// * high tag number (for tag numbers 31 and greater):
    ///     Two or more octets. First octet is as in low-tag-number form,
    ///     except that bits 5-1 all have value 1. Second and following octets
    ///     give the tag number, base 128, most significant digit first, with
    ///     as few digits as possible, and with the bit 8 of each octet except
    ///     the last set to 1.
    ///
    /// # Panics
    ///
    /// This function panics if the tag number is greater than 0x1f_ffff.
    pub const fn new(class: Class, constructed: bool, number: u32) -> Self {
        assert!(number <= Tag::MAX_VAL_SPAN_3_OCTETS);
        let first = class.into_octet() | if constructed {
            Tag::CONSTRUCTED_MASK
        } else {
            0
        };
        if number <= Tag::MAX_VAL_FIRST_OCTET {
            Tag([first | number as u8, 0, 0, 0])
        }
        else if number <= Tag::MAX_VAL_SPAN_1_OCTET {
            Tag([first | Tag::SINGLEBYTE_DATA_MASK, number as u8, 0, 0])
        }
        else if number <= Tag::MAX_VAL_SPAN_2_OCTETS {
            Tag([
                first | Tag::SINGLEBYTE_DATA_MASK,
                (number >> 7) as u8 & Tag::MULTIBYTE_DATA_MASK
                    | Tag::LAST_OCTET_MASK,
                number as u8 & Tag::MULTIBYTE_DATA_MASK,
                0
            ])
        }
        else {
            Tag([
                first | Tag::SINGLEBYTE_DATA_MASK,
                (number >> 14) as u8 & Tag::MULTIBYTE_DATA_MASK
                    | Tag::LAST_OCTET_MASK,
                (number >> 7) as u8 & Tag::MULTIBYTE_DATA_MASK
                    | Tag::LAST_OCTET_MASK,
                number as u8 & Tag::MULTIBYTE_DATA_MASK,
            ])
        }
    }

    /// Creates a primitive tag in the universal class.
    pub const fn universal(number: u32) -> Self {
        Tag::new(Class::Universal, false, number)
    }

    /// Creates a constructed tag in the application class.
    ///
    /// Application tags almost always mark explicitly tagged types, which
    /// is why this returns the constructed form.
    pub const fn application(number: u32) -> Self {
        Tag::new(Class::Application, true, number)
    }

    /// Creates a constructed tag in the context specific class.
    ///
    /// This is the form used by explicitly tagged fields such as the
    /// `[0]` in `pvno [0] INTEGER`.
    pub const fn ctx(number: u32) -> Self {
        Tag::new(Class::Context, true, number)
    }

    /// Creates a primitive tag in the context specific class.
    ///
    /// This is the form used by implicitly tagged primitive fields.
    pub const fn ctx_primitive(number: u32) -> Self {
        Tag::new(Class::Context, false, number)
    }

    /// Creates a tag in the private class.
    pub const fn private(constructed: bool, number: u32) -> Self {
        Tag::new(Class::Private, constructed, number)
    }

    /// Returns the same tag with the constructed bit set.
    pub const fn into_constructed(self) -> Self {
        let mut octets = self.0;
        octets[0] |= Tag::CONSTRUCTED_MASK;
        Tag(octets)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        Class::from_octet(self.0[0])
    }

    /// Returns whether the value uses constructed encoding.
    pub const fn is_constructed(self) -> bool {
        self.0[0] & Tag::CONSTRUCTED_MASK != 0
    }

    /// Returns whether this is the end-of-contents marker.
    pub fn is_end_of_contents(self) -> bool {
        self == Tag::END_OF_CONTENTS
    }

    /// Returns the first identifier octet.
    ///
    /// This is the octet grammars use to look up transitions. For tags in
    /// the high tag number form it only contains the class and constructed
    /// bit.
    pub const fn first_octet(self) -> u8 {
        self.0[0]
    }

    /// Returns the number of the tag.
    pub fn number(self) -> u32 {
        if (Tag::SINGLEBYTE_DATA_MASK & self.0[0]) != Tag::SINGLEBYTE_DATA_MASK {
            u32::from(Tag::SINGLEBYTE_DATA_MASK & self.0[0])
        }
        else if Tag::LAST_OCTET_MASK & self.0[1] == 0 {
            u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[1])
        }
        else if Tag::LAST_OCTET_MASK & self.0[2] == 0 {
            u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[1]) << 7
            | u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[2])
        }
        else {
            u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[1]) << 14
            | u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[2]) << 7
            | u32::from(Tag::MULTIBYTE_DATA_MASK & self.0[3])
        }
    }

    /// Returns the number of identifier octets of the tag.
    pub fn encoded_len(self) -> usize {
        if (Tag::SINGLEBYTE_DATA_MASK & self.0[0]) != Tag::SINGLEBYTE_DATA_MASK {
            1
        }
        else if Tag::LAST_OCTET_MASK & self.0[1] == 0 {
            2
        }
        else if Tag::LAST_OCTET_MASK & self.0[2] == 0 {
            3
        }
        else {
            4
        }
    }

    /// Returns the identifier octets.
    //
    // Panic: encoded_len is at most 4.
    #[allow(clippy::indexing_slicing)]
    pub fn as_slice(&self) -> &[u8] {
        &self.0[..self.encoded_len()]
    }

    /// Takes a tag from the beginning of `data`.
    ///
    /// Returns the tag and the number of identifier octets on success. If
    /// `data` ends before the identifier octets are complete, returns
    /// `Ok(None)` so the read can be retried with more data. `pos` is the
    /// stream position of the first octet and only used for errors.
    pub fn take_from<M: Mode>(
        data: &[u8], pos: Pos
    ) -> Result<Option<(Self, usize)>, DecodeError> {
        let Some(&first) = data.first() else {
            return Ok(None)
        };
        let mut octets = [first, 0, 0, 0];
        if first & Tag::SINGLEBYTE_DATA_MASK != Tag::SINGLEBYTE_DATA_MASK {
            return Ok(Some((Tag(octets), 1)))
        }
        for i in 1..4 {
            let Some(&octet) = data.get(i) else {
                return Ok(None)
            };
            if i == 1 && octet == Tag::LAST_OCTET_MASK {
                return Err(DecodeError::MalformedTag {
                    reason: "leading zero in tag number", pos
                })
            }
            octets[i] = octet;
            if octet & Tag::LAST_OCTET_MASK == 0 {
                let tag = Tag(octets);
                if M::IS_RESTRICTED
                    && tag.number() <= Tag::MAX_VAL_FIRST_OCTET
                {
                    return Err(DecodeError::MalformedTag {
                        reason: "high tag number form for low number", pos
                    })
                }
                return Ok(Some((tag, i + 1)))
            }
        }
        Err(DecodeError::MalformedTag {
            reason: "tag number too large", pos
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut primitive = *self;
        primitive.0[0] &= !Tag::CONSTRUCTED_MASK;
        match primitive {
            Tag::END_OF_CONTENTS => write!(f, "end-of-contents"),
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::ENUMERATED => write!(f, "ENUMERATED"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::PRINTABLE_STRING => write!(f, "PrintableString"),
            Tag::IA5_STRING => write!(f, "IA5String"),
            Tag::UTC_TIME => write!(f, "UTCTime"),
            Tag::GENERALIZED_TIME => write!(f, "GeneralizedTime"),
            Tag::GENERAL_STRING => write!(f, "GeneralString"),
            _ if *self == Tag::SEQUENCE => write!(f, "SEQUENCE"),
            _ if *self == Tag::SET => write!(f, "SET"),
            tag => {
                match tag.class() {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number())
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag(0x{:02x}: {})", self.0[0], self)
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// The universal class, tags defined by X.680 itself.
    Universal,

    /// The application class.
    Application,

    /// The context specific class.
    Context,

    /// The private class.
    Private,
}

impl Class {
    const fn from_octet(octet: u8) -> Self {
        match octet & Tag::CLASS_MASK {
            0x00 => Class::Universal,
            0x40 => Class::Application,
            0x80 => Class::Context,
            _ => Class::Private,
        }
    }

    const fn into_octet(self) -> u8 {
        match self {
            Class::Universal => 0x00,
            Class::Application => 0x40,
            Class::Context => 0x80,
            Class::Private => 0xc0,
        }
    }
}


//============ Tests =========================================================
