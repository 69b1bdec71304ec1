//! BER encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::ScalarError;
use crate::mode::Mode;


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike octet strings, they do not
/// need to contain a multiple of eight bits.
///
/// There are two types of methods for accessing the data in a bit string.
/// Methods starting with `bit` operate on the individual bits while those
/// prefixed with `octet` access entire octets and ignore the fact that there
/// may be unused bits in the final octet.
///
/// # BER Encoding
///
/// If encoded as a primitive value, the first octet of the content contains
/// the number of unused bits in the last octet and the following octets
/// contain the bits with the first bit in the most significant bit of the
/// octet.
///
/// # Limitation
///
/// The constructed encoding allowed by BER is not supported. Protocols
/// decoded with this crate don’t use it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitString {
    /// The number of unused bits in the last byte.
    unused: u8,

    /// The bytes of the bit string.
    bits: Bytes,
}

impl BitString {
    /// Creates a new bit string.
    pub fn new(unused: u8, bits: Bytes) -> Self {
        Self { unused, bits }
    }

    /// Parses the content octets of a primitive bit string.
    ///
    /// Fails if the content is empty, the number of unused bits is larger
    /// than seven, or there are unused bits but no octets.
    pub fn from_content(mut content: Bytes) -> Result<Self, ScalarError> {
        let Some(&unused) = content.first() else {
            return Err(ScalarError::EmptyValue)
        };
        if unused > 7 || (unused > 0 && content.len() == 1) {
            return Err(ScalarError::InvalidUnusedBits(unused))
        }
        let bits = content.split_off(1);
        Ok(Self { unused, bits })
    }

    /// Decodes a primitive bit string according to the rules of mode `M`.
    ///
    /// DER additionally requires the unused bits to be zero.
    pub fn decode<M: Mode>(content: Bytes) -> Result<Self, ScalarError> {
        let res = Self::from_content(content)?;
        if M::IS_RESTRICTED && res.unused > 0 {
            let mask = (1u8 << res.unused) - 1;
            if res.bits.last().map(|last| last & mask != 0).unwrap_or(false) {
                return Err(ScalarError::NonCanonical)
            }
        }
        Ok(res)
    }

    /// Returns the value of the given bit.
    ///
    /// Bit 0 is the most significant bit of the first octet. Bits beyond
    /// the end of the bit string are false.
    pub fn bit(&self, bit: usize) -> bool {
        if bit >= self.bit_len() {
            return false
        }
        let Some(octet) = self.bits.get(bit >> 3) else {
            return false
        };
        octet & (0x80 >> (bit & 7)) != 0
    }

    /// Returns the number of bits in the bit string.
    pub fn bit_len(&self) -> usize {
        (self.bits.len() << 3) - usize::from(self.unused)
    }

    /// Returns the number of unused bits in the last octet.
    pub fn unused(&self) -> u8 {
        self.unused
    }

    /// Returns the number of octets in the bit string.
    pub fn octet_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns a slice of the octets in the bit string.
    pub fn octet_slice(&self) -> &[u8] {
        self.bits.as_ref()
    }

    /// Returns the first 32 bits as a big-endian integer.
    ///
    /// Missing bits are zero. This is how flag fields such as Kerberos’
    /// `KerberosFlags` are usually treated.
    pub fn to_u32_flags(&self) -> u32 {
        (0..32).fold(0u32, |res, bit| {
            res << 1 | u32::from(self.bit(bit))
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::mode::{Ber, Der};
    use super::*;

    #[test]
    fn from_content() {
        let bits = BitString::from_content(
            Bytes::from_static(b"\x04\xA0\x50")
        ).unwrap();
        assert_eq!(bits.unused(), 4);
        assert_eq!(bits.octet_len(), 2);
        assert_eq!(bits.bit_len(), 12);
        assert_eq!(bits.octet_slice(), b"\xA0\x50");
        assert!(bits.bit(0));
        assert!(!bits.bit(1));
        assert!(bits.bit(2));
        assert!(bits.bit(9));
        assert!(!bits.bit(12));
        assert!(!bits.bit(100));

        let empty = BitString::from_content(Bytes::from_static(b"\x00"));
        assert_eq!(empty.unwrap().bit_len(), 0);
    }

    #[test]
    fn malformed() {
        assert_eq!(
            BitString::from_content(Bytes::new()),
            Err(ScalarError::EmptyValue)
        );
        assert_eq!(
            BitString::from_content(Bytes::from_static(b"\x08\x00")),
            Err(ScalarError::InvalidUnusedBits(8))
        );
        assert_eq!(
            BitString::from_content(Bytes::from_static(b"\x01")),
            Err(ScalarError::InvalidUnusedBits(1))
        );
    }

    #[test]
    fn unused_bits_by_mode() {
        let data = Bytes::from_static(b"\x04\xA1");
        assert!(BitString::decode::<Ber>(data.clone()).is_ok());
        assert_eq!(
            BitString::decode::<Der>(data), Err(ScalarError::NonCanonical)
        );
        assert_eq!(
            BitString::decode::<Der>(Bytes::from_static(b"\x04\xA0"))
                .map(|bits| bits.bit_len()),
            Ok(4)
        );
    }

    #[test]
    fn flags() {
        let bits = BitString::from_content(
            Bytes::from_static(b"\x00\x20\x00\x00\x01")
        ).unwrap();
        assert_eq!(bits.to_u32_flags(), 0x2000_0001);

        let short = BitString::from_content(
            Bytes::from_static(b"\x07\x80")
        ).unwrap();
        assert_eq!(short.to_u32_flags(), 0x8000_0000);
    }
}
