//! BER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::ScalarError;
use crate::mode::Mode;


//------------ Macros for built-in integers ----------------------------------

macro_rules! signed_impl {
    ( $content:ident, $type:ident ) => {{
        const LEN: usize = std::mem::size_of::<$type>();
        let Some(&first) = $content.first() else {
            return Err(ScalarError::EmptyValue)
        };
        if $content.len() > LEN {
            return Err(ScalarError::TooLong { len: $content.len(), max: LEN })
        }

        // Start with all ones for negative numbers. Shifting in the octets
        // then sign extends from exactly the width of the content.
        let init: $type = if first & 0x80 != 0 { -1 } else { 0 };
        Ok($content.iter().fold(init, |res, &octet| {
            res << 8 | $type::from(octet)
        }))
    }}
}


//------------ Integer -------------------------------------------------------

/// Decoding of the content of INTEGER values into built-in integers.
///
/// In BER, an INTEGER is encoded as a primitive value with the content octets
/// providing a variable-length, big-endian, two‘s complement byte sequence of
/// that integer. Thus, the most-significant bit of the first octet serves as
/// the sign bit.
///
/// The `_from_content` functions don’t insist on the shortest possible
/// encoding. The `decode_` functions do so if the mode asks for it. Use
/// [`check_minimal`][Self::check_minimal] directly when necessary.
pub struct Integer;

impl Integer {
    /// Decodes the content of an INTEGER into an `i32`.
    ///
    /// Fails with [`ScalarError::EmptyValue`] if there is no content and with
    /// [`ScalarError::TooLong`] if there are more than four octets.
    pub fn i32_from_content(content: &[u8]) -> Result<i32, ScalarError> {
        signed_impl!(content, i32)
    }

    /// Decodes an `i32` and checks that it is in the range `min..=max`.
    pub fn i32_in_range(
        content: &[u8], min: i32, max: i32
    ) -> Result<i32, ScalarError> {
        let res = Self::i32_from_content(content)?;
        if res < min || res > max {
            return Err(ScalarError::OutOfRange {
                value: res.into(), min: min.into(), max: max.into()
            })
        }
        Ok(res)
    }

    /// Decodes the content of an INTEGER into an `i64`.
    ///
    /// Fails with [`ScalarError::EmptyValue`] if there is no content and with
    /// [`ScalarError::TooLong`] if there are more than eight octets.
    pub fn i64_from_content(content: &[u8]) -> Result<i64, ScalarError> {
        signed_impl!(content, i64)
    }

    /// Decodes an `i64` and checks that it is in the range `min..=max`.
    pub fn i64_in_range(
        content: &[u8], min: i64, max: i64
    ) -> Result<i64, ScalarError> {
        let res = Self::i64_from_content(content)?;
        if res < min || res > max {
            return Err(ScalarError::OutOfRange { value: res, min, max })
        }
        Ok(res)
    }

    /// Decodes the content of an INTEGER limited to the range of a `u32`.
    ///
    /// Since the content is two’s complement, values above `i32::MAX` need
    /// five octets. They are decoded via an `i64`.
    pub fn u32_from_content(content: &[u8]) -> Result<u32, ScalarError> {
        let res = Self::i64_in_range(content, 0, u32::MAX.into())?;
        u32::try_from(res).map_err(|_| ScalarError::OutOfRange {
            value: res, min: 0, max: u32::MAX.into()
        })
    }

    /// Decodes an `i32` according to the rules of mode `M`.
    pub fn decode_i32<M: Mode>(content: &[u8]) -> Result<i32, ScalarError> {
        Self::check_mode::<M>(content)?;
        Self::i32_from_content(content)
    }

    /// Decodes an `i64` according to the rules of mode `M`.
    pub fn decode_i64<M: Mode>(content: &[u8]) -> Result<i64, ScalarError> {
        Self::check_mode::<M>(content)?;
        Self::i64_from_content(content)
    }

    /// Decodes a `u32` according to the rules of mode `M`.
    pub fn decode_u32<M: Mode>(content: &[u8]) -> Result<u32, ScalarError> {
        Self::check_mode::<M>(content)?;
        Self::u32_from_content(content)
    }

    fn check_mode<M: Mode>(content: &[u8]) -> Result<(), ScalarError> {
        if M::IS_RESTRICTED {
            Self::check_minimal(content)
        }
        else {
            Ok(())
        }
    }

    /// Checks that an integer is encoded in the shortest possible form.
    ///
    /// Specifically, checks that there is at least one octet and that the
    /// first nine bits of a multi-octet integer are not all the same. This
    /// is required by DER.
    pub fn check_minimal(content: &[u8]) -> Result<(), ScalarError> {
        match (content.first(), content.get(1).map(|x| x & 0x80 != 0)) {
            (None, _) => Err(ScalarError::EmptyValue),
            (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
                Err(ScalarError::NonCanonical)
            }
            _ => Ok(())
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use proptest::prelude::*;
    use crate::mode::{Ber, Der};
    use super::*;

    /// Produces the minimal two’s complement encoding of `value`.
    fn encode(value: i64) -> Vec<u8> {
        let bytes = value.to_be_bytes();
        let mut start = 0;
        while start < 7 {
            let (cur, next) = (bytes[start], bytes[start + 1]);
            if (cur == 0 && next & 0x80 == 0)
                || (cur == 0xFF && next & 0x80 != 0)
            {
                start += 1;
            }
            else {
                break
            }
        }
        bytes[start..].to_vec()
    }

    #[test]
    fn decode_i32() {
        assert_eq!(Integer::i32_from_content(b"\x00"), Ok(0));
        assert_eq!(Integer::i32_from_content(b"\x7f"), Ok(127));
        assert_eq!(Integer::i32_from_content(b"\x00\x80"), Ok(128));
        assert_eq!(Integer::i32_from_content(b"\x80"), Ok(-128));
        assert_eq!(Integer::i32_from_content(b"\xff"), Ok(-1));
        assert_eq!(Integer::i32_from_content(b"\x80\xFF"), Ok(-32513));
        assert_eq!(Integer::i32_from_content(b"\xFF\xFF\xFF\xFF"), Ok(-1));
        assert_eq!(
            Integer::i32_from_content(b"\x80\x00\x00\x00"), Ok(i32::MIN)
        );
        assert_eq!(
            Integer::i32_from_content(b"\x7F\xFF\xFF\xFF"), Ok(i32::MAX)
        );
    }

    #[test]
    fn boundary_lengths() {
        assert_eq!(
            Integer::i32_from_content(b""), Err(ScalarError::EmptyValue)
        );
        assert_eq!(
            Integer::i32_from_content(b"\x00\x01\x02\x03\x04"),
            Err(ScalarError::TooLong { len: 5, max: 4 })
        );
        assert_eq!(
            Integer::i64_from_content(b""), Err(ScalarError::EmptyValue)
        );
        assert_eq!(
            Integer::i64_from_content(b"\x01\x02\x03\x04\x05\x06\x07\x08\x09"),
            Err(ScalarError::TooLong { len: 9, max: 8 })
        );
        assert_eq!(
            Integer::i64_from_content(b"\x80\0\0\0\0\0\0\0"), Ok(i64::MIN)
        );
    }

    #[test]
    fn ranges() {
        assert_eq!(Integer::i32_in_range(b"\x05", 0, 10), Ok(5));
        assert_eq!(
            Integer::i32_in_range(b"\x0b", 0, 10),
            Err(ScalarError::OutOfRange { value: 11, min: 0, max: 10 })
        );
        assert_eq!(
            Integer::i64_in_range(b"\xff", 0, 10),
            Err(ScalarError::OutOfRange { value: -1, min: 0, max: 10 })
        );
        assert_eq!(
            Integer::u32_from_content(b"\x00\xFF\xFF\xFF\xFF"), Ok(u32::MAX)
        );
        assert!(Integer::u32_from_content(b"\x80").is_err());
        assert!(Integer::u32_from_content(b"\x01\x00\x00\x00\x00").is_err());
    }

    #[test]
    fn minimal() {
        assert_eq!(Integer::check_minimal(b"\x00"), Ok(()));
        assert_eq!(Integer::check_minimal(b"\xFF"), Ok(()));
        assert_eq!(Integer::check_minimal(b"\x00\x80"), Ok(()));
        assert_eq!(Integer::check_minimal(b"\xFF\x7F"), Ok(()));
        assert_eq!(
            Integer::check_minimal(b"\x00\x7F"), Err(ScalarError::NonCanonical)
        );
        assert_eq!(
            Integer::check_minimal(b"\xFF\x80"), Err(ScalarError::NonCanonical)
        );
        assert_eq!(Integer::check_minimal(b""), Err(ScalarError::EmptyValue));
    }

    #[test]
    fn decode_by_mode() {
        assert_eq!(Integer::decode_i32::<Ber>(b"\x00\x05"), Ok(5));
        assert_eq!(
            Integer::decode_i32::<Der>(b"\x00\x05"),
            Err(ScalarError::NonCanonical)
        );
        assert_eq!(Integer::decode_i32::<Der>(b"\x05"), Ok(5));
        assert_eq!(Integer::decode_i64::<Ber>(b"\xFF\xFF"), Ok(-1));
        assert_eq!(
            Integer::decode_i64::<Der>(b"\xFF\xFF"),
            Err(ScalarError::NonCanonical)
        );
        assert_eq!(
            Integer::decode_u32::<Der>(b"\x00\xFF\xFF\xFF\xFF"),
            Ok(u32::MAX)
        );
        assert_eq!(
            Integer::decode_u32::<Der>(b""), Err(ScalarError::EmptyValue)
        );
    }

    proptest! {
        #[test]
        fn i32_round_trip(value in any::<i32>()) {
            let content = encode(value.into());
            prop_assert!(content.len() <= 4);
            prop_assert_eq!(Integer::check_minimal(&content), Ok(()));
            prop_assert_eq!(Integer::i32_from_content(&content), Ok(value));
        }

        #[test]
        fn i64_round_trip(value in any::<i64>()) {
            let content = encode(value);
            prop_assert_eq!(Integer::i64_from_content(&content), Ok(value));
        }
    }
}
