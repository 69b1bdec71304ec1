#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use bergram::decode::Pos;
use bergram::scalar::{BitString, Boolean, Integer};
use bergram::{Ber, Der, Length, Tag};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = Integer::i32_from_content(data) {
        assert_eq!(Integer::i64_from_content(data), Ok(value.into()));
    }
    let _ = Integer::u32_from_content(data);
    if let Ok(value) = Integer::decode_i64::<Der>(data) {
        assert_eq!(Integer::check_minimal(data), Ok(()));
        assert_eq!(Integer::decode_i64::<Ber>(data), Ok(value));
    }
    let _ = Boolean::decode::<Ber>(data);
    let _ = Boolean::decode::<Der>(data);
    if let Ok(bits) = BitString::from_content(Bytes::copy_from_slice(data)) {
        let _ = bits.to_u32_flags();
        assert!(bits.bit_len() <= bits.octet_len() * 8);
    }
    let _ = BitString::decode::<Der>(Bytes::copy_from_slice(data));

    // The tokenizer must never claim more octets than it was given.
    if let Ok(Some((tag, len))) = Tag::take_from::<Ber>(data, Pos::from(0)) {
        assert_eq!(tag.encoded_len(), len);
        assert!(len <= data.len());
    }
    if let Ok(Some((_, len))) = Length::take_from::<Der>(data, Pos::from(0)) {
        assert!(len <= data.len());
    }
});
