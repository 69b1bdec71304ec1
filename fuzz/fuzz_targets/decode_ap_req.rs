#![no_main]

use libfuzzer_sys::fuzz_target;
use bergram::decode::{DecodeOutcome, Decoder};
use bergram::kerberos::ApReq;

// The first octet gives the chunk size. Decoding in chunks must always give
// the same result as decoding everything at once.
fuzz_target!(|data: &[u8]| {
    let Some((&size, data)) = data.split_first() else {
        return
    };
    let size = usize::from(size).max(1);

    let mut whole = Decoder::new(ApReq::grammar());
    let expected = whole.decode(data);

    let mut decoder = Decoder::new(ApReq::grammar());
    let mut outcome = DecodeOutcome::NeedMoreData;
    for chunk in data.chunks(size) {
        outcome = decoder.decode(chunk);
        if !outcome.is_need_more_data() {
            break
        }
    }

    match (expected, outcome) {
        (DecodeOutcome::Complete(left), DecodeOutcome::Complete(right)) => {
            assert_eq!(left, right)
        }
        (DecodeOutcome::Failed(_), DecodeOutcome::Failed(_)) => { }
        (DecodeOutcome::NeedMoreData, DecodeOutcome::NeedMoreData) => { }
        (left, right) => {
            panic!("whole: {:?}, chunked: {:?}", left, right)
        }
    }
});
