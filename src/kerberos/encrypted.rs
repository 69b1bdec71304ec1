//! Encrypted data.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::decode::ActionError;
use crate::grammar::{Action, GrammarBuilder, State, Transition};
use crate::mode::Mode;
use crate::tlv::Tlv;
use super::{int32, uint32};


//------------ EncryptedData -------------------------------------------------

/// An encrypted part of a message.
///
/// ```text
/// EncryptedData ::= SEQUENCE {
///     etype   [0] Int32,
///     kvno    [1] UInt32 OPTIONAL,
///     cipher  [2] OCTET STRING
/// }
/// ```
///
/// The cipher text is kept as is. It shares the memory of the buffer it
/// was decoded from.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct EncryptedData {
    /// The encryption type.
    pub etype: i32,

    /// The version number of the key used for encryption.
    pub kvno: Option<u32>,

    /// The cipher text.
    pub cipher: Bytes,
}


//------------ EncryptedDataState --------------------------------------------

/// The grammar states inside encrypted data.
///
/// A `…Tag` state is entered with the explicit tag of a field and the
/// `…Done` state once the explicit tag has been closed again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EncryptedDataState {
    Seq,
    EtypeTag,
    Etype,
    EtypeDone,
    KvnoTag,
    Kvno,
    KvnoDone,
    CipherTag,
    Cipher,
    CipherDone,
}


//------------ EncryptedDataAction -------------------------------------------

/// The actions for filling in encrypted data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncryptedDataAction {
    Etype,
    Kvno,
    Cipher,
}

impl Action for EncryptedDataAction {
    type Output = EncryptedData;

    fn run<M: Mode>(
        &self, tlv: &Tlv, output: &mut EncryptedData
    ) -> Result<(), ActionError> {
        match self {
            EncryptedDataAction::Etype => {
                output.etype = int32::<M>(tlv)?
            }
            EncryptedDataAction::Kvno => {
                output.kvno = Some(uint32::<M>(tlv)?)
            }
            EncryptedDataAction::Cipher => {
                output.cipher = tlv.content_bytes()?
            }
        }
        Ok(())
    }
}


//------------ Grammar -------------------------------------------------------

/// Adds the transitions for encrypted data to a grammar.
///
/// The arguments work the same as for principal names.
pub(super) fn add_transitions<S: State, A>(
    builder: &mut GrammarBuilder<S, A>,
    entry: S,
    exit: S,
    state: impl Fn(EncryptedDataState) -> S,
    action: impl Fn(EncryptedDataAction) -> A,
) {
    use self::EncryptedDataState::*;

    let cipher = |from: S| {
        Transition::new(from, 0xA2, state(CipherTag))
            .ends_in(state(Cipher)).on_close(state(CipherDone))
    };

    builder
        .add(
            Transition::new(entry, 0x30, state(Seq))
                .ends_in(state(CipherDone)).on_close(exit)
        )
        .add(
            Transition::new(state(Seq), 0xA0, state(EtypeTag))
                .ends_in(state(Etype)).on_close(state(EtypeDone))
        )
        .add(
            Transition::new(state(EtypeTag), 0x02, state(Etype))
                .with_action(action(EncryptedDataAction::Etype))
        )
        .add(
            Transition::new(state(EtypeDone), 0xA1, state(KvnoTag))
                .ends_in(state(Kvno)).on_close(state(KvnoDone))
        )
        .add(
            Transition::new(state(KvnoTag), 0x02, state(Kvno))
                .with_action(action(EncryptedDataAction::Kvno))
        )
        .add(cipher(state(EtypeDone)))
        .add(cipher(state(KvnoDone)))
        .add(
            Transition::new(state(CipherTag), 0x04, state(Cipher))
                .with_action(action(EncryptedDataAction::Cipher))
        );
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use crate::decode::{DecodeError, ScalarError};
    use crate::grammar::Grammar;
    use crate::kerberos::testdata::{cons, encrypted_data, int, tlv};
    use crate::mode::{Ber, Der};
    use crate::tag::Tag;
    use super::*;

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum St { Init, Enc(EncryptedDataState), End }

    fn grammar() -> Grammar<St, EncryptedDataAction> {
        let mut builder = Grammar::builder("EncryptedData", St::Init, St::End);
        add_transitions(&mut builder, St::Init, St::End, St::Enc, |a| a);
        builder.build()
    }

    #[test]
    fn with_and_without_kvno() {
        let grammar = grammar();
        assert_eq!(
            grammar.decode_slice::<Der>(
                &encrypted_data(17, Some(3), b"secret")
            ),
            Ok(EncryptedData {
                etype: 17,
                kvno: Some(3),
                cipher: Bytes::from_static(b"secret"),
            })
        );
        assert_eq!(
            grammar.decode_slice::<Der>(&encrypted_data(23, None, b"")),
            Ok(EncryptedData {
                etype: 23, kvno: None, cipher: Bytes::new()
            })
        );
    }

    #[test]
    fn missing_cipher() {
        let data = cons(0x30, &[&int(0xA0, 17), &int(0xA1, 1)]);
        assert_eq!(
            grammar().decode_slice::<Ber>(&data),
            Err(DecodeError::UnexpectedEnd {
                grammar: "EncryptedData",
                state: "Enc(KvnoDone)".into(),
                pos: 12.into(),
            })
        );
    }

    #[test]
    fn cipher_inside_kvno() {
        let data = cons(0x30, &[
            &int(0xA0, 17),
            &cons(0xA1, &[
                &tlv(0x02, b"\x01"), &cons(0xA2, &[&tlv(0x04, b"")])
            ]),
        ]);
        assert_eq!(
            grammar().decode_slice::<Ber>(&data),
            Err(DecodeError::BadTransition {
                grammar: "EncryptedData",
                state: "Enc(Kvno)".into(),
                tag: Tag::ctx(2),
                pos: 12.into(),
            })
        );
    }

    #[test]
    fn non_minimal_etype() {
        let data = cons(0x30, &[
            &cons(0xA0, &[&tlv(0x02, b"\x00\x11")]),
            &cons(0xA2, &[&tlv(0x04, b"")]),
        ]);
        assert_eq!(
            grammar().decode_slice::<Ber>(&data).map(|enc| enc.etype),
            Ok(17)
        );
        assert!(matches!(
            grammar().decode_slice::<Der>(&data),
            Err(DecodeError::Action {
                source: ActionError::Scalar(ScalarError::NonCanonical),
                ..
            })
        ));
    }

    #[test]
    fn negative_kvno() {
        let data = cons(0x30, &[
            &cons(0xA0, &[&tlv(0x02, b"\x11")]),
            &cons(0xA1, &[&tlv(0x02, b"\xff")]),
            &cons(0xA2, &[&tlv(0x04, b"")]),
        ]);
        assert!(matches!(
            grammar().decode_slice::<Ber>(&data),
            Err(DecodeError::Action {
                source: ActionError::Scalar(ScalarError::OutOfRange { .. }),
                ..
            })
        ));
    }
}
