//! Application replies.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::sync::OnceLock;
use crate::decode::{ActionError, DecodeError};
use crate::grammar::{Action, Grammar, Transition};
use crate::mode::{Ber, Mode};
use crate::tlv::Tlv;
use super::encrypted;
use super::{fixed_int32, KRB_AP_REP, PVNO};
use super::encrypted::{EncryptedData, EncryptedDataAction, EncryptedDataState};


//------------ ApRep ---------------------------------------------------------

/// A KRB_AP_REP message.
///
/// ```text
/// AP-REP ::= [APPLICATION 15] SEQUENCE {
///     pvno            [0] INTEGER (5),
///     msg-type        [1] INTEGER (15),
///     enc-part        [2] EncryptedData -- EncAPRepPart
/// }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ApRep {
    /// The protocol version number. Always 5.
    pub pvno: i32,

    /// The message type. Always 15.
    pub msg_type: i32,

    /// The encrypted part of the reply.
    pub enc_part: EncryptedData,
}

impl ApRep {
    /// Returns the grammar for an AP-REP message.
    pub fn grammar() -> &'static Grammar<ApRepState, ApRepAction> {
        static GRAMMAR: OnceLock<Grammar<ApRepState, ApRepAction>>
            = OnceLock::new();

        GRAMMAR.get_or_init(|| {
            use self::ApRepState as S;

            let mut builder = Grammar::builder("AP-REP", S::Init, S::End);
            builder
                .add(
                    Transition::new(S::Init, 0x6F, S::App)
                        .ends_in(S::SeqDone).on_close(S::End)
                )
                .add(
                    Transition::new(S::App, 0x30, S::Seq)
                        .ends_in(S::EncPartDone).on_close(S::SeqDone)
                )
                .add(
                    Transition::new(S::Seq, 0xA0, S::PvnoTag)
                        .ends_in(S::Pvno).on_close(S::PvnoDone)
                )
                .add(
                    Transition::new(S::PvnoTag, 0x02, S::Pvno)
                        .with_action(ApRepAction::Pvno)
                )
                .add(
                    Transition::new(S::PvnoDone, 0xA1, S::MsgTypeTag)
                        .ends_in(S::MsgType).on_close(S::MsgTypeDone)
                )
                .add(
                    Transition::new(S::MsgTypeTag, 0x02, S::MsgType)
                        .with_action(ApRepAction::MsgType)
                )
                .add(
                    Transition::new(S::MsgTypeDone, 0xA2, S::EncPartTag)
                        .ends_in(S::EncPartEnd).on_close(S::EncPartDone)
                );
            encrypted::add_transitions(
                &mut builder, S::EncPartTag, S::EncPartEnd,
                S::EncPart, ApRepAction::EncPart,
            );
            builder.build()
        })
    }

    /// Decodes a complete BER encoded AP-REP message.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        Self::grammar().decode_slice::<Ber>(data)
    }
}


//------------ ApRepState ----------------------------------------------------

/// The grammar states of an AP-REP message.
///
/// These follow the same naming as those of [`ApReqState`].
///
/// [`ApReqState`]: super::ApReqState
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ApRepState {
    Init,
    App,
    Seq,
    PvnoTag,
    Pvno,
    PvnoDone,
    MsgTypeTag,
    MsgType,
    MsgTypeDone,
    EncPartTag,
    EncPart(EncryptedDataState),
    EncPartEnd,
    EncPartDone,
    SeqDone,
    End,
}


//------------ ApRepAction ---------------------------------------------------

/// The actions for filling in an AP-REP message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApRepAction {
    Pvno,
    MsgType,
    EncPart(EncryptedDataAction),
}

impl Action for ApRepAction {
    type Output = ApRep;

    fn run<M: Mode>(
        &self, tlv: &Tlv, output: &mut ApRep
    ) -> Result<(), ActionError> {
        match self {
            ApRepAction::Pvno => {
                output.pvno = fixed_int32::<M>(tlv, "pvno", PVNO)?;
            }
            ApRepAction::MsgType => {
                output.msg_type = fixed_int32::<M>(
                    tlv, "msg-type", KRB_AP_REP
                )?;
            }
            ApRepAction::EncPart(action) => {
                action.run::<M>(tlv, &mut output.enc_part)?;
            }
        }
        Ok(())
    }
}


//============ Tests =========================================================
