//! Application requests.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::sync::OnceLock;
use crate::decode::{ActionError, DecodeError};
use crate::grammar::{Action, Grammar, Transition};
use crate::mode::{Ber, Mode};
use crate::scalar::BitString;
use crate::tlv::Tlv;
use super::{encrypted, ticket};
use super::{fixed_int32, KRB_AP_REQ, PVNO};
use super::encrypted::{EncryptedData, EncryptedDataAction, EncryptedDataState};
use super::ticket::{Ticket, TicketAction, TicketState};


//------------ ApReq ---------------------------------------------------------

/// A KRB_AP_REQ message.
///
/// ```text
/// AP-REQ ::= [APPLICATION 14] SEQUENCE {
///     pvno            [0] INTEGER (5),
///     msg-type        [1] INTEGER (14),
///     ap-options      [2] APOptions,
///     ticket          [3] Ticket,
///     authenticator   [4] EncryptedData -- Authenticator
/// }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ApReq {
    /// The protocol version number. Always 5.
    pub pvno: i32,

    /// The message type. Always 14.
    pub msg_type: i32,

    /// The options requested by the client.
    pub ap_options: ApOptions,

    /// The ticket authenticating the client to the service.
    pub ticket: Ticket,

    /// The encrypted authenticator.
    pub authenticator: EncryptedData,
}

impl ApReq {
    /// Returns the grammar for an AP-REQ message.
    pub fn grammar() -> &'static Grammar<ApReqState, ApReqAction> {
        static GRAMMAR: OnceLock<Grammar<ApReqState, ApReqAction>>
            = OnceLock::new();

        GRAMMAR.get_or_init(build_grammar)
    }

    /// Decodes a complete BER encoded AP-REQ message.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        Self::grammar().decode_slice::<Ber>(data)
    }
}


//------------ ApOptions -----------------------------------------------------

/// The options of an AP-REQ.
///
/// The options are a bit string of at least 32 bits. The bits are kept as
/// a `u32` with bit 0 as the most significant bit.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ApOptions(u32);

impl ApOptions {
    /// Reserved for future use.
    pub const RESERVED: u32 = 0x8000_0000;

    /// The ticket is encrypted in the session key of another ticket.
    pub const USE_SESSION_KEY: u32 = 0x4000_0000;

    /// The client requires mutual authentication.
    pub const MUTUAL_REQUIRED: u32 = 0x2000_0000;

    /// Creates options from the raw bits.
    pub fn from_bits(bits: u32) -> Self {
        ApOptions(bits)
    }

    /// Returns the raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Returns whether all bits in `flags` are set.
    pub fn contains(self, flags: u32) -> bool {
        self.0 & flags == flags
    }

    /// Returns whether the use-session-key option is set.
    pub fn use_session_key(self) -> bool {
        self.contains(Self::USE_SESSION_KEY)
    }

    /// Returns whether the mutual-required option is set.
    pub fn mutual_required(self) -> bool {
        self.contains(Self::MUTUAL_REQUIRED)
    }
}

impl From<BitString> for ApOptions {
    fn from(bits: BitString) -> Self {
        ApOptions(bits.to_u32_flags())
    }
}


//------------ ApReqState ----------------------------------------------------

/// The grammar states of an AP-REQ message.
///
/// A `…Tag` state is entered with the explicit tag of a field, an `…End`
/// state after an embedded structure inside it, and the `…Done` state once
/// the explicit tag has been closed again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ApReqState {
    Init,
    App,
    Seq,
    PvnoTag,
    Pvno,
    PvnoDone,
    MsgTypeTag,
    MsgType,
    MsgTypeDone,
    ApOptionsTag,
    ApOptions,
    ApOptionsDone,
    TicketTag,
    Ticket(TicketState),
    TicketEnd,
    TicketDone,
    AuthenticatorTag,
    Authenticator(EncryptedDataState),
    AuthenticatorEnd,
    AuthenticatorDone,
    SeqDone,
    End,
}


//------------ ApReqAction ---------------------------------------------------

/// The actions for filling in an AP-REQ message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApReqAction {
    Pvno,
    MsgType,
    ApOptions,
    Ticket(TicketAction),
    Authenticator(EncryptedDataAction),
}

impl Action for ApReqAction {
    type Output = ApReq;

    fn run<M: Mode>(
        &self, tlv: &Tlv, output: &mut ApReq
    ) -> Result<(), ActionError> {
        match self {
            ApReqAction::Pvno => {
                output.pvno = fixed_int32::<M>(tlv, "pvno", PVNO)?;
            }
            ApReqAction::MsgType => {
                output.msg_type = fixed_int32::<M>(
                    tlv, "msg-type", KRB_AP_REQ
                )?;
            }
            ApReqAction::ApOptions => {
                output.ap_options = BitString::decode::<M>(
                    tlv.content_bytes()?
                )?.into();
            }
            ApReqAction::Ticket(action) => {
                action.run::<M>(tlv, &mut output.ticket)?;
            }
            ApReqAction::Authenticator(action) => {
                action.run::<M>(tlv, &mut output.authenticator)?;
            }
        }
        Ok(())
    }
}


//------------ Grammar -------------------------------------------------------

fn build_grammar() -> Grammar<ApReqState, ApReqAction> {
    use self::ApReqState as S;

    let mut builder = Grammar::builder("AP-REQ", S::Init, S::End);
    builder
        .add(
            Transition::new(S::Init, 0x6E, S::App)
                .ends_in(S::SeqDone).on_close(S::End)
        )
        .add(
            Transition::new(S::App, 0x30, S::Seq)
                .ends_in(S::AuthenticatorDone).on_close(S::SeqDone)
        )
        .add(
            Transition::new(S::Seq, 0xA0, S::PvnoTag)
                .ends_in(S::Pvno).on_close(S::PvnoDone)
        )
        .add(
            Transition::new(S::PvnoTag, 0x02, S::Pvno)
                .with_action(ApReqAction::Pvno)
        )
        .add(
            Transition::new(S::PvnoDone, 0xA1, S::MsgTypeTag)
                .ends_in(S::MsgType).on_close(S::MsgTypeDone)
        )
        .add(
            Transition::new(S::MsgTypeTag, 0x02, S::MsgType)
                .with_action(ApReqAction::MsgType)
        )
        .add(
            Transition::new(S::MsgTypeDone, 0xA2, S::ApOptionsTag)
                .ends_in(S::ApOptions).on_close(S::ApOptionsDone)
        )
        .add(
            Transition::new(S::ApOptionsTag, 0x03, S::ApOptions)
                .with_action(ApReqAction::ApOptions)
        )
        .add(
            Transition::new(S::ApOptionsDone, 0xA3, S::TicketTag)
                .ends_in(S::TicketEnd).on_close(S::TicketDone)
        )
        .add(
            Transition::new(S::TicketDone, 0xA4, S::AuthenticatorTag)
                .ends_in(S::AuthenticatorEnd)
                .on_close(S::AuthenticatorDone)
        );

    ticket::add_transitions(
        &mut builder, S::TicketTag, S::TicketEnd,
        S::Ticket, ApReqAction::Ticket,
    );
    encrypted::add_transitions(
        &mut builder, S::AuthenticatorTag, S::AuthenticatorEnd,
        S::Authenticator, ApReqAction::Authenticator,
    );
    builder.build()
}


//============ Tests =========================================================
