//! Tickets.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::sync::OnceLock;
use crate::decode::{ActionError, DecodeError};
use crate::grammar::{Action, Grammar, GrammarBuilder, State, Transition};
use crate::mode::{Ber, Mode};
use crate::tlv::Tlv;
use super::{encrypted, principal};
use super::{fixed_int32, kerberos_string, PVNO};
use super::encrypted::{EncryptedData, EncryptedDataAction, EncryptedDataState};
use super::principal::{PrincipalName, PrincipalNameAction, PrincipalNameState};


//------------ Ticket --------------------------------------------------------

/// A Kerberos ticket.
///
/// ```text
/// Ticket ::= [APPLICATION 1] SEQUENCE {
///     tkt-vno         [0] INTEGER (5),
///     realm           [1] Realm,
///     sname           [2] PrincipalName,
///     enc-part        [3] EncryptedData
/// }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Ticket {
    /// The version number of the ticket format. Always 5.
    pub tkt_vno: i32,

    /// The realm that issued the ticket.
    pub realm: String,

    /// The name of the service the ticket is for.
    pub sname: PrincipalName,

    /// The encrypted part of the ticket.
    pub enc_part: EncryptedData,
}

impl Ticket {
    /// Returns the grammar for a ticket.
    pub fn grammar() -> &'static Grammar<TicketState, TicketAction> {
        static GRAMMAR: OnceLock<Grammar<TicketState, TicketAction>>
            = OnceLock::new();

        GRAMMAR.get_or_init(|| {
            let mut builder = Grammar::builder(
                "Ticket", TicketState::Init, TicketState::End
            );
            add_transitions(
                &mut builder, TicketState::Init, TicketState::End,
                |state| state, |action| action,
            );
            builder.build()
        })
    }

    /// Decodes a complete BER encoded ticket.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        Self::grammar().decode_slice::<Ber>(data)
    }
}


//------------ TicketState ---------------------------------------------------

/// The grammar states of a ticket.
///
/// The `Init` and `End` states are only used when decoding a ticket on its
/// own. A `…Tag` state is entered with the explicit tag of a field, an
/// `…End` state after an embedded structure inside it, and the `…Done`
/// state once the explicit tag has been closed again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TicketState {
    Init,
    App,
    Seq,
    TktVnoTag,
    TktVno,
    TktVnoDone,
    RealmTag,
    Realm,
    RealmDone,
    SnameTag,
    Sname(PrincipalNameState),
    SnameEnd,
    SnameDone,
    EncPartTag,
    EncPart(EncryptedDataState),
    EncPartEnd,
    EncPartDone,
    SeqDone,
    End,
}


//------------ TicketAction --------------------------------------------------

/// The actions for filling in a ticket.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TicketAction {
    TktVno,
    Realm,
    Sname(PrincipalNameAction),
    EncPart(EncryptedDataAction),
}

impl Action for TicketAction {
    type Output = Ticket;

    fn run<M: Mode>(
        &self, tlv: &Tlv, output: &mut Ticket
    ) -> Result<(), ActionError> {
        match self {
            TicketAction::TktVno => {
                output.tkt_vno = fixed_int32::<M>(tlv, "tkt-vno", PVNO)?;
            }
            TicketAction::Realm => {
                output.realm = kerberos_string(tlv)?;
            }
            TicketAction::Sname(action) => {
                action.run::<M>(tlv, &mut output.sname)?;
            }
            TicketAction::EncPart(action) => {
                action.run::<M>(tlv, &mut output.enc_part)?;
            }
        }
        Ok(())
    }
}


//------------ Grammar -------------------------------------------------------

/// Adds the transitions for a ticket to a grammar.
///
/// The arguments work the same as for principal names.
pub(super) fn add_transitions<S: State, A>(
    builder: &mut GrammarBuilder<S, A>,
    entry: S,
    exit: S,
    state: impl Fn(TicketState) -> S,
    action: impl Fn(TicketAction) -> A,
) {
    use self::TicketState::*;

    builder
        .add(
            Transition::new(entry, 0x61, state(App))
                .ends_in(state(SeqDone)).on_close(exit)
        )
        .add(
            Transition::new(state(App), 0x30, state(Seq))
                .ends_in(state(EncPartDone)).on_close(state(SeqDone))
        )
        .add(
            Transition::new(state(Seq), 0xA0, state(TktVnoTag))
                .ends_in(state(TktVno)).on_close(state(TktVnoDone))
        )
        .add(
            Transition::new(state(TktVnoTag), 0x02, state(TktVno))
                .with_action(action(TicketAction::TktVno))
        )
        .add(
            Transition::new(state(TktVnoDone), 0xA1, state(RealmTag))
                .ends_in(state(Realm)).on_close(state(RealmDone))
        )
        .add(
            Transition::new(state(RealmTag), 0x1B, state(Realm))
                .with_action(action(TicketAction::Realm))
        )
        .add(
            Transition::new(state(RealmDone), 0xA2, state(SnameTag))
                .ends_in(state(SnameEnd)).on_close(state(SnameDone))
        )
        .add(
            Transition::new(state(SnameDone), 0xA3, state(EncPartTag))
                .ends_in(state(EncPartEnd)).on_close(state(EncPartDone))
        );

    principal::add_transitions(
        builder, state(SnameTag), state(SnameEnd),
        |inner| state(Sname(inner)),
        |inner| action(TicketAction::Sname(inner)),
    );
    encrypted::add_transitions(
        builder, state(EncPartTag), state(EncPartEnd),
        |inner| state(EncPart(inner)),
        |inner| action(TicketAction::EncPart(inner)),
    );
}


//============ Tests =========================================================
