//! Principal names.
//!
//! This is a private module. Its public items are re-exported by the parent.

use crate::decode::ActionError;
use crate::grammar::{Action, GrammarBuilder, State, Transition};
use crate::mode::Mode;
use crate::tlv::Tlv;
use super::{int32, kerberos_string};


//------------ PrincipalName -------------------------------------------------

/// The name of a Kerberos principal.
///
/// ```text
/// PrincipalName ::= SEQUENCE {
///     name-type       [0] Int32,
///     name-string     [1] SEQUENCE OF KerberosString
/// }
/// ```
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct PrincipalName {
    /// The type of the name, such as NT-PRINCIPAL or NT-SRV-INST.
    pub name_type: i32,

    /// The components of the name.
    pub name_string: Vec<String>,
}

impl PrincipalName {
    /// The name type for the name of a user or service.
    pub const NT_PRINCIPAL: i32 = 1;

    /// The name type for a service and its instance.
    pub const NT_SRV_INST: i32 = 2;

    /// The name type for a service with a host name as instance.
    pub const NT_SRV_HST: i32 = 3;
}


//------------ PrincipalNameState --------------------------------------------

/// The grammar states inside a principal name.
///
/// A `…Tag` state is entered with the explicit tag of a field and the
/// `…Done` state once the explicit tag has been closed again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrincipalNameState {
    Seq,
    NameTypeTag,
    NameType,
    NameTypeDone,
    NameStringTag,
    NameString,
    NameStringEnd,
    NameStringDone,
}


//------------ PrincipalNameAction -------------------------------------------

/// The actions for filling in a principal name.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrincipalNameAction {
    NameType,
    NameString,
}

impl Action for PrincipalNameAction {
    type Output = PrincipalName;

    fn run<M: Mode>(
        &self, tlv: &Tlv, output: &mut PrincipalName
    ) -> Result<(), ActionError> {
        match self {
            PrincipalNameAction::NameType => {
                output.name_type = int32::<M>(tlv)?;
            }
            PrincipalNameAction::NameString => {
                output.name_string.push(kerberos_string(tlv)?);
            }
        }
        Ok(())
    }
}


//------------ Grammar -------------------------------------------------------

/// Adds the transitions for a principal name to a grammar.
///
/// The name starts in state `entry` and leaves the grammar in state `exit`
/// once it is complete. The functions `state` and `action` wrap the states
/// and actions of the principal name into those of the grammar.
pub(super) fn add_transitions<S: State, A>(
    builder: &mut GrammarBuilder<S, A>,
    entry: S,
    exit: S,
    state: impl Fn(PrincipalNameState) -> S,
    action: impl Fn(PrincipalNameAction) -> A,
) {
    use self::PrincipalNameState::*;

    builder
        .add(
            Transition::new(entry, 0x30, state(Seq))
                .ends_in(state(NameStringDone)).on_close(exit)
        )
        .add(
            Transition::new(state(Seq), 0xA0, state(NameTypeTag))
                .ends_in(state(NameType)).on_close(state(NameTypeDone))
        )
        .add(
            Transition::new(state(NameTypeTag), 0x02, state(NameType))
                .with_action(action(PrincipalNameAction::NameType))
        )
        .add(
            Transition::new(state(NameTypeDone), 0xA1, state(NameStringTag))
                .ends_in(state(NameStringEnd))
                .on_close(state(NameStringDone))
        )
        .add(
            Transition::new(state(NameStringTag), 0x30, state(NameString))
                .ends_in(state(NameString))
                .on_close(state(NameStringEnd))
        )
        .add(
            Transition::new(state(NameString), 0x1B, state(NameString))
                .with_action(action(PrincipalNameAction::NameString))
        );
}


//============ Tests =========================================================
