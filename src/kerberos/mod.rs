//! Grammars for Kerberos messages.
//!
//! This module contains grammars for the Kerberos V5 messages used in
//! application authentication as defined in [RFC 4120]: the [`Ticket`],
//! the [`ApReq`] sent by a client to a service, and the [`ApRep`] answering
//! it. Each message type provides access to its grammar through a
//! `grammar` function and decodes complete messages through `decode`. For
//! data arriving in pieces, create a [`Decoder`][crate::decode::Decoder]
//! from the grammar.
//!
//! The structures [`PrincipalName`] and [`EncryptedData`] appear inside
//! several messages. Their states and actions are wrapped by those of the
//! messages that contain them.
//!
//! Only the wire format is dealt with here. In particular, encrypted parts
//! are kept as they are.
//!
//! [RFC 4120]: https://tools.ietf.org/html/rfc4120

pub use self::ap_rep::{ApRep, ApRepAction, ApRepState};
pub use self::ap_req::{ApOptions, ApReq, ApReqAction, ApReqState};
pub use self::encrypted::{
    EncryptedData, EncryptedDataAction, EncryptedDataState
};
pub use self::principal::{
    PrincipalName, PrincipalNameAction, PrincipalNameState
};
pub use self::ticket::{Ticket, TicketAction, TicketState};

mod ap_rep;
mod ap_req;
mod encrypted;
mod principal;
mod ticket;

use std::str;
use crate::decode::ActionError;
use crate::mode::Mode;
use crate::scalar::Integer;
use crate::tlv::Tlv;


//------------ Constants -----------------------------------------------------

/// The protocol version number of Kerberos V5.
pub const PVNO: i32 = 5;

/// The message type of a KRB_AP_REQ message.
pub const KRB_AP_REQ: i32 = 14;

/// The message type of a KRB_AP_REP message.
pub const KRB_AP_REP: i32 = 15;


//------------ Helpers for actions -------------------------------------------

/// Decodes an `Int32`.
fn int32<M: Mode>(tlv: &Tlv) -> Result<i32, ActionError> {
    Ok(Integer::decode_i32::<M>(tlv.content()?)?)
}

/// Decodes a `UInt32`.
fn uint32<M: Mode>(tlv: &Tlv) -> Result<u32, ActionError> {
    Ok(Integer::decode_u32::<M>(tlv.content()?)?)
}

/// Decodes an integer that must have one specific value.
fn fixed_int32<M: Mode>(
    tlv: &Tlv, field: &'static str, expected: i32
) -> Result<i32, ActionError> {
    let found = int32::<M>(tlv)?;
    if found != expected {
        return Err(ActionError::Unexpected {
            field, expected: expected.into(), found: found.into()
        })
    }
    Ok(found)
}

/// Decodes a `KerberosString`.
///
/// While the type is a GeneralString, RFC 4120 restricts it to IA5
/// characters. Since implementations use UTF-8 in practice, this is what
/// we accept.
fn kerberos_string(tlv: &Tlv) -> Result<String, ActionError> {
    Ok(str::from_utf8(tlv.content()?)?.into())
}


//============ Test Data =====================================================

/// Encoding of test messages.
#[cfg(test)]
pub(crate) mod testdata {
    /// Encodes a value with definite length.
    pub fn tlv(tag: u8, content: &[u8]) -> Vec<u8> {
        let mut res = vec![tag];
        let len = content.len();
        if len < 0x80 {
            res.push(len as u8);
        }
        else if len < 0x100 {
            res.extend_from_slice(&[0x81, len as u8]);
        }
        else {
            res.extend_from_slice(&[0x82, (len >> 8) as u8, len as u8]);
        }
        res.extend_from_slice(content);
        res
    }

    /// Encodes a constructed value from its parts.
    pub fn cons(tag: u8, parts: &[&[u8]]) -> Vec<u8> {
        tlv(tag, &parts.concat())
    }

    /// Encodes a small non-negative integer wrapped in an explicit tag.
    pub fn int(tag: u8, value: u8) -> Vec<u8> {
        if value < 0x80 {
            cons(tag, &[&tlv(0x02, &[value])])
        }
        else {
            cons(tag, &[&tlv(0x02, &[0, value])])
        }
    }

    /// A PrincipalName of type NT-SRV-INST for host/server.example.
    pub fn principal_name() -> Vec<u8> {
        cons(0x30, &[
            &int(0xA0, 2),
            &cons(0xA1, &[&cons(0x30, &[
                &tlv(0x1B, b"host"),
                &tlv(0x1B, b"server.example"),
            ])]),
        ])
    }

    /// An EncryptedData with optional key version.
    pub fn encrypted_data(
        etype: u8, kvno: Option<u8>, cipher: &[u8]
    ) -> Vec<u8> {
        let kvno = kvno.map(|kvno| int(0xA1, kvno)).unwrap_or_default();
        cons(0x30, &[
            &int(0xA0, etype),
            &kvno,
            &cons(0xA2, &[&tlv(0x04, cipher)]),
        ])
    }

    /// A ticket for host/server.example@EXAMPLE.COM.
    pub fn ticket() -> Vec<u8> {
        cons(0x61, &[&cons(0x30, &[
            &int(0xA0, 5),
            &cons(0xA1, &[&tlv(0x1B, b"EXAMPLE.COM")]),
            &cons(0xA2, &[&principal_name()]),
            &cons(0xA3, &[&encrypted_data(18, Some(2), &[0xAB; 40])]),
        ])])
    }

    /// An AP-REQ with the given pvno and mutual authentication required.
    pub fn ap_req_with_pvno(pvno: u8) -> Vec<u8> {
        cons(0x6E, &[&cons(0x30, &[
            &int(0xA0, pvno),
            &int(0xA1, 14),
            &cons(0xA2, &[&tlv(0x03, b"\x00\x20\x00\x00\x00")]),
            &cons(0xA3, &[&ticket()]),
            &cons(0xA4, &[&encrypted_data(18, None, &[0xCD; 24])]),
        ])])
    }

    /// A valid AP-REQ.
    pub fn ap_req() -> Vec<u8> {
        ap_req_with_pvno(5)
    }

    /// A valid AP-REP.
    pub fn ap_rep() -> Vec<u8> {
        cons(0x6F, &[&cons(0x30, &[
            &int(0xA0, 5),
            &int(0xA1, 15),
            &cons(0xA2, &[&encrypted_data(18, None, &[0xEF; 16])]),
        ])])
    }
}
