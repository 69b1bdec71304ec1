//! Decoding the content of primitive values.
//!
//! The types in this module turn the content octets of a primitive value
//! into something more useful. They are stateless and are typically used by
//! grammar actions.

pub use self::bitstring::BitString;
pub use self::boolean::Boolean;
pub use self::int::Integer;

mod bitstring;
mod boolean;
mod int;
