//! The encoding rules a decoder enforces.
//!
//! The decoder is generic over the rules via the [`Mode`] trait. The two
//! supported rule sets are represented by the zero-sized types [`Ber`] and
//! [`Der`].


/// Basic Encoding Rules.
///
/// These are the most flexible rules, allowing alternative encodings for
/// some types as well as indefinite length values.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ber;

/// Distinguished Encoding Rules.
///
/// These rules always employ definite length values and require the
/// shortest possible encoding. Additional rules apply to some types, most
/// notably BOOLEAN values have to be either 0x00 or 0xFF.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Der;

/// One of the modes.
pub trait Mode: Copy + Default + Send + Sync + 'static {
    /// A human readable name of the rules.
    const NAME: &'static str;

    /// Is this mode DER?
    ///
    /// If so, lengths, tags, and some values must use their shortest
    /// possible encoding.
    const IS_RESTRICTED: bool;

    /// Does this mode allow indefinite length constructed values?
    const ALLOW_INDEFINITE: bool;
}

impl Mode for Ber {
    const NAME: &'static str = "BER";
    const IS_RESTRICTED: bool = false;
    const ALLOW_INDEFINITE: bool = true;
}

impl Mode for Der {
    const NAME: &'static str = "DER";
    const IS_RESTRICTED: bool = true;
    const ALLOW_INDEFINITE: bool = false;
}
