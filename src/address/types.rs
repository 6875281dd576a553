use crate::idn::{HostnameError, HostnameValidator, Idna, PunycodeEncoder};
use crate::validator::Canonicalizer;
use std::convert::TryFrom;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use thiserror::Error;

/// Email address
///
/// This type contains email in canonical form (_user@domain.tld_): the local part
/// is NFC-normalized and the domain is in its ASCII-compatible (punycode) form.
///
/// **NOTE**: Enable feature "serde" to be able serialize/deserialize it using [serde](https://serde.rs/).
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address {
    /// Complete canonical address
    serialized: String,
    /// Index of the last '@' in `serialized`
    at: usize,
}

impl Address {
    /// Create email address from parts
    ///
    /// The parts are validated and canonicalized like a whole address string.
    #[inline]
    pub fn new<U: AsRef<str>, D: AsRef<str>>(user: U, domain: D) -> Result<Self, AddressError> {
        Address::try_from((user, domain))
    }

    /// Canonicalize using custom hostname and punycode capabilities
    pub fn with_canonicalizer<H, P>(
        src: &str,
        canonicalizer: &Canonicalizer<H, P>,
    ) -> Result<Self, AddressError>
    where
        H: HostnameValidator,
        P: PunycodeEncoder,
    {
        let (local, domain) = canonicalizer.canonical_parts(src)?;
        let at = local.len();
        let mut serialized = local;
        serialized.push('@');
        serialized.push_str(&domain);
        Ok(Address { serialized, at })
    }

    /// NFC-normalized local part
    #[inline]
    pub fn local_part(&self) -> &str {
        &self.serialized[..self.at]
    }

    /// ASCII-compatible domain
    #[inline]
    pub fn domain(&self) -> &str {
        &self.serialized[self.at + 1..]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.serialized
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.serialized)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(val: &str) -> Result<Self, AddressError> {
        Address::with_canonicalizer(val, &Canonicalizer::<Idna, Idna>::default())
    }
}

impl<U, D> TryFrom<(U, D)> for Address
where
    U: AsRef<str>,
    D: AsRef<str>,
{
    type Error = AddressError;

    fn try_from((user, domain): (U, D)) -> Result<Self, Self::Error> {
        format!("{}@{}", user.as_ref(), domain.as_ref()).parse()
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.serialized
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> String {
        addr.serialized
    }
}

/// Malformed address
///
/// Every variant corresponds to one rule; [`AddressError::rfc`] gives the cited
/// section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Raw input was not valid UTF-8 text
    NotText,
    /// Whole address exceeds 255 bytes
    TooLong { len: usize },
    /// No '@' separator
    MissingAt,
    /// Normalized local part exceeds 64 bytes
    LocalTooLong { len: usize },
    EmptyLocal,
    /// Character outside the local part repertoire
    ForbiddenChar { ch: char },
    /// Local part starts or ends with '.'
    DotPlacement,
    /// '"' present but the local part is not one quoted-string
    BadQuoting,
    /// Specials or ".." in an unquoted local part
    UnquotedSpecials,
    /// Rejected by the hostname validator
    Domain(#[from] HostnameError),
}

impl AddressError {
    /// RFC section(s) the violated rule comes from
    pub fn rfc(&self) -> Option<&'static str> {
        use self::AddressError::*;
        Some(match self {
            NotText | TooLong { .. } => "RFC 5321 §4.5.3.1.2",
            MissingAt | EmptyLocal => "RFC 5322 §3.2",
            LocalTooLong { .. } => "RFC 5321 §4.5.3.1.1",
            ForbiddenChar { .. } => "RFC 6531 §3.2 / RFC 6532 §3.2 / RFC 5322 §3.2",
            DotPlacement => "RFC 5322 §3.2.3 and §3.4.1",
            BadQuoting => "RFC 5322 §3.2.4",
            UnquotedSpecials => "RFC 5322 §3.2.3",
            Domain(_) => return None,
        })
    }

    /// Offending character of a character-class violation
    pub fn codepoint(&self) -> Option<char> {
        match self {
            AddressError::ForbiddenChar { ch } => Some(*ch),
            _ => None,
        }
    }
}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        use self::AddressError::*;
        match self {
            NotText => f.write_str("email must be a string")?,
            TooLong { len } => write!(f, "invalid email larger than 255 bytes ({} bytes)", len)?,
            MissingAt => f.write_str("invalid email not having a '@'")?,
            LocalTooLong { len } => write!(
                f,
                "invalid email with local part larger than 64 bytes ({} bytes)",
                len
            )?,
            EmptyLocal => f.write_str("invalid email with empty local part")?,
            ForbiddenChar { ch } => write!(
                f,
                "char {:?} (U+{:04X}) not allowed in email local part",
                ch,
                u32::from(*ch)
            )?,
            DotPlacement => {
                f.write_str("invalid email with local part starting or ending with dot (.)")?
            }
            BadQuoting => f.write_str("invalid email with wrongfully enquoted local part")?,
            UnquotedSpecials => f.write_str(
                "special characters \"\\s()<>[]:;@\\,\" or \"..\" not allowed in unquoted local part",
            )?,
            Domain(err) => return write!(f, "invalid email domain: {}", err),
        }
        match self.rfc() {
            Some(rfc) => write!(f, ". ({})", rfc),
            None => Ok(()),
        }
    }
}
