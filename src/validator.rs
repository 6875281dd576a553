use crate::address::{check_length, check_local, AddressError};
use crate::idn::{HostnameValidator, Idna, PunycodeEncoder};
use std::borrow::Cow;
use std::str::from_utf8;
use tracing::{debug, trace};
use unicode_normalization::{is_nfc, UnicodeNormalization};

/// Validated address split at its last '@'
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parts<'a> {
    local: Cow<'a, str>,
    domain: &'a str,
}

impl<'a> Parts<'a> {
    /// NFC-normalized local part
    #[inline]
    pub fn local_part(&self) -> &str {
        &self.local
    }

    /// Domain part as it appeared in the input
    #[inline]
    pub fn domain(&self) -> &'a str {
        self.domain
    }
}

/// Email address validator
///
/// Checks the local part grammar itself and delegates the domain part to the
/// hostname capability `H`.
#[derive(Debug, Clone, Default)]
pub struct Validator<H = Idna> {
    hostname: H,
}

impl<H: HostnameValidator> Validator<H> {
    #[inline]
    pub fn new(hostname: H) -> Self {
        Validator { hostname }
    }

    /// Validate an address, returning its parts on success
    ///
    /// Rules are applied in order and the first violated one is reported.
    pub fn validate<'a>(&self, address: &'a str) -> Result<Parts<'a>, AddressError> {
        self.check(address).map_err(|err| {
            debug!(error = %err, "email address rejected");
            err
        })
    }

    /// Validate raw bytes, which must be UTF-8 text
    pub fn validate_bytes<'a>(&self, address: &'a [u8]) -> Result<Parts<'a>, AddressError> {
        match from_utf8(address) {
            Ok(address) => self.validate(address),
            Err(_) => {
                debug!(error = %AddressError::NotText, "email address rejected");
                Err(AddressError::NotText)
            }
        }
    }

    fn check<'a>(&self, address: &'a str) -> Result<Parts<'a>, AddressError> {
        check_length(address)?;

        let at = address.rfind('@').ok_or(AddressError::MissingAt)?;
        let (local, domain) = (&address[..at], &address[at + 1..]);

        let local = normalize(local);
        check_local(&local)?;

        trace!(domain, "delegating domain part");
        self.hostname.validate_hostname(domain)?;

        Ok(Parts { local, domain })
    }
}

fn normalize(s: &str) -> Cow<'_, str> {
    if is_nfc(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.nfc().collect())
    }
}

/// Produces the ASCII-compatible form of valid addresses
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer<H = Idna, P = Idna> {
    validator: Validator<H>,
    encoder: P,
}

impl<H: HostnameValidator, P: PunycodeEncoder> Canonicalizer<H, P> {
    #[inline]
    pub fn new(validator: Validator<H>, encoder: P) -> Self {
        Canonicalizer { validator, encoder }
    }

    #[inline]
    pub fn validator(&self) -> &Validator<H> {
        &self.validator
    }

    /// Validate and convert to `local@ace-domain`
    ///
    /// The local part comes out NFC-normalized, the domain punycoded.
    pub fn canonicalize(&self, address: &str) -> Result<String, AddressError> {
        let (mut local, domain) = self.canonical_parts(address)?;
        local.push('@');
        local.push_str(&domain);
        Ok(local)
    }

    pub(crate) fn canonical_parts(&self, address: &str) -> Result<(String, String), AddressError> {
        let parts = self.validator.validate(address)?;

        let mut local: String = address.nfc().collect();
        let at = local.rfind('@').ok_or(AddressError::MissingAt)?;
        local.truncate(at);

        let domain = self.encoder.to_ascii(parts.domain())?;
        trace!(%domain, "domain converted to ASCII");

        Ok((local, domain))
    }
}

/// Validate an address using the default IDNA hostname validator
///
/// ```
/// use idn_email::{validate_email, AddressError};
///
/// assert_eq!(validate_email("用户@example.com"), Ok(()));
/// assert_eq!(validate_email("us..er@example.com"), Err(AddressError::UnquotedSpecials));
/// ```
pub fn validate_email(address: &str) -> Result<(), AddressError> {
    Validator::<Idna>::default().validate(address).map(|_| ())
}

/// Like [`validate_email`] for raw bytes, rejecting anything that is not UTF-8
pub fn validate_email_bytes(address: &[u8]) -> Result<(), AddressError> {
    Validator::<Idna>::default()
        .validate_bytes(address)
        .map(|_| ())
}

/// Whether [`validate_email`] accepts the address
#[inline]
pub fn is_valid_email(address: &str) -> bool {
    validate_email(address).is_ok()
}

/// Canonical ASCII-compatible form of an address
///
/// ```
/// use idn_email::canonical_email;
///
/// assert_eq!(canonical_email("user@münchen.de").unwrap(), "user@xn--mnchen-3ya.de");
/// ```
pub fn canonical_email(address: &str) -> Result<String, AddressError> {
    Canonicalizer::<Idna, Idna>::default().canonicalize(address)
}
