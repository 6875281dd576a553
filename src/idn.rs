//! Hostname capabilities the address validator depends on
//!
//! The local part grammar lives in this crate; the domain part is handed off to a
//! [`HostnameValidator`] and converted by a [`PunycodeEncoder`]. [`Idna`] implements
//! both on top of the [idna](https://docs.rs/idna) crate. Plain closures implement
//! them too, which is handy for substituting test doubles.

use idna::domain_to_ascii_strict;
use thiserror::Error;
use tracing::trace;

/// Characters splitting domain labels: full stop, ideographic full stop,
/// fullwidth full stop, halfwidth ideographic full stop
const LABEL_SEPARATORS: &[char] = &['.', '\u{3002}', '\u{FF0E}', '\u{FF61}'];

/// Invalid hostname, as reported by a hostname capability
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HostnameError(String);

impl HostnameError {
    #[inline]
    pub fn new<M: Into<String>>(msg: M) -> Self {
        HostnameError(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Decides whether a domain part is an acceptable (IDN) hostname
pub trait HostnameValidator {
    fn validate_hostname(&self, domain: &str) -> Result<(), HostnameError>;
}

/// Converts a domain into its ASCII-compatible encoding
///
/// Must return already-ASCII domains unchanged.
pub trait PunycodeEncoder {
    fn to_ascii(&self, domain: &str) -> Result<String, HostnameError>;
}

impl<F> HostnameValidator for F
where
    F: Fn(&str) -> Result<(), HostnameError>,
{
    fn validate_hostname(&self, domain: &str) -> Result<(), HostnameError> {
        self(domain)
    }
}

impl<F> PunycodeEncoder for F
where
    F: Fn(&str) -> Result<String, HostnameError>,
{
    fn to_ascii(&self, domain: &str) -> Result<String, HostnameError> {
        self(domain)
    }
}

/// UTS #46 / IDNA backed hostname capabilities
///
/// Validation applies the strict ToASCII profile: STD3 ASCII rules, hyphen
/// placement checks and DNS length limits (63 bytes per label, 253 in total).
/// Encoding gives every non-ASCII label its UTS #46 mapped ACE form (case folded,
/// normalized, full-width folded) and leaves ASCII labels as they are, so letter
/// case of ASCII domains survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Idna;

impl HostnameValidator for Idna {
    fn validate_hostname(&self, domain: &str) -> Result<(), HostnameError> {
        if domain.is_empty() {
            return Err(HostnameError::new("empty hostname"));
        }

        strict_ascii(domain).map(|ascii| trace!(%ascii, "hostname accepted"))
    }
}

impl PunycodeEncoder for Idna {
    fn to_ascii(&self, domain: &str) -> Result<String, HostnameError> {
        if domain.is_ascii() {
            return Ok(domain.to_owned());
        }

        // non-ASCII labels take the form the validator accepted them in
        let mapped = strict_ascii(domain)?;
        let labels: Vec<&str> = domain.split(LABEL_SEPARATORS).collect();
        let mapped_labels: Vec<&str> = mapped.split('.').collect();

        // mapping produced extra separators, labels no longer line up
        if labels.len() != mapped_labels.len() {
            return Ok(mapped);
        }

        Ok(labels
            .iter()
            .zip(mapped_labels)
            .map(|(label, ace)| if label.is_ascii() { *label } else { ace })
            .collect::<Vec<_>>()
            .join("."))
    }
}

fn strict_ascii(domain: &str) -> Result<String, HostnameError> {
    domain_to_ascii_strict(domain)
        .map_err(|err| HostnameError::new(format!("invalid hostname {:?}: {}", domain, err)))
}
