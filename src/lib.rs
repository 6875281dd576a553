//! Internationalized email address validation
//!
//! Addresses are checked against the local part grammar of RFC 5321, RFC 5322,
//! RFC 6531 and RFC 6532, while the domain part is validated as an IDN hostname.
//! Accepted addresses can be turned into their ASCII-compatible form: the local
//! part stays Unicode (NFC), the domain is punycoded.
//!
//! ```
//! use idn_email::{canonical_email, validate_email, AddressError};
//!
//! assert_eq!(validate_email("\"us er\"@example.com"), Ok(()));
//! assert_eq!(validate_email("us\"er@example.com"), Err(AddressError::BadQuoting));
//! assert_eq!(canonical_email("用户@münchen.de").unwrap(), "用户@xn--mnchen-3ya.de");
//! ```

mod address;
mod idn;
mod validator;

pub use address::*;
pub use idn::*;
pub use validator::*;
