mod check;
#[cfg(feature = "serde")]
mod serde;
mod types;

pub use self::check::{is_allowed_char, is_quoted_string, MAX_ADDRESS_LEN, MAX_LOCAL_LEN};
pub(crate) use self::check::{check_length, check_local};
pub use self::types::*;
