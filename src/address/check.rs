use super::AddressError;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Maximum length of a whole address in UTF-8 bytes (RFC 5321 §4.5.3.1.2)
pub const MAX_ADDRESS_LEN: usize = 255;

/// Maximum length of a local part in UTF-8 bytes (RFC 5321 §4.5.3.1.1)
pub const MAX_LOCAL_LEN: usize = 64;

/// Check the byte length of the whole, un-normalized address
pub fn check_length(address: &str) -> Result<(), AddressError> {
    let len = address.len();
    if len > MAX_ADDRESS_LEN {
        Err(AddressError::TooLong { len })
    } else {
        Ok(())
    }
}

/// Run every local part rule in order, stopping at the first violation
///
/// The local part must already be NFC-normalized.
pub fn check_local(local: &str) -> Result<(), AddressError> {
    check_local_length(local)?;
    check_chars(local)?;
    check_dots(local)?;
    check_quoting(local)
}

pub fn check_local_length(local: &str) -> Result<(), AddressError> {
    let len = local.len();
    if len > MAX_LOCAL_LEN {
        return Err(AddressError::LocalTooLong { len });
    }
    if local.is_empty() {
        return Err(AddressError::EmptyLocal);
    }
    Ok(())
}

pub fn check_chars(local: &str) -> Result<(), AddressError> {
    match local.chars().find(|&ch| !is_allowed_char(ch)) {
        Some(ch) => Err(AddressError::ForbiddenChar { ch }),
        None => Ok(()),
    }
}

pub fn check_dots(local: &str) -> Result<(), AddressError> {
    if local.starts_with('.') || local.ends_with('.') {
        Err(AddressError::DotPlacement)
    } else {
        Ok(())
    }
}

/// A local part with any `"` must be one quoted-string as a whole,
/// otherwise it must be free of specials and of `..`.
pub fn check_quoting(local: &str) -> Result<(), AddressError> {
    if local.contains('"') {
        if is_quoted_string(local) {
            Ok(())
        } else {
            Err(AddressError::BadQuoting)
        }
    } else if local.chars().any(is_unquoted_special) || local.contains("..") {
        Err(AddressError::UnquotedSpecials)
    } else {
        Ok(())
    }
}

/// Characters accepted anywhere in a local part, quoted or not
pub fn is_allowed_char(ch: char) -> bool {
    match ch {
        '\t' | ' ' | '\\' | '!' | '"' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '/' | '='
        | '?' | '^' | '_' | '`' | '{' | '|' | '}' | '~' | '(' | ')' | ',' | ':' | ';' | '<'
        | '>' | '@' | '[' | ']' | '-' | '.' => true,
        // ZWNJ, ZWJ
        '\u{200C}' | '\u{200D}' => true,
        // middle dot, greek numeral sign, katakana middle dot, geresh, gershayim
        '\u{00B7}' | '\u{0375}' | '\u{30FB}' | '\u{05F3}' | '\u{05F4}' => true,
        _ => is_letter_mark_number(ch),
    }
}

fn is_letter_mark_number(ch: char) -> bool {
    use self::GeneralCategory::*;

    match get_general_category(ch) {
        UppercaseLetter | LowercaseLetter | TitlecaseLetter | ModifierLetter | OtherLetter => true,
        NonspacingMark | SpacingMark | EnclosingMark => true,
        DecimalNumber | LetterNumber | OtherNumber => true,
        _ => false,
    }
}

fn is_unquoted_special(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(
            ch,
            '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ','
        )
}

/// Whole-string quoted-string shape: `"` (`\` any | not `"` or `\`)+ `"`
pub fn is_quoted_string(s: &str) -> bool {
    let inner = match s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) if !inner.is_empty() => inner,
        _ => return false,
    };

    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                // an escape needs a character to quote
                if chars.next().is_none() {
                    return false;
                }
            }
            '"' => return false,
            _ => {}
        }
    }

    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn length_limits() {
        assert_eq!(check_length(&"a".repeat(255)), Ok(()));
        assert_eq!(
            check_length(&"a".repeat(256)),
            Err(AddressError::TooLong { len: 256 })
        );
        // bytes, not chars
        assert_eq!(
            check_length(&"ü".repeat(128)),
            Err(AddressError::TooLong { len: 256 })
        );
    }

    #[test]
    fn local_length_limits() {
        assert_eq!(check_local_length(&"a".repeat(64)), Ok(()));
        assert_eq!(
            check_local_length(&"a".repeat(65)),
            Err(AddressError::LocalTooLong { len: 65 })
        );
        assert_eq!(
            check_local_length(&"用".repeat(22)),
            Err(AddressError::LocalTooLong { len: 66 })
        );
        assert_eq!(check_local_length(""), Err(AddressError::EmptyLocal));
    }

    #[test]
    fn allowed_ascii() {
        for ch in "azAZ09!#$%&'*+/=?^_`{|}~-. \t\\\"(),:;<>@[]".chars() {
            assert!(is_allowed_char(ch), "{:?}", ch);
        }
    }

    #[test]
    fn allowed_unicode() {
        for ch in "üß用户ἀЖאب١\u{0301}\u{200C}\u{200D}\u{00B7}\u{0375}\u{30FB}\u{05F3}\u{05F4}Ⅻ½"
            .chars()
        {
            assert!(is_allowed_char(ch), "{:?}", ch);
        }
    }

    #[test]
    fn forbidden_chars() {
        for ch in "\u{0}\u{1}\n\r\u{7F}\u{200B}\u{2028}\u{E000}€©😀\u{A0}".chars() {
            assert!(!is_allowed_char(ch), "{:?}", ch);
        }
    }

    #[test]
    fn reports_first_forbidden_char() {
        assert_eq!(
            check_chars("ab\u{1}c\u{2}"),
            Err(AddressError::ForbiddenChar { ch: '\u{1}' })
        );
        assert_eq!(check_chars("用户.name"), Ok(()));
    }

    #[test]
    fn dot_placement() {
        assert_eq!(check_dots(".user"), Err(AddressError::DotPlacement));
        assert_eq!(check_dots("user."), Err(AddressError::DotPlacement));
        assert_eq!(check_dots("us.er"), Ok(()));
    }

    #[test]
    fn quoted_string_shape() {
        assert!(is_quoted_string("\"us er\""));
        assert!(is_quoted_string("\"a\\\"b\""));
        assert!(is_quoted_string("\"a\\\\\""));
        assert!(is_quoted_string("\"a@b\""));
        assert!(!is_quoted_string("\""));
        assert!(!is_quoted_string("\"\""));
        assert!(!is_quoted_string("\"a"));
        assert!(!is_quoted_string("a\""));
        assert!(!is_quoted_string("\"a\"b\""));
        assert!(!is_quoted_string("\"a\\\""));
        assert!(!is_quoted_string("\"a\"\"b\""));
    }

    #[test]
    fn quoting_branches() {
        assert_eq!(check_quoting("\"us er\""), Ok(()));
        assert_eq!(check_quoting("\"us..er\""), Ok(()));
        assert_eq!(check_quoting("us\"er"), Err(AddressError::BadQuoting));
        assert_eq!(check_quoting("us..er"), Err(AddressError::UnquotedSpecials));
        assert_eq!(check_quoting("us er"), Err(AddressError::UnquotedSpecials));
        assert_eq!(check_quoting("us\ter"), Err(AddressError::UnquotedSpecials));
        for special in "()<>[]:;@\\,".chars() {
            let local = format!("us{}er", special);
            assert_eq!(
                check_quoting(&local),
                Err(AddressError::UnquotedSpecials),
                "{}",
                local
            );
        }
        assert_eq!(check_quoting("us.er+tag"), Ok(()));
    }

    #[test]
    fn rules_run_in_order() {
        // forbidden char wins over bad dots
        assert_eq!(
            check_local(".\u{1}"),
            Err(AddressError::ForbiddenChar { ch: '\u{1}' })
        );
        // dots win over quoting
        assert_eq!(check_local(".\"a\""), Err(AddressError::DotPlacement));
        assert_eq!(check_local(""), Err(AddressError::EmptyLocal));
    }
}
