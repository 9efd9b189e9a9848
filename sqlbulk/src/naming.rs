//! Identifier to column/table name conversion

use crate::error::{Error, Result};

/// Convert a Rust type or field identifier to a snake_case SQL name.
///
/// Uppercase runs are treated as acronyms: `UUID` -> `uuid`,
/// `HTMLFile` -> `html_file`. A lone trailing `s` after a run is a plural
/// suffix, so `URLs` -> `urls`. Input that is already snake_case is
/// returned unchanged.
///
/// The identifier must start with an ASCII letter and may only contain
/// ASCII letters, digits and underscores.
pub fn to_snake_case(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len() + 4);
    let mut upper_run = 0usize;

    for (i, &c) in bytes.iter().enumerate() {
        match c {
            b'A'..=b'Z' => {
                if i > 0 && !out.ends_with('_') && (upper_run == 0 || next_is_lower(bytes, i)) {
                    out.push('_');
                }
                out.push(c.to_ascii_lowercase() as char);
                upper_run += 1;
            }
            b'a'..=b'z' => {
                out.push(c as char);
                upper_run = 0;
            }
            // Digits continue an uppercase run: `A1B` -> `a1b`
            b'0'..=b'9' if i > 0 => out.push(c as char),
            b'_' if i > 0 => {
                out.push('_');
                upper_run = 0;
            }
            b'0'..=b'9' | b'_' => {
                return Err(invalid(input, "must start with a letter"));
            }
            _ => return Err(invalid(input, "only ASCII letters, digits and `_` are allowed")),
        }
    }

    if out.is_empty() {
        return Err(invalid(input, "must not be empty"));
    }

    Ok(out)
}

// The byte after `i` is lowercase, unless it is the final plural `s`.
fn next_is_lower(bytes: &[u8], i: usize) -> bool {
    match bytes.get(i + 1) {
        Some(b's') if i + 2 == bytes.len() => false,
        Some(c) => c.is_ascii_lowercase(),
        None => false,
    }
}

fn invalid(input: &str, reason: &'static str) -> Error {
    Error::InvalidIdentifier {
        identifier: input.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(input: &str) -> String {
        to_snake_case(input).unwrap()
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(snake("Name"), "name");
        assert_eq!(snake("UserName"), "user_name");
        assert_eq!(snake("UUID"), "uuid");
        assert_eq!(snake("HTMLFile"), "html_file");
        assert_eq!(snake("URLs"), "urls");
        assert_eq!(snake("ID"), "id");
        assert_eq!(snake("UserID"), "user_id");
        assert_eq!(snake("Address2"), "address2");
        assert_eq!(snake("tbUser"), "tb_user");
    }

    #[test]
    fn test_snake_case_is_idempotent() {
        for input in ["name", "user_name", "html_file", "address2", "a_b_c", "x"] {
            assert_eq!(snake(input), input);
            assert_eq!(snake(&snake(input)), snake(input));
        }
    }

    #[test]
    fn test_snake_case_output_alphabet() {
        for input in ["UserName", "HTMLFile", "URLs", "OrderItem2Detail", "createdAt"] {
            let out = snake(input);
            assert!(out
                .bytes()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'_'));
        }
    }

    #[test]
    fn test_underscore_not_doubled() {
        assert_eq!(snake("User_Name"), "user_name");
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(matches!(
            to_snake_case("2fast"),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            to_snake_case("_hidden"),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            to_snake_case("user-name"),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            to_snake_case("naïve"),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(to_snake_case("").is_err());
    }
}
