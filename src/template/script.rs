// Copyright 2025 Cowboy AI, LLC.

//! Script text helpers shared by catalog templates

use crate::compose::trim_and_replace_indentation;
use crate::errors::{WorkloadError, WorkloadResult};

/// Loop running `body` `n` times, with the loop counter bound to `i`
///
/// The body is re-indented one level inside the loop.
pub fn loop_template(n: u64, body: &str) -> String {
    let body = trim_and_replace_indentation(body, 4, 4);
    format!("var i = 0\nwhile i < {n} {{\n    i = i + 1\n{body}}}\n")
}

/// Literal size of `count` pieces of `unit` characters, if it can be allocated
pub(crate) fn checked_size(count: u64, unit: u64) -> WorkloadResult<usize> {
    let length = count
        .checked_mul(unit)
        .ok_or(WorkloadError::LiteralTooLarge { length: u64::MAX })?;
    usize::try_from(length)
        .ok()
        .filter(|size| *size <= isize::MAX as usize)
        .ok_or(WorkloadError::LiteralTooLarge { length })
}

/// `piece` repeated `count` times
pub fn repeated(piece: &str, count: u64) -> WorkloadResult<String> {
    checked_size(count, piece.len() as u64)?;
    let count =
        usize::try_from(count).map_err(|_| WorkloadError::LiteralTooLarge { length: count })?;
    Ok(piece.repeat(count))
}

/// String literal content of `length` repeated `x`
pub fn string_of_len(length: u64) -> WorkloadResult<String> {
    repeated("x", length)
}

/// Array literal of `array_len` strings of `string_len` characters each
pub fn string_array_of_len(array_len: u64, string_len: u64) -> WorkloadResult<String> {
    checked_size(array_len, string_len.saturating_add(3))?;
    let element = format!("\"{}\"", string_of_len(string_len)?);
    let elements: Vec<&str> = (0..array_len).map(|_| element.as_str()).collect();
    Ok(format!("[{}]", elements.join(",")))
}

/// Dictionary literal of `dict_len` distinct keys; keys and values are
/// `string_len` characters long, keys carry their index as suffix
pub fn string_dict_of_len(dict_len: u64, string_len: u64) -> WorkloadResult<String> {
    // two fillers, quotes, separators and at most 20 index digits per entry
    checked_size(dict_len, string_len.saturating_mul(2).saturating_add(26))?;
    let filler = string_of_len(string_len)?;
    let entries: Vec<String> = (0..dict_len)
        .map(|i| format!("\"{filler}{i}\":\"{filler}\""))
        .collect();
    Ok(format!("{{{}}}", entries.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_template() {
        let script = loop_template(3, "\n\t\t\t\tassert(true)\n\t\t\t");
        assert_eq!(
            script,
            "var i = 0\nwhile i < 3 {\n    i = i + 1\n    assert(true)\n}\n"
        );
    }

    #[test]
    fn test_empty_loop_body() {
        assert_eq!(
            loop_template(5397, ""),
            "var i = 0\nwhile i < 5397 {\n    i = i + 1\n}\n"
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(string_of_len(3).unwrap(), "xxx");
        assert_eq!(string_array_of_len(2, 2).unwrap(), r#"["xx","xx"]"#);
        assert_eq!(string_array_of_len(0, 2).unwrap(), "[]");
        assert_eq!(string_dict_of_len(2, 1).unwrap(), r#"{"x0":"x","x1":"x"}"#);
        assert_eq!(repeated("AB", 3).unwrap(), "ABABAB");
    }

    #[test]
    fn test_oversized_literals_are_rejected() {
        assert!(matches!(
            string_of_len(u64::MAX),
            Err(WorkloadError::LiteralTooLarge { length: u64::MAX })
        ));
        assert!(matches!(
            repeated("AB", u64::MAX / 2 + 1),
            Err(WorkloadError::LiteralTooLarge { .. })
        ));
        assert!(string_array_of_len(u64::MAX, 1).is_err());
        assert!(string_dict_of_len(1 << 62, 1 << 62).is_err());
    }
}
