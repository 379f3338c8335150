//! Header parsing.
//!
//! The header is a Python dict literal, e.g.
//! `{'descr': '<f8', 'fortran_order': False, 'shape': (2, 3), }`,
//! padded with spaces and terminated by a newline. It is rewritten into JSON
//! and handed to serde.

use crate::{NpyError, NpyResult};
use serde::Deserialize;

/// Fields extracted from the header dict.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NpyHeader {
    pub descr: String,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Number of elements described by `shape`; an empty shape is a scalar.
    pub fn element_count(&self) -> NpyResult<usize> {
        self.shape.iter().try_fold(1usize, |acc, &dim| {
            acc.checked_mul(dim).ok_or_else(|| {
                NpyError::Format(format!("shape {:?} overflows element count", self.shape))
            })
        })
    }
}

/// Parse the raw header bytes. Reading stops at the first NUL byte.
pub fn parse_header(raw: &[u8]) -> NpyResult<NpyHeader> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let text = std::str::from_utf8(&raw[..end])
        .map_err(|_| NpyError::Format("header is not ASCII text".to_string()))?;

    let json = to_json(text);
    serde_json::from_str(&json)
        .map_err(|e| NpyError::Format(format!("unparseable header '{}': {}", text.trim(), e)))
}

/// Rewrite a Python dict literal into JSON: quotes, booleans, tuples and
/// trailing commas.
fn to_json(text: &str) -> String {
    let text = text.replace("True", "true").replace("False", "false");
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '\'' => out.push('"'),
            '(' => out.push('['),
            ')' | '}' => {
                // drop a dangling comma: `(3,)` and `..., }`
                let trimmed = out.trim_end().len();
                out.truncate(trimmed);
                if out.ends_with(',') {
                    out.pop();
                }
                out.push(if ch == ')' { ']' } else { '}' });
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json() {
        assert_eq!(
            to_json("{'descr': '<f8', 'fortran_order': False, 'shape': (1, 2), }"),
            r#"{"descr": "<f8", "fortran_order": false, "shape": [1, 2]}"#
        );
        assert_eq!(to_json("{'shape': (3,), }"), r#"{"shape": [3]}"#);
        assert_eq!(to_json("{'shape': (), }"), r#"{"shape": []}"#);
    }

    #[test]
    fn test_parse_padded_header() {
        let raw = b"{'descr': '<i2', 'fortran_order': True, 'shape': (4, 5, 6), }          \n";
        let header = parse_header(raw).unwrap();
        assert_eq!(header.descr, "<i2");
        assert!(header.fortran_order);
        assert_eq!(header.shape, vec![4, 5, 6]);
        assert_eq!(header.element_count().unwrap(), 120);
    }

    #[test]
    fn test_parse_stops_at_nul() {
        let raw = b"{'descr': '|u1', 'fortran_order': False, 'shape': (), }\0garbage";
        let header = parse_header(raw).unwrap();
        assert!(header.shape.is_empty());
        assert_eq!(header.element_count().unwrap(), 1);
    }

    #[test]
    fn test_missing_key_is_format_error() {
        let raw = b"{'descr': '<f8', 'shape': (2,), }";
        assert!(matches!(parse_header(raw), Err(NpyError::Format(_))));
    }

    #[test]
    fn test_negative_dimension_rejected() {
        let raw = b"{'descr': '<f8', 'fortran_order': False, 'shape': (-1,), }";
        assert!(matches!(parse_header(raw), Err(NpyError::Format(_))));
    }
}
