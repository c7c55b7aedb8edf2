//! Compact signature transformation notation and its interpreter

use std::str::FromStr;

use tracing::debug;

use crate::error::SigripError;

/// A single signature transformation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `r` - reverse the signature
    Reverse,
    /// `s<N>` - drop the first N characters
    Slice(usize),
    /// `w<N>` - swap the first character with the character at position N
    Swap(usize),
}

/// A parsed transformation procedure: whitespace-separated ops such as
/// `"r s3 w44 r"`, applied left to right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Procedure(Vec<Op>);

impl FromStr for Procedure {
    type Err = SigripError;

    fn from_str(notation: &str) -> Result<Self, Self::Err> {
        let mut ops = Vec::new();
        for token in notation.split_whitespace() {
            let op = if token == "r" {
                Op::Reverse
            } else if let Some(operand) = token.strip_prefix('s') {
                Op::Slice(operand.parse()?)
            } else if let Some(operand) = token.strip_prefix('w') {
                Op::Swap(operand.parse()?)
            } else {
                return Err(SigripError::UnknownOpcode(token.to_string()));
            };
            ops.push(op);
        }
        Ok(Procedure(ops))
    }
}

impl Procedure {
    /// Number of steps in the procedure
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the procedure has no steps (identity transformation)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Run every step against `signature` and return the transformed string.
    ///
    /// Offsets are validated against the current length before each step, so
    /// a stale procedure fails with a range error instead of panicking.
    pub fn apply(&self, signature: &str) -> Result<String, SigripError> {
        debug!(
            "Applying {} transformation steps to signature of length {}",
            self.0.len(),
            signature.chars().count()
        );

        let mut chars: Vec<char> = signature.chars().collect();
        for op in &self.0 {
            match *op {
                Op::Reverse => chars.reverse(),
                Op::Slice(n) => {
                    if n > chars.len() {
                        return Err(SigripError::Range {
                            opcode: 's',
                            index: n,
                            len: chars.len(),
                        });
                    }
                    chars.drain(..n);
                }
                Op::Swap(n) => {
                    if n == 0 || n >= chars.len() {
                        return Err(SigripError::Range {
                            opcode: 'w',
                            index: n,
                            len: chars.len(),
                        });
                    }
                    chars.swap(0, n);
                }
            }
        }
        Ok(chars.into_iter().collect())
    }
}

/// Transform `signature` with the procedure in `algorithm` notation and
/// append it to `url` as a `signature` query parameter.
pub fn decode(url: &str, signature: &str, algorithm: &str) -> Result<String, SigripError> {
    let procedure: Procedure = algorithm.parse()?;
    let transformed = procedure.apply(signature)?;
    Ok(format!("{}&signature={}", url, transformed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_notation() {
        let procedure: Procedure = "r s3 w44".parse().unwrap();
        assert_eq!(
            procedure,
            Procedure(vec![Op::Reverse, Op::Slice(3), Op::Swap(44)])
        );
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let procedure: Procedure = "  r \t s1\n w2  ".parse().unwrap();
        assert_eq!(procedure.len(), 3);
    }

    #[test]
    fn test_parse_empty_notation_is_identity() {
        let procedure: Procedure = "".parse().unwrap();
        assert!(procedure.is_empty());
        assert_eq!(procedure.apply("abc").unwrap(), "abc");
    }

    #[test]
    fn test_parse_rejects_unknown_opcode() {
        let result = "r q5".parse::<Procedure>();
        assert!(matches!(result, Err(SigripError::UnknownOpcode(token)) if token == "q5"));

        // Opcodes outside ASCII are unknown, not a panic
        assert!(matches!(
            "é5".parse::<Procedure>(),
            Err(SigripError::UnknownOpcode(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_operand() {
        assert!(matches!(
            "sx".parse::<Procedure>(),
            Err(SigripError::Operand(_))
        ));
        assert!(matches!(
            "w".parse::<Procedure>(),
            Err(SigripError::Operand(_))
        ));
    }

    #[test]
    fn test_reverse() {
        let procedure: Procedure = "r".parse().unwrap();
        assert_eq!(procedure.apply("abcdef").unwrap(), "fedcba");
    }

    #[test]
    fn test_slice_drops_prefix() {
        let procedure: Procedure = "s2".parse().unwrap();
        assert_eq!(procedure.apply("abcdef").unwrap(), "cdef");
    }

    #[test]
    fn test_slice_zero_is_identity() {
        let procedure: Procedure = "s0".parse().unwrap();
        assert_eq!(procedure.apply("abc").unwrap(), "abc");
    }

    #[test]
    fn test_slice_of_whole_signature_is_empty() {
        let procedure: Procedure = "s3".parse().unwrap();
        assert_eq!(procedure.apply("abc").unwrap(), "");
    }

    #[test]
    fn test_slice_past_end_is_range_error() {
        let procedure: Procedure = "s3".parse().unwrap();
        let result = procedure.apply("ab");
        assert!(matches!(
            result,
            Err(SigripError::Range {
                opcode: 's',
                index: 3,
                len: 2
            })
        ));
    }

    #[test]
    fn test_swap_exchanges_first_and_nth() {
        let procedure: Procedure = "w2".parse().unwrap();
        assert_eq!(procedure.apply("ABCDE").unwrap(), "CBADE");
    }

    #[test]
    fn test_swap_offset_out_of_range() {
        let procedure: Procedure = "w5".parse().unwrap();
        assert!(matches!(
            procedure.apply("ABCDE"),
            Err(SigripError::Range {
                opcode: 'w',
                index: 5,
                len: 5
            })
        ));
    }

    #[test]
    fn test_swap_offset_zero_out_of_range() {
        let procedure: Procedure = "w0".parse().unwrap();
        assert!(matches!(
            procedure.apply("ABCDE"),
            Err(SigripError::Range { opcode: 'w', .. })
        ));
    }

    #[test]
    fn test_steps_apply_left_to_right() {
        let procedure: Procedure = "r s1 w2".parse().unwrap();
        // "abcdef" -> "fedcba" -> "edcba" -> "cdeba"
        assert_eq!(procedure.apply("abcdef").unwrap(), "cdeba");
    }

    #[test]
    fn test_apply_is_deterministic() {
        let procedure: Procedure = "w3 r s2".parse().unwrap();
        let first = procedure.apply("0123456789").unwrap();
        let second = procedure.apply("0123456789").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_apply_counts_chars_not_bytes() {
        let procedure: Procedure = "r".parse().unwrap();
        assert_eq!(procedure.apply("héllo").unwrap(), "olléh");
    }

    #[test]
    fn test_decode_appends_signature_parameter() {
        let result = decode("https://example.com/video?a=1", "ABCDE", "w2").unwrap();
        assert_eq!(result, "https://example.com/video?a=1&signature=CBADE");
    }

    #[test]
    fn test_decode_propagates_interpreter_errors() {
        let result = decode("https://example.com/v", "ab", "s9");
        assert!(matches!(result, Err(SigripError::Range { .. })));
    }
}
