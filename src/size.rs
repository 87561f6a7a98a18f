use crate::error::{Error, Result};

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

fn multiplier(suffix: char) -> Option<u64> {
    match suffix {
        'K' => Some(KIB),
        'M' => Some(MIB),
        'G' => Some(GIB),
        _ => None,
    }
}

/// Parse a byte count such as `300`, `1K`, `20M` or `5G`.
///
/// Suffixes are binary multiples and upper case only. Surrounding whitespace
/// is ignored.
pub fn parse_bytes(literal: &str) -> Result<u64> {
    let trimmed = literal.trim();

    let (digits, factor) = match trimmed.chars().last().and_then(multiplier) {
        Some(factor) => (&trimmed[..trimmed.len() - 1], factor),
        None => (trimmed, 1),
    };

    let value: u64 = digits.parse().map_err(|e: std::num::ParseIntError| Error::MalformedSize {
        literal: literal.to_string(),
        reason: e.to_string(),
    })?;

    value.checked_mul(factor).ok_or_else(|| Error::SizeOverflow {
        literal: literal.to_string(),
    })
}
