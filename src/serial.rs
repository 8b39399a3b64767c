//! Canonical serial-number strings.
//!
//! Both sides of a revocation lookup go through [`canonical_serial`]: the keys
//! published by the feed and the serial extracted from a leaf certificate. The
//! canonical form is lowercase hexadecimal without a `0x` prefix and without
//! leading zeros.

/// Normalise a hexadecimal serial number.
pub fn canonical_serial(serial: &str) -> String {
    let trimmed = serial.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() && !digits.is_empty() {
        return "0".to_string();
    }
    significant.to_ascii_lowercase()
}

/// Canonical form of a big-endian integer.
pub fn serial_from_be_bytes(bytes: &[u8]) -> String {
    canonical_serial(&hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_prefix_and_lowercases() {
        assert_eq!(canonical_serial("0xA1B2C3"), "a1b2c3");
        assert_eq!(canonical_serial("0XFFEEDD"), "ffeedd");
        assert_eq!(canonical_serial("  DeadBeef\n"), "deadbeef");
    }

    #[test]
    fn strips_leading_zeros() {
        assert_eq!(canonical_serial("00a1"), "a1");
        assert_eq!(canonical_serial("0x000"), "0");
        assert_eq!(canonical_serial("0"), "0");
    }

    #[test]
    fn is_idempotent() {
        for raw in ["0x00AbC", "abc", "0", "0X1", "ffeedd"] {
            let once = canonical_serial(raw);
            assert_eq!(canonical_serial(&once), once);
        }
    }

    #[test]
    fn big_endian_bytes() {
        // DER keeps a leading zero byte when the high bit is set
        assert_eq!(serial_from_be_bytes(&[0x00, 0xff, 0xee, 0xdd]), "ffeedd");
        assert_eq!(serial_from_be_bytes(&[0x0a, 0x1b]), "a1b");
        assert_eq!(serial_from_be_bytes(&[0x00]), "0");
    }
}
