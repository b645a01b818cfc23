//! Dotted-quad and `u32` conversions.

use std::net::Ipv4Addr;

use crate::error::LookupError;

/// Parse a dotted-quad IPv4 address into its big-endian `u32` value.
///
/// IPv6 literals (including IPv4-mapped ones) and anything else that is not a
/// plain dotted quad are rejected.
pub fn ip_to_u32(text: &str) -> Result<u32, LookupError> {
    text.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| LookupError::InvalidAddressFormat(text.to_string()))
}

/// Inverse of [`ip_to_u32`].
pub fn u32_to_ip(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_order() {
        assert_eq!(ip_to_u32("10.0.0.0").unwrap(), 167_772_160);
        assert_eq!(ip_to_u32("42.63.123.32").unwrap(), 0x2A3F_7B20);
        assert_eq!(ip_to_u32("0.0.0.0").unwrap(), 0);
        assert_eq!(ip_to_u32("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(u32_to_ip(708_803_360).to_string(), "42.63.123.32");
        assert_eq!(u32_to_ip(167_772_160), Ipv4Addr::new(10, 0, 0, 0));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in [
            "",
            "10.0.0",
            "10.0.0.256",
            "10.0.0.0.1",
            "10.0.0.0/24",
            " 10.0.0.1",
            "abc",
            "::1",
            "::ffff:10.0.0.1",
            "2001:db8::1",
        ] {
            assert_eq!(
                ip_to_u32(bad),
                Err(LookupError::InvalidAddressFormat(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
