//! External `0x`-prefixed hex form of addresses.

use alloy_primitives::{hex, Address};

use crate::{
    error::{KlayTxError, KlayTxResult},
    rlp::ADDRESS_LEN,
};

/// Parses a 20-byte address from hex. The `0x` prefix is optional and case is ignored.
pub fn parse_address(s: &str) -> KlayTxResult<Address> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let bytes = hex::decode(digits)?;
    if bytes.len() != ADDRESS_LEN {
        return Err(KlayTxError::invalid(
            "address",
            format!("expected 20 bytes, got {}", bytes.len()),
        ));
    }
    Ok(Address::from_slice(&bytes))
}

/// Lowercase `0x` + 40 hex characters.
///
/// [`Address`]'s `Display` impl emits the EIP-55 checksum form, which is not the external form used
/// on this chain.
pub fn to_hex(address: &Address) -> String {
    hex::encode_prefixed(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn parse_is_case_insensitive() {
        let lower = parse_address("0x7d0fb3b6f4c5e6e37e0a7de0c1c9fa4f2e9c7a12").unwrap();
        let upper = parse_address("0X7D0FB3B6F4C5E6E37E0A7DE0C1C9FA4F2E9C7A12").unwrap();
        let bare = parse_address("7D0fB3b6f4c5E6e37E0a7de0c1c9fa4f2e9c7a12").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, bare);
    }

    #[test]
    fn output_is_lowercase() {
        let addr = address!("0x7D0FB3B6F4C5E6E37E0A7DE0C1C9FA4F2E9C7A12");
        let s = to_hex(&addr);
        assert_eq!(s, "0x7d0fb3b6f4c5e6e37e0a7de0c1c9fa4f2e9c7a12");
        assert_eq!(s.len(), 42);
        assert_eq!(parse_address(&s).unwrap(), addr);
    }

    #[test]
    fn round_trip_many() {
        for seed in 0u8..=255 {
            let addr = Address::repeat_byte(seed);
            assert_eq!(parse_address(&to_hex(&addr)).unwrap(), addr);
        }
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(matches!(
            parse_address("0x1234"),
            Err(KlayTxError::InvalidFieldValue { field: "address", .. })
        ));
        assert!(parse_address(&format!("0x{}", "ab".repeat(21))).is_err());
    }

    #[test]
    fn non_hex_is_rejected() {
        assert!(matches!(
            parse_address("0xzz0fb3b6f4c5e6e37e0a7de0c1c9fa4f2e9c7a12"),
            Err(KlayTxError::InvalidHex(_))
        ));
    }
}
