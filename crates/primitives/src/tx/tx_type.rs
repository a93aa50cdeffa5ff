//! Contains the transaction type identifier for Klaytn value transfers.

use alloy_rlp::{BufMut, Decodable, Encodable};
use derive_more::Display;

use crate::error::KlayTxError;

/// Identifier for a [`KlayTxType::ValueTransfer`] transaction.
pub const VALUE_TRANSFER_TX_TYPE_ID: u8 = 0x08;
/// Identifier for a [`KlayTxType::FeeDelegatedValueTransfer`] transaction.
pub const FEE_DELEGATED_VALUE_TRANSFER_TX_TYPE_ID: u8 = 0x09;
/// Identifier for a [`KlayTxType::FeeDelegatedValueTransferWithRatio`] transaction.
pub const FEE_DELEGATED_VALUE_TRANSFER_WITH_RATIO_TX_TYPE_ID: u8 = 0x0a;
/// Identifier for a [`KlayTxType::ValueTransferMemo`] transaction.
pub const VALUE_TRANSFER_MEMO_TX_TYPE_ID: u8 = 0x10;
/// Identifier for a [`KlayTxType::FeeDelegatedValueTransferMemo`] transaction.
pub const FEE_DELEGATED_VALUE_TRANSFER_MEMO_TX_TYPE_ID: u8 = 0x11;
/// Identifier for a [`KlayTxType::FeeDelegatedValueTransferMemoWithRatio`] transaction.
pub const FEE_DELEGATED_VALUE_TRANSFER_MEMO_WITH_RATIO_TX_TYPE_ID: u8 = 0x12;

/// Number of fields every value transfer starts with: nonce, gas price, gas limit, to, value, from.
const BASE_FIELD_COUNT: usize = 6;

/// Klaytn `TxType` flags for the value-transfer family.
///
/// The discriminants are wire values. The tag space is sparse and open ended, so nothing here
/// relies on ordering or contiguity of the values.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Ord, Hash, Display)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum KlayTxType {
    /// Plain value transfer.
    #[display("value_transfer")]
    ValueTransfer = VALUE_TRANSFER_TX_TYPE_ID,
    /// Value transfer whose fee is paid by a fee payer.
    #[display("fee_delegated_value_transfer")]
    FeeDelegatedValueTransfer = FEE_DELEGATED_VALUE_TRANSFER_TX_TYPE_ID,
    /// Value transfer whose fee is split between sender and fee payer.
    #[display("fee_delegated_value_transfer_with_ratio")]
    FeeDelegatedValueTransferWithRatio = FEE_DELEGATED_VALUE_TRANSFER_WITH_RATIO_TX_TYPE_ID,
    /// Value transfer carrying a memo.
    #[display("value_transfer_memo")]
    ValueTransferMemo = VALUE_TRANSFER_MEMO_TX_TYPE_ID,
    /// Fee-delegated value transfer carrying a memo.
    #[display("fee_delegated_value_transfer_memo")]
    FeeDelegatedValueTransferMemo = FEE_DELEGATED_VALUE_TRANSFER_MEMO_TX_TYPE_ID,
    /// Fee-delegated value transfer carrying a memo, fee split by ratio.
    #[display("fee_delegated_value_transfer_memo_with_ratio")]
    FeeDelegatedValueTransferMemoWithRatio = FEE_DELEGATED_VALUE_TRANSFER_MEMO_WITH_RATIO_TX_TYPE_ID,
}

impl KlayTxType {
    /// List of all variants.
    pub const ALL: [Self; 6] = [
        Self::ValueTransfer,
        Self::FeeDelegatedValueTransfer,
        Self::FeeDelegatedValueTransferWithRatio,
        Self::ValueTransferMemo,
        Self::FeeDelegatedValueTransferMemo,
        Self::FeeDelegatedValueTransferMemoWithRatio,
    ];

    /// Returns `true` if a separate fee payer can sign this type.
    pub const fn is_fee_delegated(&self) -> bool {
        match self {
            Self::ValueTransfer | Self::ValueTransferMemo => false,
            Self::FeeDelegatedValueTransfer |
            Self::FeeDelegatedValueTransferWithRatio |
            Self::FeeDelegatedValueTransferMemo |
            Self::FeeDelegatedValueTransferMemoWithRatio => true,
        }
    }

    /// Returns `true` if this type carries a fee ratio field.
    pub const fn has_fee_ratio(&self) -> bool {
        matches!(
            self,
            Self::FeeDelegatedValueTransferWithRatio | Self::FeeDelegatedValueTransferMemoWithRatio
        )
    }

    /// Returns `true` if this type carries a memo payload.
    pub const fn has_memo(&self) -> bool {
        matches!(
            self,
            Self::ValueTransferMemo |
                Self::FeeDelegatedValueTransferMemo |
                Self::FeeDelegatedValueTransferMemoWithRatio
        )
    }

    /// Number of fields before any signature data.
    pub const fn field_count(&self) -> usize {
        BASE_FIELD_COUNT + self.has_memo() as usize + self.has_fee_ratio() as usize
    }
}

impl From<KlayTxType> for u8 {
    fn from(v: KlayTxType) -> Self {
        v as Self
    }
}

impl TryFrom<u8> for KlayTxType {
    type Error = KlayTxError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            VALUE_TRANSFER_TX_TYPE_ID => Self::ValueTransfer,
            FEE_DELEGATED_VALUE_TRANSFER_TX_TYPE_ID => Self::FeeDelegatedValueTransfer,
            FEE_DELEGATED_VALUE_TRANSFER_WITH_RATIO_TX_TYPE_ID => {
                Self::FeeDelegatedValueTransferWithRatio
            }
            VALUE_TRANSFER_MEMO_TX_TYPE_ID => Self::ValueTransferMemo,
            FEE_DELEGATED_VALUE_TRANSFER_MEMO_TX_TYPE_ID => Self::FeeDelegatedValueTransferMemo,
            FEE_DELEGATED_VALUE_TRANSFER_MEMO_WITH_RATIO_TX_TYPE_ID => {
                Self::FeeDelegatedValueTransferMemoWithRatio
            }
            _ => return Err(KlayTxError::UnknownTypeTag(value)),
        })
    }
}

impl PartialEq<u8> for KlayTxType {
    fn eq(&self, other: &u8) -> bool {
        (*self as u8) == *other
    }
}

impl PartialEq<KlayTxType> for u8 {
    fn eq(&self, other: &KlayTxType) -> bool {
        *self == *other as Self
    }
}

impl Encodable for KlayTxType {
    fn encode(&self, out: &mut dyn BufMut) {
        (*self as u8).encode(out);
    }

    fn length(&self) -> usize {
        1
    }
}

impl Decodable for KlayTxType {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let ty = u8::decode(buf)?;

        Self::try_from(ty).map_err(|_| alloy_rlp::Error::Custom("invalid transaction type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tx_types() {
        assert_eq!(KlayTxType::ALL.len(), 6);
        for tx_type in KlayTxType::ALL {
            assert_eq!(KlayTxType::try_from(u8::from(tx_type)).unwrap(), tx_type);
        }
    }

    #[test]
    fn wire_values() {
        assert_eq!(KlayTxType::ValueTransfer, 0x08);
        assert_eq!(KlayTxType::FeeDelegatedValueTransfer, 0x09);
        assert_eq!(KlayTxType::FeeDelegatedValueTransferWithRatio, 0x0a);
        assert_eq!(KlayTxType::ValueTransferMemo, 0x10);
        assert_eq!(KlayTxType::FeeDelegatedValueTransferMemo, 0x11);
        assert_eq!(KlayTxType::FeeDelegatedValueTransferMemoWithRatio, 0x12);
    }

    #[test]
    fn unknown_tag() {
        for tag in [0x00, 0x07, 0x0b, 0x0f, 0x13, 0x7e, 0xff] {
            assert_eq!(KlayTxType::try_from(tag), Err(KlayTxError::UnknownTypeTag(tag)));
        }
    }

    #[test]
    fn field_counts() {
        assert_eq!(KlayTxType::ValueTransfer.field_count(), 6);
        assert_eq!(KlayTxType::FeeDelegatedValueTransfer.field_count(), 6);
        assert_eq!(KlayTxType::FeeDelegatedValueTransferWithRatio.field_count(), 7);
        assert_eq!(KlayTxType::ValueTransferMemo.field_count(), 7);
        assert_eq!(KlayTxType::FeeDelegatedValueTransferMemo.field_count(), 7);
        assert_eq!(KlayTxType::FeeDelegatedValueTransferMemoWithRatio.field_count(), 8);
    }

    #[test]
    fn capabilities() {
        assert!(!KlayTxType::ValueTransfer.is_fee_delegated());
        assert!(!KlayTxType::ValueTransferMemo.is_fee_delegated());
        assert!(KlayTxType::FeeDelegatedValueTransferMemoWithRatio.is_fee_delegated());
        assert!(KlayTxType::FeeDelegatedValueTransferMemoWithRatio.has_fee_ratio());
        assert!(!KlayTxType::FeeDelegatedValueTransferMemo.has_fee_ratio());
    }

    #[test]
    fn tx_type_roundtrip() {
        for &tx_type in &KlayTxType::ALL {
            let mut buf = Vec::new();
            tx_type.encode(&mut buf);
            let decoded = KlayTxType::decode(&mut &buf[..]).unwrap();
            assert_eq!(tx_type, decoded);
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(
            KlayTxType::FeeDelegatedValueTransferMemoWithRatio.to_string(),
            "fee_delegated_value_transfer_memo_with_ratio"
        );
    }
}
