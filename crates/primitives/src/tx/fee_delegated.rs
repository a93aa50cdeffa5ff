//! Value transfers whose fee is paid, fully or in part, by a separate fee payer.
//!
//! The fee payer's address and signatures are not part of these structs: they are appended after
//! the sender's signatures and live on [`KlayTxEnvelope`](super::envelope::KlayTxEnvelope). The
//! ratio variants carry the fee ratio as their last field.

use alloy_primitives::{Address, Bytes, U256};

use super::{FieldReader, KlayTransaction, KlayTxType, Transfer, TxCore};
use crate::{
    error::{KlayTxError, KlayTxResult},
    rlp::RlpItem,
};

/// Percentage of the fee charged to the fee payer, within `1..=99`.
///
/// The sender pays the remainder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct FeeRatio(u8);

impl FeeRatio {
    /// Smallest accepted ratio.
    pub const MIN: u8 = 1;
    /// Largest accepted ratio.
    pub const MAX: u8 = 99;

    /// Validates `ratio` against `1..=99`.
    pub fn new(ratio: u8) -> KlayTxResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&ratio) {
            return Err(KlayTxError::invalid(
                "fee_ratio",
                format!("{ratio} is outside {}..={}", Self::MIN, Self::MAX),
            ));
        }
        Ok(Self(ratio))
    }

    /// The percentage.
    pub const fn get(self) -> u8 {
        self.0
    }

    fn to_rlp(self) -> RlpItem {
        RlpItem::quantity(U256::from(self.0))
    }

    fn read(fields: &mut FieldReader<'_>) -> KlayTxResult<Self> {
        fields.quantity()?.try_into()
    }
}

impl TryFrom<u8> for FeeRatio {
    type Error = KlayTxError;

    fn try_from(ratio: u8) -> Result<Self, Self::Error> {
        Self::new(ratio)
    }
}

impl TryFrom<U256> for FeeRatio {
    type Error = KlayTxError;

    fn try_from(ratio: U256) -> Result<Self, Self::Error> {
        let ratio = u8::try_from(ratio).map_err(|_| {
            KlayTxError::invalid("fee_ratio", format!("{ratio} is outside 1..=99"))
        })?;
        Self::new(ratio)
    }
}

impl From<FeeRatio> for u8 {
    fn from(ratio: FeeRatio) -> Self {
        ratio.0
    }
}

/// Value transfer whose whole fee is paid by the fee payer.
///
/// Fields: `nonce, gas_price, gas_limit, to, value, from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TxFeeDelegatedValueTransfer {
    /// Shared fields.
    #[serde(flatten)]
    pub core: TxCore,
    /// Recipient and amount.
    #[serde(flatten)]
    pub transfer: Transfer,
}

impl TxFeeDelegatedValueTransfer {
    /// Creates an unsigned fee-delegated value transfer.
    pub const fn new(core: TxCore, to: Address, value: U256) -> Self {
        Self { core, transfer: Transfer { to, value } }
    }
}

impl KlayTransaction for TxFeeDelegatedValueTransfer {
    const TX_TYPE: KlayTxType = KlayTxType::FeeDelegatedValueTransfer;

    fn core(&self) -> &TxCore {
        &self.core
    }

    fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    fn push_fields(&self, out: &mut Vec<RlpItem>) {
        self.core.push_head_fields(out);
        self.transfer.push_fields(&self.core, out);
    }

    fn read_fields(fields: &mut FieldReader<'_>) -> KlayTxResult<Self> {
        let (core, transfer) = Transfer::read_with_core(fields)?;
        Ok(Self { core, transfer })
    }
}

/// Value transfer whose fee is split by `fee_ratio`.
///
/// Fields: `nonce, gas_price, gas_limit, to, value, from, fee_ratio`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxFeeDelegatedValueTransferWithRatio {
    /// Shared fields.
    #[serde(flatten)]
    pub core: TxCore,
    /// Recipient and amount.
    #[serde(flatten)]
    pub transfer: Transfer,
    /// Fee payer's share.
    pub fee_ratio: FeeRatio,
}

impl TxFeeDelegatedValueTransferWithRatio {
    /// Creates an unsigned transfer, rejecting a ratio outside `1..=99`.
    pub fn new(core: TxCore, to: Address, value: U256, fee_ratio: u8) -> KlayTxResult<Self> {
        Ok(Self { core, transfer: Transfer { to, value }, fee_ratio: FeeRatio::new(fee_ratio)? })
    }
}

impl KlayTransaction for TxFeeDelegatedValueTransferWithRatio {
    const TX_TYPE: KlayTxType = KlayTxType::FeeDelegatedValueTransferWithRatio;

    fn core(&self) -> &TxCore {
        &self.core
    }

    fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    fn push_fields(&self, out: &mut Vec<RlpItem>) {
        self.core.push_head_fields(out);
        self.transfer.push_fields(&self.core, out);
        out.push(self.fee_ratio.to_rlp());
    }

    fn read_fields(fields: &mut FieldReader<'_>) -> KlayTxResult<Self> {
        let (core, transfer) = Transfer::read_with_core(fields)?;
        Ok(Self { core, transfer, fee_ratio: FeeRatio::read(fields)? })
    }
}

/// Fee-delegated value transfer with a memo.
///
/// Fields: `nonce, gas_price, gas_limit, to, value, from, payload`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TxFeeDelegatedValueTransferMemo {
    /// Shared fields.
    #[serde(flatten)]
    pub core: TxCore,
    /// Recipient and amount.
    #[serde(flatten)]
    pub transfer: Transfer,
    /// The memo.
    pub payload: Bytes,
}

impl TxFeeDelegatedValueTransferMemo {
    /// Creates an unsigned fee-delegated transfer with memo.
    pub fn new(core: TxCore, to: Address, value: U256, payload: impl Into<Bytes>) -> Self {
        Self { core, transfer: Transfer { to, value }, payload: payload.into() }
    }
}

impl KlayTransaction for TxFeeDelegatedValueTransferMemo {
    const TX_TYPE: KlayTxType = KlayTxType::FeeDelegatedValueTransferMemo;

    fn core(&self) -> &TxCore {
        &self.core
    }

    fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    fn push_fields(&self, out: &mut Vec<RlpItem>) {
        self.core.push_head_fields(out);
        self.transfer.push_fields(&self.core, out);
        out.push(RlpItem::Bytes(self.payload.clone()));
    }

    fn read_fields(fields: &mut FieldReader<'_>) -> KlayTxResult<Self> {
        let (core, transfer) = Transfer::read_with_core(fields)?;
        Ok(Self { core, transfer, payload: fields.bytes()? })
    }
}

/// Value transfer with a memo whose fee is split by `fee_ratio`.
///
/// Fields: `nonce, gas_price, gas_limit, to, value, from, payload, fee_ratio`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxFeeDelegatedValueTransferMemoWithRatio {
    /// Shared fields.
    #[serde(flatten)]
    pub core: TxCore,
    /// Recipient and amount.
    #[serde(flatten)]
    pub transfer: Transfer,
    /// The memo.
    pub payload: Bytes,
    /// Fee payer's share.
    pub fee_ratio: FeeRatio,
}

impl TxFeeDelegatedValueTransferMemoWithRatio {
    /// Creates an unsigned transfer with memo, rejecting a ratio outside `1..=99`.
    pub fn new(
        core: TxCore,
        to: Address,
        value: U256,
        payload: impl Into<Bytes>,
        fee_ratio: u8,
    ) -> KlayTxResult<Self> {
        Ok(Self {
            core,
            transfer: Transfer { to, value },
            payload: payload.into(),
            fee_ratio: FeeRatio::new(fee_ratio)?,
        })
    }
}

impl KlayTransaction for TxFeeDelegatedValueTransferMemoWithRatio {
    const TX_TYPE: KlayTxType = KlayTxType::FeeDelegatedValueTransferMemoWithRatio;

    fn core(&self) -> &TxCore {
        &self.core
    }

    fn transfer(&self) -> &Transfer {
        &self.transfer
    }

    fn push_fields(&self, out: &mut Vec<RlpItem>) {
        self.core.push_head_fields(out);
        self.transfer.push_fields(&self.core, out);
        out.push(RlpItem::Bytes(self.payload.clone()));
        out.push(self.fee_ratio.to_rlp());
    }

    fn read_fields(fields: &mut FieldReader<'_>) -> KlayTxResult<Self> {
        let (core, transfer) = Transfer::read_with_core(fields)?;
        let payload = fields.bytes()?;
        Ok(Self { core, transfer, payload, fee_ratio: FeeRatio::read(fields)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes};

    fn core() -> TxCore {
        TxCore::new(
            U256::from(1234),
            U256::from(25_000_000_000u64),
            U256::from(10_000_000),
            address!("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"),
        )
    }

    const TO: Address = address!("0x7b65b75d204abed71587c9e519a89277766ee1d0");

    #[test]
    fn fee_ratio_bounds() {
        assert!(FeeRatio::new(0).is_err());
        assert_eq!(FeeRatio::new(1).unwrap().get(), 1);
        assert_eq!(FeeRatio::new(99).unwrap().get(), 99);
        assert!(FeeRatio::new(100).is_err());
        assert!(FeeRatio::try_from(U256::from(356)).is_err());
    }

    #[test]
    fn ratio_constructor_bounds() {
        let build = |ratio| {
            TxFeeDelegatedValueTransferMemoWithRatio::new(core(), TO, U256::from(1), bytes!("00"), ratio)
        };
        assert!(matches!(build(0), Err(KlayTxError::InvalidFieldValue { field: "fee_ratio", .. })));
        assert!(build(1).is_ok());
        assert!(build(99).is_ok());
        assert!(matches!(build(100), Err(KlayTxError::InvalidFieldValue { field: "fee_ratio", .. })));

        assert!(TxFeeDelegatedValueTransferWithRatio::new(core(), TO, U256::from(1), 0).is_err());
        assert!(TxFeeDelegatedValueTransferWithRatio::new(core(), TO, U256::from(1), 30).is_ok());
    }

    #[test]
    fn memo_with_ratio_layout() {
        let tx = TxFeeDelegatedValueTransferMemoWithRatio::new(
            core(),
            TO,
            U256::from(10),
            bytes!("68656c6c6f"),
            30,
        )
        .unwrap();
        let fields = tx.fields();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[3].as_address().unwrap(), TO);
        assert_eq!(fields[4].as_quantity().unwrap(), U256::from(10));
        assert_eq!(fields[5].as_address().unwrap(), tx.core.from);
        assert_eq!(fields[6].as_bytes().unwrap(), &bytes!("68656c6c6f"));
        assert_eq!(fields[7].as_quantity().unwrap(), U256::from(30));

        let decoded =
            TxFeeDelegatedValueTransferMemoWithRatio::read_fields(&mut FieldReader::new(&fields))
                .unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn decoded_ratio_is_validated() {
        let tx = TxFeeDelegatedValueTransferWithRatio::new(core(), TO, U256::from(1), 30).unwrap();
        let mut fields = tx.fields();
        fields[6] = RlpItem::quantity(U256::from(100));
        let err = TxFeeDelegatedValueTransferWithRatio::read_fields(&mut FieldReader::new(&fields))
            .unwrap_err();
        assert!(matches!(err, KlayTxError::InvalidFieldValue { field: "fee_ratio", .. }));

        fields[6] = RlpItem::quantity(U256::ZERO);
        assert!(TxFeeDelegatedValueTransferWithRatio::read_fields(&mut FieldReader::new(&fields))
            .is_err());
    }

    #[test]
    fn fee_ratio_serde() {
        let ratio: FeeRatio = serde_json::from_str("30").unwrap();
        assert_eq!(ratio.get(), 30);
        assert!(serde_json::from_str::<FeeRatio>("0").is_err());
        assert_eq!(serde_json::to_string(&ratio).unwrap(), "30");
    }
}
