//! Value transfers paid entirely by the sender.

use alloy_primitives::{Address, Bytes, U256};

use super::{FieldReader, KlayTransaction, KlayTxType, Transfer, TxCore};
use crate::{error::KlayTxResult, rlp::RlpItem};

/// Sends peb from `from` to `to`.
///
/// Fields: `nonce, gas_price, gas_limit, to, value, from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TxValueTransfer {
    /// Shared fields.
    #[serde(flatten)]
    pub core: TxCore,
    /// Recipient and amount.
    #[serde(flatten)]
    pub transfer: Transfer,
}

impl TxValueTransfer {
    /// Creates an unsigned value transfer.
    pub const fn new(core: TxCore, to: Address, value: U256) -> Self {
        Self { core, transfer: Transfer { to, value } }
    }
}

impl KlayTransaction for TxValueTransfer {
    const TX_TYPE: KlayTxType = KlayTxType::ValueTransfer;

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

/// A value transfer with an attached memo.
///
/// Fields: `nonce, gas_price, gas_limit, to, value, from, payload`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TxValueTransferMemo {
    /// Shared fields.
    #[serde(flatten)]
    pub core: TxCore,
    /// Recipient and amount.
    #[serde(flatten)]
    pub transfer: Transfer,
    /// The memo.
    pub payload: Bytes,
}

impl TxValueTransferMemo {
    /// Creates an unsigned value transfer with memo.
    pub fn new(core: TxCore, to: Address, value: U256, payload: impl Into<Bytes>) -> Self {
        Self { core, transfer: Transfer { to, value }, payload: payload.into() }
    }
}

impl KlayTransaction for TxValueTransferMemo {
    const TX_TYPE: KlayTxType = KlayTxType::ValueTransferMemo;

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
