//! Klaytn transaction types

pub mod envelope;
pub mod fee_delegated;
pub mod signature;
pub mod tx_type;
pub mod typed;
pub mod value_transfer;

use alloy_primitives::{Address, Bytes, U256};

use crate::{error::KlayTxResult, rlp::RlpItem};

pub use fee_delegated::{
    FeeRatio, TxFeeDelegatedValueTransfer, TxFeeDelegatedValueTransferMemo,
    TxFeeDelegatedValueTransferMemoWithRatio, TxFeeDelegatedValueTransferWithRatio,
};
pub use tx_type::KlayTxType;
pub use value_transfer::{TxValueTransfer, TxValueTransferMemo};

/// Field layout of one transaction type.
///
/// Implementors only describe their own fields; signatures, the type prefix and the outer list are
/// handled by [`envelope::KlayTxEnvelope`].
pub trait KlayTransaction: Sized {
    /// Wire tag of the implementing type.
    const TX_TYPE: KlayTxType;

    /// Shared nonce/gas/sender fields.
    fn core(&self) -> &TxCore;

    /// Recipient and amount.
    fn transfer(&self) -> &Transfer;

    /// Pushes every field, in wire order, onto `out`.
    fn push_fields(&self, out: &mut Vec<RlpItem>);

    /// Reads every field, in wire order, from `fields`.
    fn read_fields(fields: &mut FieldReader<'_>) -> KlayTxResult<Self>;

    /// The ordered field list without any signature data.
    fn fields(&self) -> Vec<RlpItem> {
        let mut out = Vec::with_capacity(Self::TX_TYPE.field_count());
        self.push_fields(&mut out);
        out
    }
}

/// Fields shared by every transaction type.
///
/// `nonce`, `gas_price` and `gas_limit` open every field list. `from` is placed by each variant
/// after its transfer fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxCore {
    /// Number of transactions sent by the sender.
    pub nonce: U256,
    /// Unit price of gas.
    pub gas_price: U256,
    /// Maximum gas the transaction may consume.
    pub gas_limit: U256,
    /// The sender.
    pub from: Address,
}

impl TxCore {
    /// Creates the shared field set.
    pub const fn new(nonce: U256, gas_price: U256, gas_limit: U256, from: Address) -> Self {
        Self { nonce, gas_price, gas_limit, from }
    }

    /// Pushes `nonce`, `gas_price` and `gas_limit`.
    pub fn push_head_fields(&self, out: &mut Vec<RlpItem>) {
        out.push(RlpItem::quantity(self.nonce));
        out.push(RlpItem::quantity(self.gas_price));
        out.push(RlpItem::quantity(self.gas_limit));
    }
}

/// Destination and amount of a value transfer, shared by the whole family.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Transfer {
    /// The recipient.
    pub to: Address,
    /// Amount of peb to send.
    pub value: U256,
}

impl Transfer {
    /// Pushes `to`, `value` and the sender from `core`, in wire order.
    pub fn push_fields(&self, core: &TxCore, out: &mut Vec<RlpItem>) {
        out.push(RlpItem::address(&self.to));
        out.push(RlpItem::quantity(self.value));
        out.push(RlpItem::address(&core.from));
    }

    /// Reads `nonce, gas_price, gas_limit, to, value, from` from the front of `fields`.
    pub fn read_with_core(fields: &mut FieldReader<'_>) -> KlayTxResult<(TxCore, Self)> {
        let nonce = fields.quantity()?;
        let gas_price = fields.quantity()?;
        let gas_limit = fields.quantity()?;
        let to = fields.address()?;
        let value = fields.quantity()?;
        let from = fields.address()?;
        Ok((TxCore::new(nonce, gas_price, gas_limit, from), Self { to, value }))
    }
}

/// Positional cursor over a decoded field list.
///
/// Callers check the list length against the variant's field count before reading, so running off
/// the end is reported as a truncated input.
#[derive(Debug)]
pub struct FieldReader<'a> {
    fields: &'a [RlpItem],
}

impl<'a> FieldReader<'a> {
    /// Starts reading at the first field.
    pub const fn new(fields: &'a [RlpItem]) -> Self {
        Self { fields }
    }

    /// Takes the next raw item.
    pub fn next_item(&mut self) -> KlayTxResult<&'a RlpItem> {
        let (first, rest) =
            self.fields.split_first().ok_or(alloy_rlp::Error::InputTooShort)?;
        self.fields = rest;
        Ok(first)
    }

    /// Takes the next item as a quantity.
    pub fn quantity(&mut self) -> KlayTxResult<U256> {
        self.next_item()?.as_quantity()
    }

    /// Takes the next item as an address.
    pub fn address(&mut self) -> KlayTxResult<Address> {
        self.next_item()?.as_address()
    }

    /// Takes the next item as a byte string.
    pub fn bytes(&mut self) -> KlayTxResult<Bytes> {
        self.next_item()?.as_bytes().cloned()
    }

    /// Items not read yet.
    pub const fn remaining(&self) -> &'a [RlpItem] {
        self.fields
    }
}
