use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

use super::{
    fee_delegated::{
        FeeRatio, TxFeeDelegatedValueTransfer, TxFeeDelegatedValueTransferMemo,
        TxFeeDelegatedValueTransferMemoWithRatio, TxFeeDelegatedValueTransferWithRatio,
    },
    tx_type::KlayTxType,
    value_transfer::{TxValueTransfer, TxValueTransferMemo},
    FieldReader, KlayTransaction, Transfer, TxCore,
};
use crate::{
    error::{KlayTxError, KlayTxResult},
    rlp::{self, RlpItem},
};

/// The TypedTransaction enum represents every supported Klaytn transaction without signatures.
///
/// Its variants correspond to specific allowed transactions:
/// 1. ValueTransfer [`TxValueTransfer`]
/// 2. FeeDelegatedValueTransfer [`TxFeeDelegatedValueTransfer`]
/// 3. FeeDelegatedValueTransferWithRatio [`TxFeeDelegatedValueTransferWithRatio`]
/// 4. ValueTransferMemo [`TxValueTransferMemo`]
/// 5. FeeDelegatedValueTransferMemo [`TxFeeDelegatedValueTransferMemo`]
/// 6. FeeDelegatedValueTransferMemoWithRatio [`TxFeeDelegatedValueTransferMemoWithRatio`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum KlayTypedTransaction {
    /// Value transfer
    ValueTransfer(TxValueTransfer),
    /// Fee-delegated value transfer
    FeeDelegatedValueTransfer(TxFeeDelegatedValueTransfer),
    /// Fee-delegated value transfer with fee ratio
    FeeDelegatedValueTransferWithRatio(TxFeeDelegatedValueTransferWithRatio),
    /// Value transfer with memo
    ValueTransferMemo(TxValueTransferMemo),
    /// Fee-delegated value transfer with memo
    FeeDelegatedValueTransferMemo(TxFeeDelegatedValueTransferMemo),
    /// Fee-delegated value transfer with memo and fee ratio
    FeeDelegatedValueTransferMemoWithRatio(TxFeeDelegatedValueTransferMemoWithRatio),
}

macro_rules! impl_from_tx {
    ($($variant:ident => $tx:ident),* $(,)?) => {
        $(
            impl From<$tx> for KlayTypedTransaction {
                fn from(tx: $tx) -> Self {
                    Self::$variant(tx)
                }
            }
        )*
    };
}

impl_from_tx!(
    ValueTransfer => TxValueTransfer,
    FeeDelegatedValueTransfer => TxFeeDelegatedValueTransfer,
    FeeDelegatedValueTransferWithRatio => TxFeeDelegatedValueTransferWithRatio,
    ValueTransferMemo => TxValueTransferMemo,
    FeeDelegatedValueTransferMemo => TxFeeDelegatedValueTransferMemo,
    FeeDelegatedValueTransferMemoWithRatio => TxFeeDelegatedValueTransferMemoWithRatio,
);

impl KlayTypedTransaction {
    /// Return the [`KlayTxType`] of the inner txn.
    pub const fn tx_type(&self) -> KlayTxType {
        match self {
            Self::ValueTransfer(_) => KlayTxType::ValueTransfer,
            Self::FeeDelegatedValueTransfer(_) => KlayTxType::FeeDelegatedValueTransfer,
            Self::FeeDelegatedValueTransferWithRatio(_) => {
                KlayTxType::FeeDelegatedValueTransferWithRatio
            }
            Self::ValueTransferMemo(_) => KlayTxType::ValueTransferMemo,
            Self::FeeDelegatedValueTransferMemo(_) => KlayTxType::FeeDelegatedValueTransferMemo,
            Self::FeeDelegatedValueTransferMemoWithRatio(_) => {
                KlayTxType::FeeDelegatedValueTransferMemoWithRatio
            }
        }
    }

    /// Shared nonce/gas/sender fields.
    pub fn core(&self) -> &TxCore {
        match self {
            Self::ValueTransfer(tx) => tx.core(),
            Self::FeeDelegatedValueTransfer(tx) => tx.core(),
            Self::FeeDelegatedValueTransferWithRatio(tx) => tx.core(),
            Self::ValueTransferMemo(tx) => tx.core(),
            Self::FeeDelegatedValueTransferMemo(tx) => tx.core(),
            Self::FeeDelegatedValueTransferMemoWithRatio(tx) => tx.core(),
        }
    }

    /// Recipient and amount.
    pub fn transfer(&self) -> &Transfer {
        match self {
            Self::ValueTransfer(tx) => tx.transfer(),
            Self::FeeDelegatedValueTransfer(tx) => tx.transfer(),
            Self::FeeDelegatedValueTransferWithRatio(tx) => tx.transfer(),
            Self::ValueTransferMemo(tx) => tx.transfer(),
            Self::FeeDelegatedValueTransferMemo(tx) => tx.transfer(),
            Self::FeeDelegatedValueTransferMemoWithRatio(tx) => tx.transfer(),
        }
    }

    /// The sender.
    pub fn sender(&self) -> Address {
        self.core().from
    }

    /// The recipient.
    pub fn to(&self) -> Address {
        self.transfer().to
    }

    /// Amount of peb sent.
    pub fn value(&self) -> U256 {
        self.transfer().value
    }

    /// The memo, for memo variants.
    pub const fn payload(&self) -> Option<&Bytes> {
        match self {
            Self::ValueTransferMemo(tx) => Some(&tx.payload),
            Self::FeeDelegatedValueTransferMemo(tx) => Some(&tx.payload),
            Self::FeeDelegatedValueTransferMemoWithRatio(tx) => Some(&tx.payload),
            Self::ValueTransfer(_) |
            Self::FeeDelegatedValueTransfer(_) |
            Self::FeeDelegatedValueTransferWithRatio(_) => None,
        }
    }

    /// The fee payer's share, for ratio variants.
    pub const fn fee_ratio(&self) -> Option<FeeRatio> {
        match self {
            Self::FeeDelegatedValueTransferWithRatio(tx) => Some(tx.fee_ratio),
            Self::FeeDelegatedValueTransferMemoWithRatio(tx) => Some(tx.fee_ratio),
            Self::ValueTransfer(_) |
            Self::FeeDelegatedValueTransfer(_) |
            Self::ValueTransferMemo(_) |
            Self::FeeDelegatedValueTransferMemo(_) => None,
        }
    }

    /// Returns `true` if a fee payer may sign this transaction.
    pub const fn is_fee_delegated(&self) -> bool {
        self.tx_type().is_fee_delegated()
    }

    /// Return the inner value transfer if it exists.
    pub const fn value_transfer(&self) -> Option<&TxValueTransfer> {
        match self {
            Self::ValueTransfer(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner fee-delegated value transfer if it exists.
    pub const fn fee_delegated_value_transfer(&self) -> Option<&TxFeeDelegatedValueTransfer> {
        match self {
            Self::FeeDelegatedValueTransfer(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner fee-delegated value transfer with ratio if it exists.
    pub const fn fee_delegated_value_transfer_with_ratio(
        &self,
    ) -> Option<&TxFeeDelegatedValueTransferWithRatio> {
        match self {
            Self::FeeDelegatedValueTransferWithRatio(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner memo transfer if it exists.
    pub const fn value_transfer_memo(&self) -> Option<&TxValueTransferMemo> {
        match self {
            Self::ValueTransferMemo(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner fee-delegated memo transfer if it exists.
    pub const fn fee_delegated_value_transfer_memo(&self) -> Option<&TxFeeDelegatedValueTransferMemo> {
        match self {
            Self::FeeDelegatedValueTransferMemo(tx) => Some(tx),
            _ => None,
        }
    }

    /// Return the inner fee-delegated memo transfer with ratio if it exists.
    pub const fn fee_delegated_value_transfer_memo_with_ratio(
        &self,
    ) -> Option<&TxFeeDelegatedValueTransferMemoWithRatio> {
        match self {
            Self::FeeDelegatedValueTransferMemoWithRatio(tx) => Some(tx),
            _ => None,
        }
    }

    /// The ordered field list without any signature data.
    pub fn fields(&self) -> Vec<RlpItem> {
        match self {
            Self::ValueTransfer(tx) => tx.fields(),
            Self::FeeDelegatedValueTransfer(tx) => tx.fields(),
            Self::FeeDelegatedValueTransferWithRatio(tx) => tx.fields(),
            Self::ValueTransferMemo(tx) => tx.fields(),
            Self::FeeDelegatedValueTransferMemo(tx) => tx.fields(),
            Self::FeeDelegatedValueTransferMemoWithRatio(tx) => tx.fields(),
        }
    }

    /// Reads the fields of `tx_type` from the front of `fields`.
    pub fn read_fields(tx_type: KlayTxType, fields: &mut FieldReader<'_>) -> KlayTxResult<Self> {
        Ok(match tx_type {
            KlayTxType::ValueTransfer => TxValueTransfer::read_fields(fields)?.into(),
            KlayTxType::FeeDelegatedValueTransfer => {
                TxFeeDelegatedValueTransfer::read_fields(fields)?.into()
            }
            KlayTxType::FeeDelegatedValueTransferWithRatio => {
                TxFeeDelegatedValueTransferWithRatio::read_fields(fields)?.into()
            }
            KlayTxType::ValueTransferMemo => TxValueTransferMemo::read_fields(fields)?.into(),
            KlayTxType::FeeDelegatedValueTransferMemo => {
                TxFeeDelegatedValueTransferMemo::read_fields(fields)?.into()
            }
            KlayTxType::FeeDelegatedValueTransferMemoWithRatio => {
                TxFeeDelegatedValueTransferMemoWithRatio::read_fields(fields)?.into()
            }
        })
    }

    /// `rlp([type, fields...])`, the part of every signing payload that commits to the fields.
    fn encode_type_and_fields(&self) -> RlpItem {
        let mut items = Vec::with_capacity(self.tx_type().field_count() + 1);
        items.push(RlpItem::quantity(U256::from(u8::from(self.tx_type()))));
        items.extend(self.fields());
        RlpItem::bytes(rlp::encode_list(&items))
    }

    /// Bytes the sender signs: `rlp([rlp([type, fields...]), chain_id, 0, 0])`.
    pub fn sender_signing_payload(&self, chain_id: u64) -> Vec<u8> {
        rlp::encode_list(&[
            self.encode_type_and_fields(),
            RlpItem::quantity(U256::from(chain_id)),
            RlpItem::quantity(U256::ZERO),
            RlpItem::quantity(U256::ZERO),
        ])
    }

    /// Keccak hash of [`Self::sender_signing_payload`].
    pub fn sender_signing_hash(&self, chain_id: u64) -> B256 {
        keccak256(self.sender_signing_payload(chain_id))
    }

    /// Bytes the fee payer signs: `rlp([rlp([type, fields...]), fee_payer, chain_id, 0, 0])`.
    ///
    /// Fails for types without fee delegation.
    pub fn fee_payer_signing_payload(
        &self,
        fee_payer: &Address,
        chain_id: u64,
    ) -> KlayTxResult<Vec<u8>> {
        if !self.is_fee_delegated() {
            return Err(KlayTxError::invalid(
                "fee_payer",
                format!("{} does not support fee delegation", self.tx_type()),
            ));
        }
        Ok(rlp::encode_list(&[
            self.encode_type_and_fields(),
            RlpItem::address(fee_payer),
            RlpItem::quantity(U256::from(chain_id)),
            RlpItem::quantity(U256::ZERO),
            RlpItem::quantity(U256::ZERO),
        ]))
    }

    /// Keccak hash of [`Self::fee_payer_signing_payload`].
    pub fn fee_payer_signing_hash(&self, fee_payer: &Address, chain_id: u64) -> KlayTxResult<B256> {
        self.fee_payer_signing_payload(fee_payer, chain_id).map(keccak256)
    }
}
