use alloy_primitives::{hex, keccak256, Address, B256};

use super::{
    signature::SignatureEnvelope, tx_type::KlayTxType, typed::KlayTypedTransaction, FieldReader,
};
use crate::{
    error::{KlayTxError, KlayTxResult},
    registry,
    rlp::{self, RlpItem},
};

/// The fee payer's part of a fee-delegated transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayer {
    /// Account paying (part of) the fee.
    pub address: Address,
    /// Signatures of the fee payer.
    pub signatures: SignatureEnvelope,
}

/// A Klaytn transaction together with its signatures.
///
/// The raw form is `type || rlp(fields ++ tail)` where the tail is
///
/// * empty for an unsigned transaction,
/// * `[sender_signatures]` for a sender-signed one,
/// * `[sender_signatures], fee_payer, [fee_payer_signatures]` once a fee payer is attached.
///
/// The sender envelope is only written when it is non-empty or a fee payer follows it, so every
/// value has exactly one raw form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EnvelopeParts")]
pub struct KlayTxEnvelope {
    transaction: KlayTypedTransaction,
    sender_signatures: SignatureEnvelope,
    fee_payer: Option<FeePayer>,
}

/// Unchecked serde form of [`KlayTxEnvelope`].
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeParts {
    transaction: KlayTypedTransaction,
    sender_signatures: SignatureEnvelope,
    fee_payer: Option<FeePayer>,
}

impl TryFrom<EnvelopeParts> for KlayTxEnvelope {
    type Error = KlayTxError;

    fn try_from(parts: EnvelopeParts) -> Result<Self, Self::Error> {
        let envelope = Self::new(parts.transaction).with_sender_signatures(parts.sender_signatures);
        match parts.fee_payer {
            Some(FeePayer { address, signatures }) => envelope.with_fee_payer(address, signatures),
            None => Ok(envelope),
        }
    }
}

impl From<KlayTypedTransaction> for KlayTxEnvelope {
    fn from(transaction: KlayTypedTransaction) -> Self {
        Self::new(transaction)
    }
}

impl AsRef<KlayTypedTransaction> for KlayTxEnvelope {
    fn as_ref(&self) -> &KlayTypedTransaction {
        &self.transaction
    }
}

impl KlayTxEnvelope {
    /// Wraps an unsigned transaction.
    pub fn new(transaction: impl Into<KlayTypedTransaction>) -> Self {
        Self {
            transaction: transaction.into(),
            sender_signatures: SignatureEnvelope::empty(),
            fee_payer: None,
        }
    }

    /// The unsigned transaction.
    pub const fn transaction(&self) -> &KlayTypedTransaction {
        &self.transaction
    }

    /// Consumes the envelope, returning the unsigned transaction.
    pub fn into_transaction(self) -> KlayTypedTransaction {
        self.transaction
    }

    /// Wire tag of the inner transaction.
    pub const fn tx_type(&self) -> KlayTxType {
        self.transaction.tx_type()
    }

    /// Replaces the sender's signatures.
    ///
    /// Takes `self` by value: a second call replaces whatever the first one attached, and no two
    /// threads can attach to the same envelope.
    pub fn with_sender_signatures(mut self, signatures: impl Into<SignatureEnvelope>) -> Self {
        self.sender_signatures = signatures.into();
        self
    }

    /// Replaces the fee payer and its signatures.
    ///
    /// Fails with [`KlayTxError::InvalidFieldValue`] if the transaction type has no fee-payer
    /// slot. Same ownership contract as [`Self::with_sender_signatures`].
    pub fn with_fee_payer(
        mut self,
        address: Address,
        signatures: impl Into<SignatureEnvelope>,
    ) -> KlayTxResult<Self> {
        match self.tx_type() {
            KlayTxType::FeeDelegatedValueTransfer |
            KlayTxType::FeeDelegatedValueTransferWithRatio |
            KlayTxType::FeeDelegatedValueTransferMemo |
            KlayTxType::FeeDelegatedValueTransferMemoWithRatio => {
                self.fee_payer = Some(FeePayer { address, signatures: signatures.into() });
                Ok(self)
            }
            tx_type @ (KlayTxType::ValueTransfer | KlayTxType::ValueTransferMemo) => {
                Err(KlayTxError::invalid(
                    "fee_payer",
                    format!("{tx_type} does not support fee delegation"),
                ))
            }
        }
    }

    /// Signatures of the sender; empty if unsigned.
    pub const fn sender_signatures(&self) -> &SignatureEnvelope {
        &self.sender_signatures
    }

    /// Address of the attached fee payer.
    pub fn fee_payer(&self) -> Option<Address> {
        self.fee_payer.as_ref().map(|fee_payer| fee_payer.address)
    }

    /// Signatures of the attached fee payer.
    pub fn fee_payer_signatures(&self) -> Option<&SignatureEnvelope> {
        self.fee_payer.as_ref().map(|fee_payer| &fee_payer.signatures)
    }

    /// Returns `true` if the sender has signed.
    pub fn is_signed(&self) -> bool {
        !self.sender_signatures.is_empty()
    }

    fn push_sender_tail(&self, items: &mut Vec<RlpItem>) {
        if self.is_signed() || self.fee_payer.is_some() {
            items.push(self.sender_signatures.to_rlp());
        }
    }

    fn encode_with_tail(&self, items: Vec<RlpItem>) -> Vec<u8> {
        let body = rlp::encode_list(&items);
        let mut out = Vec::with_capacity(body.len() + 1);
        out.push(u8::from(self.tx_type()));
        out.extend_from_slice(&body);
        out
    }

    /// Raw bytes: `type || rlp(fields ++ tail)`.
    pub fn encode_2718(&self) -> Vec<u8> {
        let mut items = self.transaction.fields();
        self.push_sender_tail(&mut items);
        if let Some(fee_payer) = &self.fee_payer {
            items.push(RlpItem::address(&fee_payer.address));
            items.push(fee_payer.signatures.to_rlp());
        }
        self.encode_with_tail(items)
    }

    /// `0x`-prefixed lowercase hex of [`Self::encode_2718`].
    pub fn to_raw_hex(&self) -> String {
        hex::encode_prefixed(self.encode_2718())
    }

    /// Decodes raw bytes through the process-wide default registry.
    pub fn decode_2718(raw: &[u8]) -> KlayTxResult<Self> {
        registry::default_registry().decode_raw(raw)
    }

    /// Decodes a hex string, with or without `0x`.
    pub fn decode_hex(raw: &str) -> KlayTxResult<Self> {
        Self::decode_2718(&hex::decode(raw)?)
    }

    /// Decodes the bytes following the type tag as a `tx_type` transaction.
    pub fn decode_typed(tx_type: KlayTxType, payload: &[u8]) -> KlayTxResult<Self> {
        let items = rlp::decode_list(payload)?;
        let mandatory = tx_type.field_count();
        let accepted = match items.len().checked_sub(mandatory) {
            Some(0 | 1) => true,
            Some(3) => tx_type.is_fee_delegated(),
            _ => false,
        };
        if !accepted {
            return Err(KlayTxError::FieldCountMismatch {
                tx_type,
                expected: accepted_field_counts(tx_type),
                got: items.len(),
            });
        }

        let mut fields = FieldReader::new(&items);
        let transaction = KlayTypedTransaction::read_fields(tx_type, &mut fields)?;
        let mut envelope = Self::new(transaction);

        match fields.remaining() {
            [] => {}
            [sender] => {
                let signatures = SignatureEnvelope::from_rlp(sender)?;
                if signatures.is_empty() {
                    return Err(alloy_rlp::Error::Custom("empty sender signature list").into());
                }
                envelope.sender_signatures = signatures;
            }
            [sender, fee_payer, fee_payer_signatures] => {
                envelope.sender_signatures = SignatureEnvelope::from_rlp(sender)?;
                envelope.fee_payer = Some(FeePayer {
                    address: fee_payer.as_address()?,
                    signatures: SignatureEnvelope::from_rlp(fee_payer_signatures)?,
                });
            }
            rest => {
                return Err(KlayTxError::FieldCountMismatch {
                    tx_type,
                    expected: accepted_field_counts(tx_type),
                    got: mandatory + rest.len(),
                })
            }
        }
        Ok(envelope)
    }

    /// Keccak hash of the raw bytes.
    pub fn tx_hash(&self) -> B256 {
        keccak256(self.encode_2718())
    }

    /// Keccak hash of `type || rlp(fields ++ [sender_signatures])`, leaving out the fee payer.
    ///
    /// Equal to [`Self::tx_hash`] for transactions without a fee payer.
    pub fn sender_tx_hash(&self) -> B256 {
        let mut items = self.transaction.fields();
        if self.fee_payer.is_some() {
            items.push(self.sender_signatures.to_rlp());
        } else {
            self.push_sender_tail(&mut items);
        }
        keccak256(self.encode_with_tail(items))
    }

    /// See [`KlayTypedTransaction::sender_signing_hash`].
    pub fn sender_signing_hash(&self, chain_id: u64) -> B256 {
        self.transaction.sender_signing_hash(chain_id)
    }

    /// Fee-payer signing hash for the attached fee payer.
    pub fn fee_payer_signing_hash(&self, chain_id: u64) -> KlayTxResult<B256> {
        let fee_payer = self
            .fee_payer()
            .ok_or_else(|| KlayTxError::invalid("fee_payer", "no fee payer attached"))?;
        self.transaction.fee_payer_signing_hash(&fee_payer, chain_id)
    }
}

const fn accepted_field_counts(tx_type: KlayTxType) -> &'static str {
    match tx_type {
        KlayTxType::ValueTransfer => "6 or 7",
        KlayTxType::FeeDelegatedValueTransfer => "6, 7 or 9",
        KlayTxType::FeeDelegatedValueTransferWithRatio |
        KlayTxType::FeeDelegatedValueTransferMemo => "7, 8 or 10",
        KlayTxType::ValueTransferMemo => "7 or 8",
        KlayTxType::FeeDelegatedValueTransferMemoWithRatio => "8, 9 or 11",
    }
}
