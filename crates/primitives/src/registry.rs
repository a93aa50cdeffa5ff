//! Type tag to decoder dispatch.

use std::sync::LazyLock;

use alloy_primitives::map::HashMap;
use tracing::{debug, trace, warn};

use crate::{
    error::{KlayTxError, KlayTxResult},
    settings::{DecoderSettings, DEFAULT_MAX_RAW_SIZE},
    tx::{
        envelope::KlayTxEnvelope, KlayTransaction, KlayTxType, TxFeeDelegatedValueTransfer,
        TxFeeDelegatedValueTransferMemo, TxFeeDelegatedValueTransferMemoWithRatio,
        TxFeeDelegatedValueTransferWithRatio, TxValueTransfer, TxValueTransferMemo,
    },
};

/// Decodes the bytes that follow a type tag.
pub type DecodeFn = fn(&[u8]) -> KlayTxResult<KlayTxEnvelope>;

static DEFAULT_REGISTRY: LazyLock<TxRegistry> = LazyLock::new(TxRegistry::default);

/// The registry used by [`KlayTxEnvelope::decode_2718`], built on first use.
pub fn default_registry() -> &'static TxRegistry {
    &DEFAULT_REGISTRY
}

fn decode_as<T: KlayTransaction>(payload: &[u8]) -> KlayTxResult<KlayTxEnvelope> {
    KlayTxEnvelope::decode_typed(T::TX_TYPE, payload)
}

fn builtin_decoder(tx_type: KlayTxType) -> DecodeFn {
    match tx_type {
        KlayTxType::ValueTransfer => decode_as::<TxValueTransfer>,
        KlayTxType::FeeDelegatedValueTransfer => decode_as::<TxFeeDelegatedValueTransfer>,
        KlayTxType::FeeDelegatedValueTransferWithRatio => {
            decode_as::<TxFeeDelegatedValueTransferWithRatio>
        }
        KlayTxType::ValueTransferMemo => decode_as::<TxValueTransferMemo>,
        KlayTxType::FeeDelegatedValueTransferMemo => decode_as::<TxFeeDelegatedValueTransferMemo>,
        KlayTxType::FeeDelegatedValueTransferMemoWithRatio => {
            decode_as::<TxFeeDelegatedValueTransferMemoWithRatio>
        }
    }
}

/// Maps type tags to decoders.
///
/// Tags are opaque keys: no ordering or contiguity is assumed, and new tags can be registered
/// next to the built-in ones.
#[derive(Debug, Clone)]
pub struct TxRegistry {
    decoders: HashMap<u8, DecodeFn>,
    max_raw_size: usize,
}

impl Default for TxRegistry {
    /// All built-in types and [`DEFAULT_MAX_RAW_SIZE`].
    fn default() -> Self {
        let mut registry = Self::empty();
        for tx_type in KlayTxType::ALL {
            registry.register(tx_type.into(), builtin_decoder(tx_type));
        }
        registry
    }
}

impl TxRegistry {
    /// A registry without any decoder.
    pub fn empty() -> Self {
        Self { decoders: HashMap::default(), max_raw_size: DEFAULT_MAX_RAW_SIZE }
    }

    /// Built-in types minus `settings.disabled_types`, limited to `settings.max_raw_size`.
    pub fn from_settings(settings: &DecoderSettings) -> Self {
        let mut registry = Self::default();
        registry.max_raw_size = settings.max_raw_size;
        for tx_type in KlayTxType::ALL {
            let tag = u8::from(tx_type);
            if settings.is_disabled(tag) && registry.decoders.remove(&tag).is_some() {
                warn!(target: "klay::registry", %tx_type, tag, "Built-in transaction type disabled");
            }
        }
        registry
    }

    /// Registers `decode` for `tag`, returning the decoder it replaces.
    pub fn register(&mut self, tag: u8, decode: DecodeFn) -> Option<DecodeFn> {
        let previous = self.decoders.insert(tag, decode);
        if previous.is_some() {
            debug!(target: "klay::registry", tag, "Replaced decoder");
        } else {
            debug!(target: "klay::registry", tag, "Registered decoder");
        }
        previous
    }

    /// Returns `true` if a decoder is registered for `tag`.
    pub fn contains(&self, tag: u8) -> bool {
        self.decoders.contains_key(&tag)
    }

    /// Largest raw input accepted by [`Self::decode_raw`].
    pub const fn max_raw_size(&self) -> usize {
        self.max_raw_size
    }

    /// Decodes `payload`, the bytes following `tag`.
    pub fn decode(&self, tag: u8, payload: &[u8]) -> KlayTxResult<KlayTxEnvelope> {
        let decode = self.decoders.get(&tag).ok_or(KlayTxError::UnknownTypeTag(tag))?;
        trace!(target: "klay::registry", tag, len = payload.len(), "Decoding transaction");
        decode(payload)
    }

    /// Splits the type tag off `raw` and decodes the rest.
    pub fn decode_raw(&self, raw: &[u8]) -> KlayTxResult<KlayTxEnvelope> {
        if raw.len() > self.max_raw_size {
            return Err(KlayTxError::Oversized { size: raw.len(), limit: self.max_raw_size });
        }
        let (&tag, payload) = raw.split_first().ok_or(alloy_rlp::Error::InputTooShort)?;
        self.decode(tag, payload)
    }
}
