//! Klaytn typed transactions: the value-transfer family with fee delegation, its canonical RLP
//! codec, signature envelopes and a type tag registry.
//!
//! ```
//! use alloy_primitives::{address, U256};
//! use klay_primitives::{KlayTxEnvelope, TxCore, TxFeeDelegatedValueTransferWithRatio};
//!
//! let core = TxCore::new(
//!     U256::from(1),
//!     U256::from(25_000_000_000u64),
//!     U256::from(21_000),
//!     address!("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b"),
//! );
//! let tx = TxFeeDelegatedValueTransferWithRatio::new(
//!     core,
//!     address!("0x7b65b75d204abed71587c9e519a89277766ee1d0"),
//!     U256::from(10),
//!     30,
//! )?;
//! let raw = KlayTxEnvelope::new(tx).encode_2718();
//! assert_eq!(raw[0], 0x0a);
//! assert_eq!(KlayTxEnvelope::decode_2718(&raw)?.encode_2718(), raw);
//! # Ok::<(), klay_primitives::KlayTxError>(())
//! ```

pub mod address;
pub mod error;
pub mod registry;
pub mod rlp;
pub mod settings;
pub mod tx;

pub use error::{KlayTxError, KlayTxResult};
pub use registry::{default_registry, DecodeFn, TxRegistry};
pub use settings::DecoderSettings;
pub use tx::{
    envelope::{FeePayer, KlayTxEnvelope},
    signature::{KlaySignature, SignatureEnvelope},
    typed::KlayTypedTransaction,
    FeeRatio, KlayTransaction, KlayTxType, Transfer, TxCore, TxFeeDelegatedValueTransfer,
    TxFeeDelegatedValueTransferMemo, TxFeeDelegatedValueTransferMemoWithRatio,
    TxFeeDelegatedValueTransferWithRatio, TxValueTransfer, TxValueTransferMemo,
};
