//! Signature triples and the envelopes that carry them on the wire.

use alloy_primitives::Bytes;

use crate::{
    error::{KlayTxError, KlayTxResult},
    rlp::RlpItem,
};

/// Upper bound on the byte length of `r` and `s`.
pub const MAX_SCALAR_LEN: usize = 32;

/// A `(v, r, s)` triple produced by an external signer.
///
/// The bytes are kept exactly as encoded so that a decoded transaction re-encodes identically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawSignature")]
pub struct KlaySignature {
    v: Bytes,
    r: Bytes,
    s: Bytes,
}

/// Unchecked serde form of [`KlaySignature`].
#[derive(serde::Deserialize)]
struct RawSignature {
    v: Bytes,
    r: Bytes,
    s: Bytes,
}

impl TryFrom<RawSignature> for KlaySignature {
    type Error = KlayTxError;

    fn try_from(raw: RawSignature) -> Result<Self, Self::Error> {
        Self::new(raw.v, raw.r, raw.s)
    }
}

impl KlaySignature {
    /// Creates a triple, checking presence of `v` and the width of `r` and `s`.
    pub fn new(v: impl Into<Bytes>, r: impl Into<Bytes>, s: impl Into<Bytes>) -> KlayTxResult<Self> {
        let (v, r, s) = (v.into(), r.into(), s.into());
        if v.is_empty() {
            return Err(KlayTxError::invalid("signature.v", "empty"));
        }
        for (field, scalar) in [("signature.r", &r), ("signature.s", &s)] {
            if scalar.len() > MAX_SCALAR_LEN {
                return Err(KlayTxError::invalid(
                    field,
                    format!("{} bytes exceeds {MAX_SCALAR_LEN}", scalar.len()),
                ));
            }
        }
        Ok(Self { v, r, s })
    }

    /// Recovery id, usually `chain_id * 2 + 35/36`.
    pub const fn v(&self) -> &Bytes {
        &self.v
    }

    /// `r` scalar.
    pub const fn r(&self) -> &Bytes {
        &self.r
    }

    /// `s` scalar.
    pub const fn s(&self) -> &Bytes {
        &self.s
    }

    fn to_rlp(&self) -> RlpItem {
        RlpItem::List(vec![
            RlpItem::Bytes(self.v.clone()),
            RlpItem::Bytes(self.r.clone()),
            RlpItem::Bytes(self.s.clone()),
        ])
    }

    fn from_rlp(item: &RlpItem) -> KlayTxResult<Self> {
        match item.as_list()? {
            [v, r, s] => Self::new(v.as_bytes()?.clone(), r.as_bytes()?.clone(), s.as_bytes()?.clone()),
            other => Err(alloy_rlp::Error::ListLengthMismatch { expected: 3, got: other.len() }.into()),
        }
    }
}

/// Ordered signatures of one signer role, encoded as `[[v, r, s], ...]`.
///
/// An empty envelope means that role has not signed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SignatureEnvelope(Vec<KlaySignature>);

impl SignatureEnvelope {
    /// An envelope holding no signatures.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// An envelope holding a single signature.
    pub fn single(signature: KlaySignature) -> Self {
        Self(vec![signature])
    }

    /// Returns `true` if nothing has been signed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of signatures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The signatures in wire order.
    pub fn signatures(&self) -> &[KlaySignature] {
        &self.0
    }

    pub(crate) fn to_rlp(&self) -> RlpItem {
        RlpItem::List(self.0.iter().map(KlaySignature::to_rlp).collect())
    }

    pub(crate) fn from_rlp(item: &RlpItem) -> KlayTxResult<Self> {
        item.as_list()?.iter().map(KlaySignature::from_rlp).collect::<Result<Vec<_>, _>>().map(Self)
    }
}

impl From<Vec<KlaySignature>> for SignatureEnvelope {
    fn from(signatures: Vec<KlaySignature>) -> Self {
        Self(signatures)
    }
}

impl From<KlaySignature> for SignatureEnvelope {
    fn from(signature: KlaySignature) -> Self {
        Self::single(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rlp;
    use alloy_primitives::hex;

    fn sample() -> KlaySignature {
        KlaySignature::new(
            hex!("0fe9").to_vec(),
            hex!("ecdec357060dbbb4bd3790e98b1733ec3a0b02b7e4ec7a5622f93cd9bee229fe").to_vec(),
            hex!("0a4a5e28753e7c1d999b286fb07933c5bf353079b8ed4d1ed509a838b48be02c").to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn envelope_nests_triples() {
        let envelope = SignatureEnvelope::from(vec![sample(), sample()]);
        let item = envelope.to_rlp();
        let triples = item.as_list().unwrap();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].as_list().unwrap().len(), 3);

        let decoded = SignatureEnvelope::from_rlp(&rlp::decode(&rlp::encode(&item)).unwrap()).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn empty_envelope_is_empty_list() {
        assert_eq!(rlp::encode(&SignatureEnvelope::empty().to_rlp()), vec![0xc0]);
    }

    #[test]
    fn rejects_bad_triples() {
        assert!(KlaySignature::new(Vec::new(), vec![1], vec![1]).is_err());
        assert!(KlaySignature::new(vec![1], vec![1; 33], vec![1]).is_err());
        assert!(KlaySignature::new(vec![1], vec![1], vec![1; 33]).is_err());

        let pair = RlpItem::List(vec![RlpItem::List(vec![
            RlpItem::bytes(vec![1]),
            RlpItem::bytes(vec![2]),
        ])]);
        assert_eq!(
            SignatureEnvelope::from_rlp(&pair).unwrap_err(),
            KlayTxError::MalformedEncoding(alloy_rlp::Error::ListLengthMismatch {
                expected: 3,
                got: 2
            })
        );

        // a bare triple without the outer envelope list
        let bare = sample().to_rlp();
        assert!(SignatureEnvelope::from_rlp(&bare).is_err());
    }

    #[test]
    fn deserialize_checks_triple() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(serde_json::from_str::<KlaySignature>(&json).unwrap(), sample());

        let empty_v = r#"{"v":"0x","r":"0x01","s":"0x01"}"#;
        assert!(serde_json::from_str::<KlaySignature>(empty_v).is_err());

        let wide_r = format!(r#"{{"v":"0x25","r":"0x{}","s":"0x01"}}"#, "11".repeat(33));
        assert!(serde_json::from_str::<KlaySignature>(&wide_r).is_err());

        let wide_s = format!(r#"[{{"v":"0x25","r":"0x01","s":"0x{}"}}]"#, "11".repeat(33));
        assert!(serde_json::from_str::<SignatureEnvelope>(&wide_s).is_err());
    }
}
