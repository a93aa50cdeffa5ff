//! Canonical RLP codec over an untyped item tree.
//!
//! Transactions are decoded into an [`RlpItem`] tree first so that the variant parsers can look at
//! the number of top-level fields before interpreting them. Header handling is delegated to
//! [`alloy_rlp::Header`], which rejects every non-canonical length form.

use alloy_primitives::{Address, Bytes, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, Error as DecodeError, Header};

use crate::error::{KlayTxError, KlayTxResult};

/// Maximum byte length of an encoded quantity.
pub const MAX_QUANTITY_LEN: usize = 32;

/// Byte length of an encoded address.
pub const ADDRESS_LEN: usize = 20;

/// Deepest list nesting accepted by the decoder. Transactions nest three levels.
pub const MAX_DEPTH: usize = 16;

/// A decoded RLP value: either a byte string or a list of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Bytes),
    /// A list of nested items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Canonical quantity: minimal big-endian bytes, zero as the empty string.
    pub fn quantity(value: U256) -> Self {
        Self::Bytes(value.to_be_bytes_trimmed_vec().into())
    }

    /// A 20-byte address string.
    pub fn address(address: &Address) -> Self {
        Self::Bytes(Bytes::copy_from_slice(address.as_slice()))
    }

    /// An arbitrary byte string.
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Returns the raw bytes of a string item.
    pub fn as_bytes(&self) -> KlayTxResult<&Bytes> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::List(_) => Err(DecodeError::UnexpectedList.into()),
        }
    }

    /// Returns the children of a list item.
    pub fn as_list(&self) -> KlayTxResult<&[RlpItem]> {
        match self {
            Self::List(items) => Ok(items),
            Self::Bytes(_) => Err(DecodeError::UnexpectedString.into()),
        }
    }

    /// Interprets a string item as a canonical quantity.
    pub fn as_quantity(&self) -> KlayTxResult<U256> {
        let bytes = self.as_bytes()?;
        if bytes.first() == Some(&0) {
            return Err(DecodeError::LeadingZero.into());
        }
        U256::try_from_be_slice(bytes).ok_or_else(|| {
            KlayTxError::invalid(
                "quantity",
                format!("{} bytes exceeds {MAX_QUANTITY_LEN}", bytes.len()),
            )
        })
    }

    /// Interprets a string item as a 20-byte address.
    pub fn as_address(&self) -> KlayTxResult<Address> {
        let bytes = self.as_bytes()?;
        if bytes.len() != ADDRESS_LEN {
            return Err(KlayTxError::invalid(
                "address",
                format!("expected 20 bytes, got {}", bytes.len()),
            ));
        }
        Ok(Address::from_slice(bytes))
    }

    /// Returns `true` if the item is a list.
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    fn payload_length(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes[..].length(),
            Self::List(items) => items.iter().map(Encodable::length).sum(),
        }
    }
}

impl From<Vec<RlpItem>> for RlpItem {
    fn from(items: Vec<RlpItem>) -> Self {
        Self::List(items)
    }
}

impl Encodable for RlpItem {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Bytes(bytes) => bytes[..].encode(out),
            Self::List(items) => {
                Header { list: true, payload_length: self.payload_length() }.encode(out);
                for item in items {
                    item.encode(out);
                }
            }
        }
    }

    fn length(&self) -> usize {
        match self {
            // `[u8]` already accounts for its own header
            Self::Bytes(_) => self.payload_length(),
            Self::List(_) => {
                let payload_length = self.payload_length();
                Header { list: true, payload_length }.length_with_payload()
            }
        }
    }
}

impl RlpItem {
    fn decode_nested(buf: &mut &[u8], depth: usize) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        let (payload, rest) = buf.split_at(header.payload_length);
        *buf = rest;

        if !header.list {
            return Ok(Self::Bytes(Bytes::copy_from_slice(payload)));
        }
        if depth >= MAX_DEPTH {
            return Err(DecodeError::Custom("list nesting too deep"));
        }

        let mut payload = payload;
        let mut items = Vec::new();
        while !payload.is_empty() {
            items.push(Self::decode_nested(&mut payload, depth + 1)?);
        }
        Ok(Self::List(items))
    }
}

impl Decodable for RlpItem {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::decode_nested(buf, 0)
    }
}

/// Encodes a single item.
pub fn encode(item: &RlpItem) -> Vec<u8> {
    let mut out = Vec::with_capacity(item.length());
    item.encode(&mut out);
    out
}

/// Encodes `items` as one list.
pub fn encode_list(items: &[RlpItem]) -> Vec<u8> {
    let payload_length = items.iter().map(Encodable::length).sum();
    let header = Header { list: true, payload_length };
    let mut out = Vec::with_capacity(header.length_with_payload());
    header.encode(&mut out);
    for item in items {
        item.encode(&mut out);
    }
    out
}

/// Decodes exactly one item, rejecting trailing bytes.
pub fn decode(bytes: &[u8]) -> KlayTxResult<RlpItem> {
    let mut buf = bytes;
    let item = RlpItem::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(DecodeError::UnexpectedLength.into());
    }
    Ok(item)
}

/// Decodes exactly one list item and returns its children.
pub fn decode_list(bytes: &[u8]) -> KlayTxResult<Vec<RlpItem>> {
    match decode(bytes)? {
        RlpItem::List(items) => Ok(items),
        RlpItem::Bytes(_) => Err(DecodeError::UnexpectedString.into()),
    }
}
