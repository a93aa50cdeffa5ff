use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, bytes, hex, Address, Bytes, U256};
use alloy_rlp::Encodable;
use klay_abi::Function;
use klay_primitives::{
    address::{parse_address, to_hex},
    DecoderSettings, KlaySignature, KlayTxEnvelope, KlayTxError, KlayTxType, KlayTypedTransaction,
    SignatureEnvelope, TxCore, TxFeeDelegatedValueTransfer, TxFeeDelegatedValueTransferMemo,
    TxFeeDelegatedValueTransferMemoWithRatio, TxFeeDelegatedValueTransferWithRatio,
    TxRegistry, TxValueTransfer, TxValueTransferMemo,
};

const FROM: Address = address!("0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b");
const TO: Address = address!("0x7b65b75d204abed71587c9e519a89277766ee1d0");
const FEE_PAYER: Address = address!("0x5a0043070275d9f6054307ee7348bd660849d90f");

fn core() -> TxCore {
    TxCore::new(U256::from(1234), U256::from(25_000_000_000u64), U256::from(10_000_000), FROM)
}

fn signature(v: u8) -> KlaySignature {
    KlaySignature::new(
        vec![0x0f, v],
        hex!("ecdec357060dbbb4bd3790e98b1733ec3a0b02b7e4ec7a5622f93cd9bee229fe").to_vec(),
        hex!("0a4a5e28753e7c1d999b286fb07933c5bf353079b8ed4d1ed509a838b48be02c").to_vec(),
    )
    .unwrap()
}

fn memo() -> Bytes {
    let call = Function::new(
        "transfer",
        vec![DynSolValue::Address(TO), DynSolValue::Uint(U256::from(10), 256)],
    );
    klay_abi::encode(&call).unwrap()
}

fn unsigned() -> Vec<KlayTypedTransaction> {
    let value = U256::from(1_000_000_000_000_000_000u128);
    vec![
        TxValueTransfer::new(core(), TO, value).into(),
        TxFeeDelegatedValueTransfer::new(core(), TO, value).into(),
        TxFeeDelegatedValueTransferWithRatio::new(core(), TO, value, 30).unwrap().into(),
        TxValueTransferMemo::new(core(), TO, value, memo()).into(),
        TxFeeDelegatedValueTransferMemo::new(core(), TO, value, memo()).into(),
        TxFeeDelegatedValueTransferMemoWithRatio::new(core(), TO, value, memo(), 99)
            .unwrap()
            .into(),
    ]
}

fn every_signing_state() -> Vec<KlayTxEnvelope> {
    let mut out = Vec::new();
    for tx in unsigned() {
        let envelope = KlayTxEnvelope::new(tx.clone());
        out.push(envelope.clone());
        let signed = envelope.with_sender_signatures(vec![signature(0xe9), signature(0xea)]);
        out.push(signed.clone());
        if tx.is_fee_delegated() {
            out.push(signed.with_fee_payer(FEE_PAYER, signature(0xe9)).unwrap());
        }
    }
    out
}

#[test]
fn round_trip_every_variant() {
    for tx in every_signing_state() {
        let raw = tx.encode_2718();
        assert_eq!(raw[0], u8::from(tx.tx_type()));

        let decoded = KlayTxEnvelope::decode_2718(&raw).unwrap();
        assert_eq!(decoded, tx, "{}", tx.tx_type());
        assert_eq!(decoded.encode_2718(), raw);
        assert_eq!(decoded.tx_hash(), tx.tx_hash());
    }
}

#[test]
fn truncation_fails() {
    for tx in every_signing_state() {
        let raw = tx.encode_2718();
        let err = KlayTxEnvelope::decode_2718(&raw[..raw.len() - 1]).unwrap_err();
        assert!(err.is_decoding(), "{}: {err}", tx.tx_type());
        assert!(KlayTxEnvelope::decode_2718(&raw[..1]).is_err());
    }
}

#[test]
fn signature_triples_survive_intact() {
    let tx = KlayTxEnvelope::new(TxValueTransfer::new(core(), TO, U256::from(1)))
        .with_sender_signatures(signature(0xe9));
    let decoded = KlayTxEnvelope::decode_hex(&tx.to_raw_hex()).unwrap();
    let [sig] = decoded.sender_signatures().signatures() else {
        panic!("expected one signature");
    };
    assert_eq!(sig.v(), &bytes!("0fe9"));
    assert_eq!(sig.r(), signature(0xe9).r());
    assert_eq!(sig.s(), signature(0xe9).s());
}

#[test]
fn memo_payload_is_abi_call() {
    let tx = KlayTxEnvelope::new(TxValueTransferMemo::new(core(), TO, U256::ZERO, memo()));
    let decoded = KlayTxEnvelope::decode_2718(&tx.encode_2718()).unwrap();
    let payload = decoded.transaction().payload().unwrap();
    assert_eq!(payload[..4], hex!("a9059cbb"));
    assert_eq!(payload.len(), 68);
}

#[test]
fn fee_ratio_bounds() {
    for (ratio, ok) in [(0, false), (1, true), (99, true), (100, false)] {
        assert_eq!(
            TxFeeDelegatedValueTransferWithRatio::new(core(), TO, U256::ZERO, ratio).is_ok(),
            ok,
            "ratio {ratio}"
        );
        assert_eq!(
            TxFeeDelegatedValueTransferMemoWithRatio::new(core(), TO, U256::ZERO, memo(), ratio)
                .is_ok(),
            ok,
            "ratio {ratio}"
        );
    }
}

#[test]
fn zero_values_encode_as_empty_strings() {
    let tx = KlayTxEnvelope::new(TxValueTransfer::new(
        TxCore::new(U256::ZERO, U256::ZERO, U256::ZERO, FROM),
        TO,
        U256::ZERO,
    ));
    let raw = tx.encode_2718();
    // 47 payload bytes; zero quantities are 0x80; addresses are 0x94 + 20 bytes
    assert_eq!(raw[..6], [0x08u8, 0xef, 0x80, 0x80, 0x80, 0x94]);
    assert_eq!(KlayTxEnvelope::decode_2718(&raw).unwrap(), tx);
}

#[test]
fn address_hex_round_trip() {
    for tx in unsigned() {
        let text = to_hex(&tx.sender());
        assert_eq!(text, "0xa94f5374fce5edbc8e2a8697c15331677e6ebf0b");
        assert_eq!(parse_address(&text).unwrap(), tx.sender());
        assert_eq!(parse_address(&text.to_uppercase()[2..]).unwrap(), tx.sender());
    }
}

#[test]
fn custom_registry_from_settings() {
    let settings = DecoderSettings::from_toml_str("disabled_types = [0x10, 0x11, 0x12]").unwrap();
    let registry = TxRegistry::from_settings(&settings);

    for tx in every_signing_state() {
        let decoded = registry.decode_raw(&tx.encode_2718());
        if tx.tx_type().has_memo() {
            assert_eq!(decoded.unwrap_err(), KlayTxError::UnknownTypeTag(tx.tx_type().into()));
        } else {
            assert_eq!(decoded.unwrap(), tx);
        }
    }
}

#[test]
fn fee_payer_only_on_delegated_types() {
    for tx in unsigned() {
        let attached = KlayTxEnvelope::new(tx.clone()).with_fee_payer(FEE_PAYER, SignatureEnvelope::empty());
        assert_eq!(attached.is_ok(), tx.tx_type().is_fee_delegated(), "{}", tx.tx_type());
    }
    assert!(!KlayTxType::ValueTransferMemo.is_fee_delegated());
}

#[test]
fn serde_json_round_trip() {
    for tx in every_signing_state() {
        let json = serde_json::to_string(&tx).unwrap();
        let back: KlayTxEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}

/// `0x08` followed by `levels` nested list headers around an empty list.
fn deeply_nested(levels: usize) -> Vec<u8> {
    let mut headers = Vec::with_capacity(levels);
    let mut payload_length = 1;
    for _ in 0..levels {
        let mut header = Vec::new();
        alloy_rlp::Header { list: true, payload_length }.encode(&mut header);
        payload_length += header.len();
        headers.push(header);
    }
    let mut out = vec![0x08];
    for header in headers.iter().rev() {
        out.extend_from_slice(header);
    }
    out.push(0xc0);
    out
}

#[test]
fn deep_nesting_is_rejected() {
    let raw = deeply_nested(40_000);
    assert!(raw.len() <= DecoderSettings::default().max_raw_size);

    let result = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || KlayTxEnvelope::decode_2718(&raw))
        .unwrap()
        .join()
        .unwrap();
    assert!(matches!(
        result,
        Err(KlayTxError::MalformedEncoding(alloy_rlp::Error::Custom(_)))
    ));
}
