//! Subasset issuances (message ids 21 and 23)

use crate::common::{
    decode, stamp_description, subasset_message, Issuance, TxBuilder, PNG_B64,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use stamp_decoder::decoder::DecoderError;
use stamp_decoder::types::content_detection::StampMime;
use stamp_decoder::types::counterparty::{AssetIssuance, SUBASSET_ACTIVATION_HEIGHT};
use stamp_decoder::types::stamps::StampEncoding;

#[test]
fn test_subasset_classic_stamp() {
    let message = subasset_message(
        23,
        &Issuance::stamp(95_000_000_000_000_001),
        "STAMPY.genesis-01",
        &stamp_description(PNG_B64),
    );
    let tx = TxBuilder::new(0x31, 800_000).op_return(&message).build();

    let record = decode(&tx).unwrap().expect("stamp record");
    let AssetIssuance::Subasset(subasset) = &record.issuance else {
        panic!("Expected subasset issuance");
    };
    assert_eq!(subasset.subasset_name, "STAMPY.genesis-01");
    assert_eq!(subasset.issuance.asset_id, "A95000000000000001");
    assert_eq!(record.issuance.subasset_name(), Some("STAMPY.genesis-01"));
    assert_eq!(record.mime(), Some(StampMime::Png));
}

#[test]
fn test_subasset_before_activation_is_absent() {
    let message = subasset_message(21, &Issuance::stamp(7), "A.b", &stamp_description(PNG_B64));
    let tx = TxBuilder::new(0x32, SUBASSET_ACTIVATION_HEIGHT - 1)
        .op_return(&message)
        .build();
    assert!(decode(&tx).unwrap().is_none());

    let tx = TxBuilder::new(0x32, SUBASSET_ACTIVATION_HEIGHT)
        .op_return(&message)
        .build();
    assert!(decode(&tx).unwrap().is_some());
}

#[test]
fn test_subasset_olga_stamp() {
    let png = STANDARD.decode(PNG_B64).unwrap();
    let message = subasset_message(21, &Issuance::stamp(8), "PARENT.child", b"stamp:");
    let tx = TxBuilder::new(0x33, 840_000)
        .op_return(&message)
        .olga(&png, 330)
        .build();

    let content = decode(&tx).unwrap().unwrap().content.unwrap();
    assert_eq!(content.encoding, StampEncoding::Olga);
    assert_eq!(content.mime_type, StampMime::Png);
}

#[test]
fn test_subasset_name_length_out_of_range() {
    let mut message = b"CNTRPRTY".to_vec();
    message.push(23);
    message.extend_from_slice(&Issuance::stamp(9).fixed_fields());
    message.push(40);
    message.extend_from_slice(&[0x01, 0x02, 0x03]);
    let tx = TxBuilder::new(0x34, 800_000).op_return(&message).build();

    assert!(matches!(
        decode(&tx),
        Err(DecoderError::SubassetLength {
            declared: 40,
            available: 3
        })
    ));
}
