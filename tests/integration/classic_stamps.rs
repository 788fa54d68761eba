//! Classic stamps: `stamp:` descriptions carried by OP_RETURN or multisig

use crate::common::{
    decode, issuance_message, stamp_description, Issuance, TxBuilder, DUST_ADDRESS, GIF_B64,
    PNG_B64,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use stamp_decoder::decoder::content::VIDEO_NOTE;
use stamp_decoder::decoder::DecoderError;
use stamp_decoder::types::content_detection::StampMime;
use stamp_decoder::types::stamps::{Compression, StampEncoding};
use std::io::Write;

#[test]
fn test_op_return_png_stamp() {
    let message = issuance_message(
        22,
        &Issuance::stamp(95_428_956_661_682_177),
        &stamp_description(PNG_B64),
    );
    let tx = TxBuilder::new(0x11, 790_000)
        .dust(7800)
        .op_return(&message)
        .build();

    let record = decode(&tx).unwrap().expect("stamp record");
    assert_eq!(record.asset_id(), "A95428956661682177");
    assert_eq!(record.bitcoin_data.block_height, 790_000);
    assert_eq!(record.bitcoin_data.recipient.as_deref(), Some(DUST_ADDRESS));
    assert_eq!(record.bitcoin_data.dust_btc.as_deref(), Some("0.00007800"));

    let content = record.content.as_ref().unwrap();
    assert_eq!(content.encoding, StampEncoding::Classic);
    assert_eq!(content.mime_type, StampMime::Png);

    let artifact = record.artifact().unwrap().unwrap();
    assert_eq!(artifact.extension(), "png");
    assert_eq!(artifact.bytes, STANDARD.decode(PNG_B64).unwrap());
}

#[test]
fn test_plaintext_multisig_gif_stamp() {
    let message = issuance_message(20, &Issuance::stamp(4_000_000), &stamp_description(GIF_B64));
    let tx = TxBuilder::new(0x12, 785_000)
        .plaintext_multisig(&message)
        .build();

    let record = decode(&tx).unwrap().expect("stamp record");
    let content = record.content.unwrap();
    assert_eq!(content.mime_type, StampMime::Gif);
    assert_eq!(content.encoding, StampEncoding::Classic);
    assert_eq!(record.bitcoin_data.recipient, None);
}

#[test]
fn test_ciphered_multisig_stamp() {
    let message = issuance_message(22, &Issuance::stamp(4_000_001), &stamp_description(PNG_B64));
    let tx = TxBuilder::new(0x13, 785_000)
        .dust(5430)
        .ciphered_multisig(&message)
        .change(120_000)
        .build();

    let record = decode(&tx).unwrap().expect("stamp record");
    let content = record.content.unwrap();
    assert_eq!(content.encoding, StampEncoding::Multisig);
    assert_eq!(content.mime_type, StampMime::Png);
    assert_eq!(content.payload_base64, PNG_B64);
}

#[test]
fn test_gzipped_html_with_video_is_retagged() {
    let html = r#"<html><body><video controls src="clips/first take.mp4"></video></body></html>"#;
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(html.as_bytes()).unwrap();
    let gz_b64 = STANDARD.encode(encoder.finish().unwrap());
    assert!(gz_b64.starts_with("H4sI"));

    let message = issuance_message(22, &Issuance::stamp(4_000_002), &stamp_description(&gz_b64));
    let tx = TxBuilder::new(0x14, 800_000).op_return(&message).build();

    let content = decode(&tx).unwrap().unwrap().content.unwrap();
    assert_eq!(content.compression, Compression::Gzip);
    assert_eq!(content.mime_type, StampMime::Mp4);
    assert_eq!(content.video_src.as_deref(), Some("clips/first%20take.mp4"));
    assert_eq!(content.note.as_deref(), Some(VIDEO_NOTE));
    assert_eq!(STANDARD.decode(&content.payload_base64).unwrap(), html.as_bytes());
}

#[test]
fn test_whitespace_and_missing_padding_are_tolerated() {
    let ragged = format!("{}\n {}", &PNG_B64[..40], PNG_B64[40..].trim_end_matches('='));
    let message = issuance_message(22, &Issuance::stamp(4_000_003), &stamp_description(&ragged));
    let tx = TxBuilder::new(0x15, 800_000).op_return(&message).build();

    let content = decode(&tx).unwrap().unwrap().content.unwrap();
    assert_eq!(content.payload_base64, PNG_B64);
}

#[test]
fn test_plain_issuance_has_no_content() {
    let issuance = Issuance {
        asset_id: 4_000_004,
        quantity: 21_000_000,
        divisible: true,
        locked: false,
        reset: false,
    };
    let message = issuance_message(20, &issuance, b"community token");
    let tx = TxBuilder::new(0x16, 800_000).op_return(&message).build();

    let record = decode(&tx).unwrap().unwrap();
    assert_eq!(record.content, None);
    assert_eq!(record.description.as_deref(), Some("community token"));
    assert_eq!(record.artifact().unwrap(), None);
    assert_eq!(record.issuance.record().quantity, 21_000_000);
    assert!(record.issuance.record().divisible);
}

#[test]
fn test_missing_first_input_is_absent() {
    let message = issuance_message(22, &Issuance::stamp(4_000_005), &stamp_description(PNG_B64));
    let tx = TxBuilder::new(0x17, 800_000)
        .without_inputs()
        .op_return(&message)
        .build();
    assert!(decode(&tx).unwrap().is_none());
}

#[test]
fn test_other_message_types_are_absent() {
    // Message id 0 is a send
    let mut message = b"CNTRPRTY".to_vec();
    message.push(0);
    message.extend_from_slice(&[0u8; 24]);
    let tx = TxBuilder::new(0x18, 800_000).op_return(&message).build();
    assert!(decode(&tx).unwrap().is_none());
}

#[test]
fn test_invalid_base64_is_decoder_error() {
    let message = issuance_message(22, &Issuance::stamp(4_000_006), b"stamp:iVBOR*w0KG");
    let tx = TxBuilder::new(0x19, 800_000).op_return(&message).build();
    assert!(matches!(decode(&tx), Err(DecoderError::Base64(_))));
}
