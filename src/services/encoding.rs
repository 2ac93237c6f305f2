use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;

use crate::error::Result;
use crate::model::record::StringRecord;
use crate::parsers::wts;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

/// Text of an uploaded file and how it was decoded.
#[derive(Debug, Serialize)]
pub struct DecodedText {
    pub text: String,
    pub encoding: String,
    pub had_bom: bool,
    pub had_errors: bool,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult> {
    let bytes = fs::read(path)?;
    Ok(detect_from_bytes(&bytes))
}

pub fn detect_from_bytes(bytes: &[u8]) -> EncodingDetectionResult {
    // Files saved by the world editor carry a UTF-8 BOM.
    if bytes.starts_with(UTF8_BOM) {
        return EncodingDetectionResult {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                EncodingCandidate {
                    name: "utf-8-sig".into(),
                    confidence: 0.99,
                },
                EncodingCandidate {
                    name: "utf-8".into(),
                    confidence: 0.90,
                },
            ],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![EncodingCandidate {
        name: best.clone(),
        confidence,
    }];

    // A BOM-less UTF-8 file may still be meant for tools that expect one.
    if best == "utf-8" {
        candidates.push(EncodingCandidate {
            name: "utf-8-sig".into(),
            confidence: (confidence - 0.20).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
    }
}

/// Decodes raw upload bytes, preferring UTF-8.
pub fn decode_upload(bytes: &[u8]) -> DecodedText {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        let (text, had_errors) = UTF_8.decode_without_bom_handling(rest);
        return DecodedText {
            text: text.into_owned(),
            encoding: "utf-8".into(),
            had_bom: true,
            had_errors,
        };
    }

    // Editor output without a BOM is still plain UTF-8 most of the time.
    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: "utf-8".into(),
            had_bom: false,
            had_errors: false,
        };
    }

    // Older maps were saved in the system code page.
    let encoding = guess(bytes);
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Upload is not clean {}; invalid bytes replaced", encoding.name());
    }

    DecodedText {
        text: text.into_owned(),
        encoding: encoding.name().to_lowercase(),
        had_bom: false,
        had_errors,
    }
}

/// Reads a WTS file from disk and parses it.
pub fn import_file(path: &Path) -> Result<(Vec<StringRecord>, DecodedText)> {
    let bytes = fs::read(path)?;
    let decoded = decode_upload(&bytes);
    let records = wts::parse(&decoded.text)?;

    tracing::debug!(
        "Imported {} records from {} ({})",
        records.len(),
        path.display(),
        decoded.encoding
    );
    Ok((records, decoded))
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Rough confidence for a guess: a clean decode scores by sample size.
fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    // Replacement characters mean the guess is probably wrong.
    if had_errors {
        return 0.35;
    }

    // Short files give the detector little to go on.
    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}
