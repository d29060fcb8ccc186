use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub had_bom: bool,
}

/// Guesses the encoding of an exchange file's bytes.
pub fn detect(bytes: &[u8]) -> EncodingDetectionResult {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return EncodingDetectionResult {
            best: encoding.name().to_lowercase(),
            confidence: 0.99,
            had_bom: true,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);

    let encoding = detector.guess(None, true);
    EncodingDetectionResult {
        best: encoding.name().to_lowercase(),
        confidence: estimate_confidence(bytes, encoding),
        had_bom: false,
    }
}

/// Decodes bytes to text, honoring a BOM and otherwise guessing.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let detected = detect(bytes);
    let encoding = Encoding::for_label(detected.best.as_bytes())
        .ok_or_else(|| Error::Encoding(format!("unknown encoding '{}'", detected.best)))?;

    // decode() strips a matching BOM
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "[Encoding] lossy decode as {} (confidence {:.2})",
            detected.best,
            detected.confidence
        );
    }
    Ok(text.into_owned())
}

pub fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

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
