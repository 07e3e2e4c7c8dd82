//! Language detection.

use summed_core::{Error, Result};
use tracing::debug;

/// Detects the language of a text, returning a two-letter code.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Result<String>;
}

/// Trigram-based detection backed by `whatlang`.
#[derive(Debug, Default, Clone)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::LanguageDetection("cannot detect language of empty text".into()));
        }
        let info = whatlang::detect(text)
            .ok_or_else(|| Error::LanguageDetection("no language features found in text".into()))?;
        let code = iso639_1(info.lang().code()).ok_or_else(|| {
            Error::LanguageDetection(format!(
                "detected language '{}' has no two-letter code",
                info.lang().code()
            ))
        })?;
        debug!(
            "whatlang: {} (confidence={:.2}, reliable={})",
            code,
            info.confidence(),
            info.is_reliable()
        );
        Ok(code.to_string())
    }
}

/// Map an ISO 639-3 code reported by `whatlang` to ISO 639-1.
///
/// Codes without a known two-letter form return `None`; truncating them
/// would name a different language (`est` is not `es`).
fn iso639_1(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        // Norwegian Bokmål and Nynorsk share the macrolanguage code.
        "nob" | "nno" => "no",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(mapped)
}

/// Always reports the same language. Useful for pinned deployments.
#[derive(Debug, Clone)]
pub struct FixedDetector {
    code: String,
}

impl FixedDetector {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl LanguageDetector for FixedDetector {
    fn detect(&self, _text: &str) -> Result<String> {
        Ok(self.code.clone())
    }
}
