use unic_langid::LanguageIdentifier;

use crate::error::{Error, Result};

/// ISO 639-1 two-letter language codes.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// A validated `language[-Script][-REGION]` locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSpec(LanguageIdentifier);

impl LocaleSpec {
    pub fn language(&self) -> &str {
        self.0.language.as_str()
    }

    pub fn script(&self) -> Option<&str> {
        self.0.script.as_ref().map(|s| s.as_str())
    }

    pub fn region(&self) -> Option<&str> {
        self.0.region.as_ref().map(|r| r.as_str())
    }

    pub fn langid(&self) -> &LanguageIdentifier {
        &self.0
    }

    /// Canonical BCP-47 form, e.g. `zh-Hant-TW`.
    pub fn to_tag(&self) -> String {
        self.0.to_string()
    }
}

/// Parses a locale spec. Underscores are accepted as separators and subtag
/// case is canonicalized.
///
/// Two-letter languages must be ISO 639-1 codes; three-letter codes
/// (ISO 639-2/3, including the `zxx` pseudo-language) are checked for shape
/// only. Variants and longer language subtags are rejected.
pub fn parse_locale(spec: &str) -> Result<LocaleSpec> {
    let invalid = || Error::InvalidLocale(spec.to_string());
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let langid: LanguageIdentifier = trimmed.parse().map_err(|_| invalid())?;
    let language = langid.language.as_str();
    let known = match language.len() {
        2 => ISO_639_1.contains(&language),
        3 => language != "und",
        _ => false,
    };
    if !known || langid.variants().next().is_some() {
        return Err(invalid());
    }

    Ok(LocaleSpec(langid))
}

pub fn is_valid_locale(spec: &str) -> bool {
    parse_locale(spec).is_ok()
}
