use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CLDR plural category.
///
/// Variants are declared in CLDR canonical order so that ordered maps keyed by
/// category iterate `zero, one, two, few, many, other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PluralCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

/// Category -> text mapping of a plural resource.
pub type PluralStrings = BTreeMap<PluralCategory, String>;

/// Builds a plural map from loosely typed category names.
///
/// Unknown category names are dropped with a warning.
pub fn plural_strings_from<I, K, V>(pairs: I) -> PluralStrings
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut out = PluralStrings::new();
    for (k, v) in pairs {
        match k.as_ref().parse::<PluralCategory>() {
            Ok(cat) => {
                out.insert(cat, v.into());
            }
            Err(()) => {
                tracing::warn!("[Plural] dropping unknown plural category '{}'", k.as_ref());
            }
        }
    }
    out
}
