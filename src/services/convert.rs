//! Conversion between plural resources and ICU plural strings, for systems
//! that only store plain strings.

use tracing::warn;

use crate::error::Result;
use crate::model::plural::{PluralCategory, PluralStrings};
use crate::model::resource::{Resource, ResourceKind, ResourcePlural, ResourceString};
use crate::parsers::icu::{self, Element};

const ICU_PLURAL_ARG: &str = "count";

/// Renders a category map as `{count, plural, one {..} other {..}}`.
pub fn plurals_to_icu(plurals: &PluralStrings) -> String {
    let options: Vec<String> = plurals
        .iter()
        .map(|(cat, text)| format!("{cat} {{{text}}}"))
        .collect();
    format!("{{{ICU_PLURAL_ARG}, plural, {}}}", options.join(" "))
}

/// Converts a plural resource into an ICU-syntax string resource.
///
/// Source and target are converted independently, so their category sets
/// may differ. Returns `None` for resources that are not plurals.
pub fn plural_to_icu(resource: &Resource) -> Option<Resource> {
    let plural = resource.as_plural()?;

    let mut body = ResourceString::new(plurals_to_icu(plural.source_plurals()));
    body.set_target(plural.target_plurals().map(plurals_to_icu));

    Some(resource.with_kind(ResourceKind::String(body)))
}

/// Converts a string resource whose source is an ICU plural back into a
/// plural resource.
///
/// Returns `None` for non-string resources, for ordinary strings, and for
/// malformed ICU text (which is logged).
pub fn icu_to_plural(resource: &Resource) -> Option<Resource> {
    let string = resource.as_string()?;

    let source = match icu_plural_categories(string.source()) {
        Ok(Some(map)) => map,
        Ok(None) => return None,
        Err(e) => {
            warn!("[Convert] cannot parse source of '{}': {e}", resource.key());
            return None;
        }
    };

    let target = match string.target() {
        None => None,
        Some(text) => match icu_plural_categories(text) {
            Ok(Some(map)) => Some(map),
            Ok(None) => {
                warn!(
                    "[Convert] target of '{}' is not a plural, dropping it",
                    resource.key()
                );
                None
            }
            Err(e) => {
                warn!("[Convert] cannot parse target of '{}': {e}", resource.key());
                return None;
            }
        },
    };

    let mut body = ResourcePlural::new(source);
    body.set_target_plurals(target);
    Some(resource.with_kind(ResourceKind::Plural(body)))
}

/// Extracts the category map of a message consisting of a single plural
/// argument (surrounding whitespace allowed).
///
/// `Ok(None)` means the text is valid but not a plural message.
pub fn icu_plural_categories(text: &str) -> Result<Option<PluralStrings>> {
    if !text.contains("plural") && !text.contains("selectordinal") {
        return Ok(None);
    }

    let elements = icu::parse(text)?;

    let mut plural = None;
    for el in &elements {
        match el {
            Element::Literal(s) if s.trim().is_empty() => {}
            Element::Plural { options, .. } if plural.is_none() => plural = Some(options),
            _ => return Ok(None),
        }
    }

    let Some(options) = plural else {
        return Ok(None);
    };

    let mut out = PluralStrings::new();
    let mut explicit = Vec::new();

    for opt in options {
        match opt.selector.parse::<PluralCategory>() {
            Ok(cat) => {
                out.insert(cat, opt.raw.clone());
            }
            Err(()) => match explicit_category(&opt.selector) {
                Some(cat) => explicit.push((cat, opt.raw.clone())),
                None => warn!("[Convert] dropping plural selector '{}'", opt.selector),
            },
        }
    }

    // named categories take precedence over =N selectors
    for (cat, raw) in explicit {
        out.entry(cat).or_insert(raw);
    }

    Ok(Some(out))
}

fn explicit_category(selector: &str) -> Option<PluralCategory> {
    match selector {
        "=0" => Some(PluralCategory::Zero),
        "=1" => Some(PluralCategory::One),
        "=2" => Some(PluralCategory::Two),
        _ => None,
    }
}
