use serde::{Deserialize, Serialize};

use crate::model::resource::Resource;

/// A criterion value: a single value, or a list matched with OR semantics.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            OneOrMany::One(v) => v == value,
            OneOrMany::Many(vs) => vs.iter().any(|v| v == value),
        }
    }

    /// The value when exactly one was given.
    pub fn single(&self) -> Option<&str> {
        match self {
            OneOrMany::One(v) => Some(v),
            OneOrMany::Many(vs) if vs.len() == 1 => Some(&vs[0]),
            OneOrMany::Many(_) => None,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            OneOrMany::One(v) => vec![v.as_str()],
            OneOrMany::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(v: &str) -> Self {
        OneOrMany::One(v.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(v: String) -> Self {
        OneOrMany::One(v)
    }
}

impl<S: Into<String>> From<Vec<S>> for OneOrMany {
    fn from(vs: Vec<S>) -> Self {
        OneOrMany::Many(vs.into_iter().map(Into::into).collect())
    }
}

/// Field filters for `TranslationSet::get_by` and `remove`.
///
/// Every present field must match (AND). The root context and an absent
/// target locale are matched by the empty string. `locale` matches the
/// effective locale (target, else source).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_locale: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_locale: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "reskey")]
    pub key: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub res_type: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_name: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flavor: Option<OneOrMany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_key: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnt: Option<bool>,
}

fn field_matches(criterion: &Option<OneOrMany>, value: &str) -> bool {
    criterion.as_ref().map_or(true, |c| c.matches(value))
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, v: impl Into<OneOrMany>) -> Self {
        self.project = Some(v.into());
        self
    }

    pub fn context(mut self, v: impl Into<OneOrMany>) -> Self {
        self.context = Some(v.into());
        self
    }

    pub fn source_locale(mut self, v: impl Into<OneOrMany>) -> Self {
        self.source_locale = Some(v.into());
        self
    }

    pub fn target_locale(mut self, v: impl Into<OneOrMany>) -> Self {
        self.target_locale = Some(v.into());
        self
    }

    pub fn locale(mut self, v: impl Into<OneOrMany>) -> Self {
        self.locale = Some(v.into());
        self
    }

    pub fn key(mut self, v: impl Into<OneOrMany>) -> Self {
        self.key = Some(v.into());
        self
    }

    pub fn res_type(mut self, v: impl Into<OneOrMany>) -> Self {
        self.res_type = Some(v.into());
        self
    }

    pub fn state(mut self, v: impl Into<OneOrMany>) -> Self {
        self.state = Some(v.into());
        self
    }

    pub fn path_name(mut self, v: impl Into<OneOrMany>) -> Self {
        self.path_name = Some(v.into());
        self
    }

    pub fn matches(&self, r: &Resource) -> bool {
        field_matches(&self.project, r.project())
            && field_matches(&self.context, r.context().unwrap_or(""))
            && field_matches(&self.source_locale, r.source_locale())
            && field_matches(&self.target_locale, r.target_locale().unwrap_or(""))
            && field_matches(&self.locale, r.locale())
            && field_matches(&self.key, r.key())
            && field_matches(&self.res_type, r.res_type().as_str())
            && field_matches(&self.state, r.state().map_or("", |s| s.as_str()))
            && field_matches(&self.path_name, r.path_name())
            && field_matches(&self.datatype, r.datatype().unwrap_or(""))
            && field_matches(&self.flavor, r.flavor().unwrap_or(""))
            && self.auto_key.map_or(true, |v| v == r.auto_key())
            && self.dnt.map_or(true, |v| v == r.dnt())
    }

    /// Whether the criteria pin down a single identity: one project, one key
    /// and one locale (any of `locale`, `sourceLocale`, `targetLocale`).
    pub fn identifies_single(&self) -> bool {
        let single = |c: &Option<OneOrMany>| c.as_ref().and_then(OneOrMany::single).is_some();
        let context_ok = self.context.as_ref().map_or(true, |c| c.single().is_some());

        single(&self.project)
            && single(&self.key)
            && (single(&self.locale) || single(&self.source_locale) || single(&self.target_locale))
            && context_ok
    }

    /// Copy with the context defaulted to root when absent, used to resolve
    /// a removal target.
    pub(crate) fn with_root_context_default(&self) -> Self {
        let mut c = self.clone();
        if c.context.is_none() {
            c.context = Some(OneOrMany::One(String::new()));
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_values_use_or_semantics() {
        let r = Resource::new_string("k", "v").with_target_locale("de-DE");
        let c = Criteria::new().target_locale(vec!["en-US", "de-DE"]);
        assert!(c.matches(&r));
        let c = Criteria::new().target_locale(vec!["fr-FR"]);
        assert!(!c.matches(&r));
    }

    #[test]
    fn empty_list_matches_nothing() {
        let r = Resource::new_string("k", "v");
        let c = Criteria::new().key(Vec::<String>::new());
        assert!(!c.matches(&r));
    }

    #[test]
    fn root_context_matches_empty_string() {
        let r = Resource::new_string("k", "v");
        assert!(Criteria::new().context("").matches(&r));
        assert!(!Criteria::new().context("x").matches(&r));
    }

    #[test]
    fn deserializes_scalar_and_list_values() {
        let c: Criteria =
            serde_json::from_str(r#"{"reskey": "a", "targetLocale": ["en-US", "de-DE"]}"#)
                .expect("valid json");
        assert_eq!(c.key, Some(OneOrMany::One("a".into())));
        assert_eq!(c.target_locale.as_ref().map(OneOrMany::values), Some(vec!["en-US", "de-DE"]));
    }

    #[test]
    fn identification_requires_project_key_and_locale() {
        assert!(!Criteria::new().res_type("string").identifies_single());
        assert!(!Criteria::new().project("p").key("k").identifies_single());
        assert!(Criteria::new().project("p").key("k").locale("de-DE").identifies_single());
        assert!(!Criteria::new()
            .project("p")
            .key("k")
            .locale(vec!["de-DE", "fr-FR"])
            .identifies_single());
    }
}
