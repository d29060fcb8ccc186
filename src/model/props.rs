use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::plural::{plural_strings_from, PluralStrings};
use crate::model::resource::{
    Origin, Resource, ResourceArray, ResourceKind, ResourcePlural, ResourceString,
    DEFAULT_SOURCE_LOCALE,
};

fn default_true() -> bool {
    true
}

/// Plain property bag a resource is built from (and serialized back to).
///
/// Every field is optional on input. Unknown `state` values are ignored, the
/// same way `Resource::set_state_str` ignores them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,

    #[serde(default)]
    pub project: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_locale: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_locale: Option<String>,

    #[serde(default, alias = "reskey")]
    pub key: String,

    #[serde(default)]
    pub path_name: String,

    #[serde(default)]
    pub auto_key: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default)]
    pub origin: Origin,

    #[serde(default)]
    pub dnt: bool,

    #[serde(default = "default_true")]
    pub localize: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_array: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_array: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_strings: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_strings: Option<BTreeMap<String, String>>,
}

impl Default for ResourceProps {
    fn default() -> Self {
        Self {
            res_type: None,
            datatype: None,
            project: String::new(),
            context: None,
            source_locale: None,
            target_locale: None,
            key: String::new(),
            path_name: String::new(),
            auto_key: false,
            state: None,
            id: None,
            comment: None,
            origin: Origin::Source,
            dnt: false,
            localize: true,
            flavor: None,
            source_hash: None,
            source: None,
            target: None,
            source_array: None,
            target_array: None,
            source_strings: None,
            target_strings: None,
        }
    }
}

impl ResourceProps {
    pub fn string(key: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn res_type_name(&self) -> &str {
        self.res_type.as_deref().unwrap_or("string")
    }
}

fn from_plurals(map: &PluralStrings) -> BTreeMap<String, String> {
    map.iter()
        .map(|(cat, text)| (cat.as_str().to_string(), text.clone()))
        .collect()
}

impl Resource {
    /// Builds a string resource from a property bag.
    pub fn string_from_props(mut props: ResourceProps) -> Self {
        let mut body = ResourceString::new(props.source.take().unwrap_or_default());
        body.set_target(props.target.take());
        Self::from_props_with(props, ResourceKind::String(body))
    }

    /// Builds an array resource. The items are copied out of the bag.
    pub fn array_from_props(mut props: ResourceProps) -> Self {
        let mut body = ResourceArray::new(props.source_array.take().unwrap_or_default());
        body.set_target_array(props.target_array.take());
        Self::from_props_with(props, ResourceKind::Array(body))
    }

    pub fn plural_from_props(mut props: ResourceProps) -> Self {
        let source = props.source_strings.take().map(plural_strings_from).unwrap_or_default();
        let mut body = ResourcePlural::new(source);
        body.set_target_plurals(props.target_strings.take().map(plural_strings_from));
        Self::from_props_with(props, ResourceKind::Plural(body))
    }

    fn from_props_with(props: ResourceProps, kind: ResourceKind) -> Self {
        let mut r = Resource::new(props.key, kind)
            .with_project(props.project)
            .with_context(props.context.unwrap_or_default())
            .with_source_locale(
                props
                    .source_locale
                    .filter(|l| !l.is_empty())
                    .unwrap_or_else(|| DEFAULT_SOURCE_LOCALE.to_string()),
            )
            .with_target_locale(props.target_locale.unwrap_or_default())
            .with_path_name(props.path_name)
            .with_auto_key(props.auto_key)
            .with_datatype(props.datatype.unwrap_or_default())
            .with_flavor(props.flavor.unwrap_or_default())
            .with_dnt(props.dnt)
            .with_localize(props.localize)
            .with_origin(props.origin)
            .with_source_hash(props.source_hash.unwrap_or_default())
            .with_comment(props.comment.unwrap_or_default());

        if let Some(state) = props.state.as_deref() {
            r.set_state_str(state);
        }
        r.set_id(props.id);
        r
    }

    /// Property bag describing this resource.
    pub fn to_props(&self) -> ResourceProps {
        let mut props = ResourceProps {
            res_type: Some(self.res_type().as_str().to_string()),
            datatype: self.datatype().map(str::to_string),
            project: self.project().to_string(),
            context: self.context().map(str::to_string),
            source_locale: Some(self.source_locale().to_string()),
            target_locale: self.target_locale().map(str::to_string),
            key: self.key().to_string(),
            path_name: self.path_name().to_string(),
            auto_key: self.auto_key(),
            state: self.state().map(|s| s.as_str().to_string()),
            id: self.id(),
            comment: self.comment().map(str::to_string),
            origin: self.origin(),
            dnt: self.dnt(),
            localize: self.localize(),
            flavor: self.flavor().map(str::to_string),
            source_hash: self.stored_source_hash().map(str::to_string),
            ..Default::default()
        };

        match self.kind() {
            ResourceKind::String(s) => {
                props.source = Some(s.source().to_string());
                props.target = s.target().map(str::to_string);
            }
            ResourceKind::Array(a) => {
                props.source_array = Some(a.source_array());
                props.target_array = a.target_array();
            }
            ResourceKind::Plural(p) => {
                props.source_strings = Some(from_plurals(p.source_plurals()));
                props.target_strings = p.target_plurals().map(from_plurals);
            }
        }

        props
    }
}
