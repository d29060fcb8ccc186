use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::plural::{PluralCategory, PluralStrings};
use crate::services::{hash, normalize};

pub const DEFAULT_SOURCE_LOCALE: &str = "en-US";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResType {
    #[default]
    String,
    Array,
    Plural,
}

impl ResType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResType::String => "string",
            ResType::Array => "array",
            ResType::Plural => "plural",
        }
    }

    /// Prefix used when building hash keys.
    pub fn tag(self) -> &'static str {
        match self {
            ResType::String => "rs",
            ResType::Array => "ra",
            ResType::Plural => "rp",
        }
    }
}

impl fmt::Display for ResType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ResType::String),
            "array" => Ok(ResType::Array),
            "plural" => Ok(ResType::Plural),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    New,
    Translated,
    Accepted,
}

impl ResourceState {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceState::New => "new",
            ResourceState::Translated => "translated",
            ResourceState::Accepted => "accepted",
        }
    }
}

impl FromStr for ResourceState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ResourceState::New),
            "translated" => Ok(ResourceState::Translated),
            "accepted" => Ok(ResourceState::Accepted),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Source,
    Target,
}

/// Escapes the key separator so that distinct tuples cannot join to the
/// same key. Components without `_` or a backslash are left as they are.
fn escape_component(part: &str) -> std::borrow::Cow<'_, str> {
    if part.contains(|c| c == '_' || c == '\\') {
        part.replace('\\', "\\\\").replace('_', "\\_").into()
    } else {
        part.into()
    }
}

/// Builds the hash key for a resource identity tuple.
///
/// The flavor is appended only when present so that unflavored keys keep the
/// plain `tag_project_context_locale_key` shape.
pub fn hash_key_for(
    res_type: ResType,
    project: &str,
    context: Option<&str>,
    locale: &str,
    key: &str,
    flavor: Option<&str>,
) -> String {
    let mut parts = vec![
        res_type.tag().into(),
        escape_component(project),
        escape_component(context.unwrap_or("")),
        escape_component(locale),
        escape_component(key),
    ];
    if let Some(f) = flavor.filter(|f| !f.is_empty()) {
        parts.push(escape_component(f));
    }
    parts.join("_")
}

/// Same as [`hash_key_for`] with internal whitespace in the key collapsed.
pub fn clean_hash_key_for(
    res_type: ResType,
    project: &str,
    context: Option<&str>,
    locale: &str,
    key: &str,
    flavor: Option<&str>,
) -> String {
    let cleaned = normalize::collapse_whitespace(key);
    hash_key_for(res_type, project, context, locale, &cleaned, flavor)
}

/// A single translatable string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceString {
    source: String,
    target: Option<String>,
}

impl ResourceString {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: Option<String>) {
        self.target = target;
    }

    pub fn size(&self) -> usize {
        1
    }
}

/// An ordered list of translatable strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceArray {
    source: Vec<String>,
    target: Option<Vec<String>>,
}

impl ResourceArray {
    pub fn new<I, S>(source: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into_iter().map(Into::into).collect(),
            target: None,
        }
    }

    /// Borrowed view of the source items.
    pub fn source_items(&self) -> &[String] {
        &self.source
    }

    /// Owned copy of the source items.
    pub fn source_array(&self) -> Vec<String> {
        self.source.clone()
    }

    pub fn target_items(&self) -> Option<&[String]> {
        self.target.as_deref()
    }

    pub fn target_array(&self) -> Option<Vec<String>> {
        self.target.clone()
    }

    pub fn set_source_array(&mut self, items: Vec<String>) {
        self.source = items;
    }

    pub fn set_target_array(&mut self, items: Option<Vec<String>>) {
        self.target = items;
    }

    pub fn source_item(&self, index: usize) -> Option<&str> {
        self.source.get(index).map(String::as_str)
    }

    pub fn target_item(&self, index: usize) -> Option<&str> {
        self.target.as_ref()?.get(index).map(String::as_str)
    }

    /// Sets a source item, padding with empty strings when `index` is past the end.
    pub fn set_source_item(&mut self, index: usize, text: impl Into<String>) {
        set_padded(&mut self.source, index, text.into());
    }

    pub fn set_target_item(&mut self, index: usize, text: impl Into<String>) {
        let target = self.target.get_or_insert_with(Vec::new);
        set_padded(target, index, text.into());
    }

    pub fn size(&self) -> usize {
        let t = self.target.as_ref().map_or(0, Vec::len);
        self.source.len().max(t)
    }
}

fn set_padded(items: &mut Vec<String>, index: usize, text: String) {
    if index >= items.len() {
        items.resize(index + 1, String::new());
    }
    items[index] = text;
}

/// Plural-category -> string mapping for source and target.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePlural {
    source: PluralStrings,
    target: Option<PluralStrings>,
}

impl ResourcePlural {
    pub fn new(source: PluralStrings) -> Self {
        Self {
            source,
            target: None,
        }
    }

    pub fn source_plurals(&self) -> &PluralStrings {
        &self.source
    }

    pub fn target_plurals(&self) -> Option<&PluralStrings> {
        self.target.as_ref()
    }

    pub fn set_source_plurals(&mut self, plurals: PluralStrings) {
        self.source = plurals;
    }

    pub fn set_target_plurals(&mut self, plurals: Option<PluralStrings>) {
        self.target = plurals;
    }

    pub fn source_plural(&self, category: PluralCategory) -> Option<&str> {
        self.source.get(&category).map(String::as_str)
    }

    pub fn target_plural(&self, category: PluralCategory) -> Option<&str> {
        self.target.as_ref()?.get(&category).map(String::as_str)
    }

    pub fn set_source_plural(&mut self, category: PluralCategory, text: impl Into<String>) {
        self.source.insert(category, text.into());
    }

    pub fn set_target_plural(&mut self, category: PluralCategory, text: impl Into<String>) {
        self.target
            .get_or_insert_with(PluralStrings::new)
            .insert(category, text.into());
    }

    pub fn size(&self) -> usize {
        let t = self.target.as_ref().map_or(0, PluralStrings::len);
        self.source.len().max(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceKind {
    String(ResourceString),
    Array(ResourceArray),
    Plural(ResourcePlural),
}

impl ResourceKind {
    pub fn res_type(&self) -> ResType {
        match self {
            ResourceKind::String(_) => ResType::String,
            ResourceKind::Array(_) => ResType::Array,
            ResourceKind::Plural(_) => ResType::Plural,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            ResourceKind::String(s) => s.size(),
            ResourceKind::Array(a) => a.size(),
            ResourceKind::Plural(p) => p.size(),
        }
    }

    fn source_equals_clean(&self, other: &ResourceKind) -> bool {
        match (self, other) {
            (ResourceKind::String(a), ResourceKind::String(b)) => {
                normalize::clean_string(&a.source) == normalize::clean_string(&b.source)
            }
            (ResourceKind::Array(a), ResourceKind::Array(b)) => {
                a.source.len() == b.source.len()
                    && a.source
                        .iter()
                        .zip(&b.source)
                        .all(|(x, y)| normalize::clean_string(x) == normalize::clean_string(y))
            }
            (ResourceKind::Plural(a), ResourceKind::Plural(b)) => {
                a.source.len() == b.source.len()
                    && a.source.iter().all(|(cat, text)| {
                        b.source.get(cat).is_some_and(|other| {
                            normalize::clean_string(text) == normalize::clean_string(other)
                        })
                    })
            }
            _ => false,
        }
    }

    /// Overwrites content from `other`: source when non-empty, target when present.
    fn merge_from(&mut self, other: &ResourceKind) -> bool {
        let mut changed = false;
        match (self, other) {
            (ResourceKind::String(a), ResourceKind::String(b)) => {
                if !b.source.is_empty() && a.source != b.source {
                    a.source = b.source.clone();
                    changed = true;
                }
                if b.target.is_some() && a.target != b.target {
                    a.target = b.target.clone();
                    changed = true;
                }
            }
            (ResourceKind::Array(a), ResourceKind::Array(b)) => {
                if !b.source.is_empty() && a.source != b.source {
                    a.source = b.source.clone();
                    changed = true;
                }
                if b.target.is_some() && a.target != b.target {
                    a.target = b.target.clone();
                    changed = true;
                }
            }
            (ResourceKind::Plural(a), ResourceKind::Plural(b)) => {
                if !b.source.is_empty() && a.source != b.source {
                    a.source = b.source.clone();
                    changed = true;
                }
                if b.target.is_some() && a.target != b.target {
                    a.target = b.target.clone();
                    changed = true;
                }
            }
            _ => {}
        }
        changed
    }

    fn source_text(&self) -> String {
        match self {
            ResourceKind::String(s) => s.source.clone(),
            ResourceKind::Array(a) => a.source.join("\n"),
            ResourceKind::Plural(p) => p
                .source
                .iter()
                .map(|(cat, text)| format!("{cat}={text}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A localizable resource: identity and metadata shared by every kind, plus
/// the kind-specific source/target content.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    project: String,
    context: Option<String>,
    source_locale: String,
    target_locale: Option<String>,
    key: String,
    path_name: String,
    auto_key: bool,
    state: Option<ResourceState>,
    id: Option<i64>,
    comment: Option<String>,
    origin: Origin,
    dnt: bool,
    datatype: Option<String>,
    localize: bool,
    flavor: Option<String>,
    source_hash: Option<String>,
    instances: Vec<Resource>,
    dirty: bool,
    kind: ResourceKind,
}

fn non_empty(s: impl Into<String>) -> Option<String> {
    let s = s.into();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Resource {
    pub fn new(key: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            project: String::new(),
            context: None,
            source_locale: DEFAULT_SOURCE_LOCALE.to_string(),
            target_locale: None,
            key: key.into(),
            path_name: String::new(),
            auto_key: false,
            state: None,
            id: None,
            comment: None,
            origin: Origin::Source,
            dnt: false,
            datatype: None,
            localize: true,
            flavor: None,
            source_hash: None,
            instances: Vec::new(),
            dirty: false,
            kind,
        }
    }

    pub fn new_string(key: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(key, ResourceKind::String(ResourceString::new(source)))
    }

    pub fn new_array<I, S>(key: impl Into<String>, source: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(key, ResourceKind::Array(ResourceArray::new(source)))
    }

    pub fn new_plural(key: impl Into<String>, source: PluralStrings) -> Self {
        Self::new(key, ResourceKind::Plural(ResourcePlural::new(source)))
    }

    // Identity is fixed at construction; these consume and return the resource.

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Empty context means the root context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = non_empty(context);
        self
    }

    pub fn with_source_locale(mut self, locale: impl Into<String>) -> Self {
        self.source_locale = locale.into();
        self
    }

    pub fn with_target_locale(mut self, locale: impl Into<String>) -> Self {
        self.target_locale = non_empty(locale);
        self
    }

    pub fn with_path_name(mut self, path: impl Into<String>) -> Self {
        self.path_name = path.into();
        self
    }

    pub fn with_auto_key(mut self, auto_key: bool) -> Self {
        self.auto_key = auto_key;
        self
    }

    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = non_empty(datatype);
        self
    }

    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = non_empty(flavor);
        self
    }

    pub fn with_dnt(mut self, dnt: bool) -> Self {
        self.dnt = dnt;
        self
    }

    pub fn with_localize(mut self, localize: bool) -> Self {
        self.localize = localize;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_source_hash(mut self, hash: impl Into<String>) -> Self {
        self.source_hash = non_empty(hash);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.set_comment(non_empty(comment));
        self
    }

    pub fn with_state(mut self, state: ResourceState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    pub fn set_source_locale(&mut self, locale: impl Into<String>) {
        self.source_locale = locale.into();
    }

    pub fn target_locale(&self) -> Option<&str> {
        self.target_locale.as_deref()
    }

    pub fn set_target_locale(&mut self, locale: Option<String>) {
        self.target_locale = locale.filter(|l| !l.is_empty());
    }

    /// Target locale when present, otherwise the source locale.
    pub fn locale(&self) -> &str {
        self.target_locale.as_deref().unwrap_or(&self.source_locale)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn path_name(&self) -> &str {
        &self.path_name
    }

    pub fn auto_key(&self) -> bool {
        self.auto_key
    }

    pub fn state(&self) -> Option<ResourceState> {
        self.state
    }

    pub fn set_state(&mut self, state: ResourceState) {
        self.state = Some(state);
    }

    /// Sets the state from its string form. Unknown values leave the current
    /// state untouched.
    pub fn set_state_str(&mut self, state: &str) {
        if let Ok(s) = state.parse() {
            self.state = Some(s);
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn dnt(&self) -> bool {
        self.dnt
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    /// `false` means the source text is used verbatim and never looked up.
    pub fn localize(&self) -> bool {
        self.localize
    }

    pub fn flavor(&self) -> Option<&str> {
        self.flavor.as_deref()
    }

    /// The stored source hash, or a digest of the current source content.
    pub fn source_hash(&self) -> String {
        match &self.source_hash {
            Some(h) => h.clone(),
            None => hash::hash_source(&self.kind.source_text()),
        }
    }

    /// The source hash given at construction, if any.
    pub fn stored_source_hash(&self) -> Option<&str> {
        self.source_hash.as_deref()
    }

    pub fn res_type(&self) -> ResType {
        self.kind.res_type()
    }

    pub fn kind(&self) -> &ResourceKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ResourceKind {
        self.dirty = true;
        self.source_hash = None;
        &mut self.kind
    }

    pub fn as_string(&self) -> Option<&ResourceString> {
        match &self.kind {
            ResourceKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ResourceArray> {
        match &self.kind {
            ResourceKind::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_plural(&self) -> Option<&ResourcePlural> {
        match &self.kind {
            ResourceKind::Plural(p) => Some(p),
            _ => None,
        }
    }

    /// Source text of a string resource.
    pub fn source(&self) -> Option<&str> {
        self.as_string().map(ResourceString::source)
    }

    /// Target text of a string resource.
    pub fn target(&self) -> Option<&str> {
        self.as_string().and_then(ResourceString::target)
    }

    /// Sets the target text of a string resource. No-op for other kinds.
    pub fn set_target(&mut self, target: impl Into<String>) {
        if let ResourceKind::String(s) = &mut self.kind {
            s.set_target(Some(target.into()));
            self.dirty = true;
        }
    }

    pub fn size(&self) -> usize {
        self.kind.size()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_clean(&mut self) {
        self.dirty = false;
    }

    pub fn hash_key(&self) -> String {
        hash_key_for(
            self.res_type(),
            &self.project,
            self.context(),
            self.locale(),
            &self.key,
            self.flavor(),
        )
    }

    pub fn clean_hash_key(&self) -> String {
        clean_hash_key_for(
            self.res_type(),
            &self.project,
            self.context(),
            self.locale(),
            &self.key,
            self.flavor(),
        )
    }

    /// Same identity: project, context, locales, key, type and flavor.
    pub fn same(&self, other: &Resource) -> bool {
        self.project == other.project
            && self.context == other.context
            && self.source_locale == other.source_locale
            && self.target_locale == other.target_locale
            && self.key == other.key
            && self.res_type() == other.res_type()
            && self.flavor == other.flavor
    }

    /// Same identity and same source and target content. Path, state and
    /// comment do not take part.
    pub fn equals(&self, other: &Resource) -> bool {
        self.same(other) && self.kind == other.kind
    }

    /// Whether `other` shares every property that affects translation.
    pub fn is_instance(&self, other: &Resource) -> bool {
        self.context == other.context
            && self.datatype == other.datatype
            && self.dnt == other.dnt
            && self.flavor == other.flavor
            && self.project == other.project
            && self.key == other.key
            && self.res_type() == other.res_type()
            && self.source_locale == other.source_locale
            && self.target_locale == other.target_locale
            && self.kind.source_equals_clean(&other.kind)
    }

    /// Records `other` as a duplicate occurrence of this resource.
    ///
    /// Refuses `other` when it is this very resource, when it is already
    /// recorded, or when it is not an instance.
    pub fn add_instance(&mut self, other: Resource) -> bool {
        if other == *self || self.instances.contains(&other) || !self.is_instance(&other) {
            return false;
        }
        self.instances.push(other);
        true
    }

    pub fn instances(&self) -> &[Resource] {
        &self.instances
    }

    /// Copy of this resource's metadata carrying a different body. Used when
    /// converting between kinds.
    pub(crate) fn with_kind(&self, kind: ResourceKind) -> Resource {
        let mut r = self.clone();
        r.kind = kind;
        r.instances.clear();
        r.source_hash = None;
        r
    }

    /// Copies source and target content from `other`. Returns whether
    /// anything changed.
    pub fn merge(&mut self, other: &Resource) -> bool {
        if self.res_type() != other.res_type() {
            return false;
        }
        let changed = self.kind.merge_from(&other.kind);
        if changed {
            self.dirty = true;
            self.source_hash = None;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plural::plural_strings_from;

    fn base() -> Resource {
        Resource::new_string("asdf", "This is a test")
            .with_project("a")
            .with_context("b")
            .with_source_locale("de-DE")
    }

    #[test]
    fn hash_key_shape() {
        let r = base();
        assert_eq!(r.hash_key(), "rs_a_b_de-DE_asdf");

        let p = Resource::new_plural("k", plural_strings_from([("one", "x")])).with_project("p");
        assert_eq!(p.hash_key(), "rp_p__en-US_k");
    }

    #[test]
    fn hash_key_prefers_target_locale() {
        let r = base().with_target_locale("fr-FR");
        assert_eq!(r.hash_key(), "rs_a_b_fr-FR_asdf");
    }

    #[test]
    fn hash_key_changes_with_each_dimension() {
        let r = base();
        let k = r.hash_key();
        assert_eq!(k, r.hash_key());
        assert_ne!(k, base().with_project("z").hash_key());
        assert_ne!(k, base().with_context("z").hash_key());
        assert_ne!(k, base().with_source_locale("fr-FR").hash_key());
        assert_ne!(
            k,
            Resource::new_string("other", "This is a test")
                .with_project("a")
                .with_context("b")
                .with_source_locale("de-DE")
                .hash_key()
        );
        assert_ne!(k, Resource::new_array("asdf", ["x"]).with_project("a").with_context("b").with_source_locale("de-DE").hash_key());
    }

    #[test]
    fn clean_hash_key_collapses_key_whitespace() {
        let a = Resource::new_string("hello  world", "x");
        let b = Resource::new_string("hello world ", "x");
        assert_ne!(a.hash_key(), b.hash_key());
        assert_eq!(a.clean_hash_key(), b.clean_hash_key());
    }

    #[test]
    fn set_state_ignores_invalid_values() {
        let mut r = base();
        r.set_state_str("translated");
        assert_eq!(r.state(), Some(ResourceState::Translated));
        r.set_state_str("bogus");
        assert_eq!(r.state(), Some(ResourceState::Translated));
    }

    #[test]
    fn same_ignores_path_and_comment() {
        let a = base().with_path_name("a/b.js").with_comment("one");
        let b = base().with_path_name("c/d.js").with_comment("two");
        assert!(a.same(&b));
        assert!(!a.same(&base().with_flavor("chocolate")));
    }

    #[test]
    fn instances_ignore_incidental_metadata() {
        let a = base().with_path_name("a.js").with_comment("x");
        let b = base()
            .with_path_name("b.js")
            .with_state(ResourceState::Accepted)
            .with_origin(Origin::Target);
        assert!(a.is_instance(&b));

        assert!(!a.is_instance(&base().with_context("c")));
        assert!(!a.is_instance(&base().with_datatype("html")));
        assert!(!a.is_instance(&base().with_dnt(true)));
        assert!(!a.is_instance(&base().with_flavor("f")));
        assert!(!a.is_instance(&base().with_project("p")));
        assert!(!a.is_instance(&base().with_source_locale("en-US")));
        assert!(!a.is_instance(&base().with_target_locale("ja-JP")));

        let other_key = Resource::new_string("qwerty", "This is a test")
            .with_project("a")
            .with_context("b")
            .with_source_locale("de-DE");
        assert!(!a.is_instance(&other_key));

        let other_type = Resource::new_array("asdf", ["This is a test"])
            .with_project("a")
            .with_context("b")
            .with_source_locale("de-DE");
        assert!(!a.is_instance(&other_type));
        assert!(!other_type.is_instance(&a));
    }

    #[test]
    fn hash_key_escapes_separator() {
        let left = Resource::new_string("k", "v").with_project("a_b").with_context("c");
        let right = Resource::new_string("k", "v").with_project("a").with_context("b_c");
        assert_ne!(left.hash_key(), right.hash_key());
        assert_eq!(left.hash_key(), r"rs_a\_b_c_en-US_k");

        let slash = Resource::new_string(r"x\", "v");
        assert_eq!(slash.hash_key(), r"rs___en-US_x\\");
    }

    #[test]
    fn instances_compare_normalized_source() {
        let a = Resource::new_string("k", "Hello   there");
        let b = Resource::new_string("k", " Hello there ");
        let c = Resource::new_string("k", "Goodbye");
        assert!(a.is_instance(&b));
        assert!(!a.is_instance(&c));
    }

    #[test]
    fn add_instance_rules() {
        let mut a = base().with_path_name("a.js");
        let b = base().with_path_name("b.js");

        assert!(!a.add_instance(a.clone()));
        assert!(a.add_instance(b.clone()));
        assert!(!a.add_instance(b));
        assert!(!a.add_instance(base().with_context("other")));
        assert_eq!(a.instances().len(), 1);
    }

    #[test]
    fn array_size_is_longest_side() {
        let mut r = ResourceArray::new(["a", "b"]);
        assert_eq!(r.size(), 2);
        r.set_target_item(3, "d");
        assert_eq!(r.size(), 4);
        assert_eq!(r.target_item(1), Some(""));
        assert_eq!(ResourceArray::new(Vec::<String>::new()).size(), 0);
    }

    #[test]
    fn array_items_are_index_addressable() {
        let mut r = ResourceArray::new(["a"]);
        r.set_source_item(2, "c");
        assert_eq!(r.source_items(), ["a", "", "c"]);
        assert_eq!(r.source_item(2), Some("c"));
        assert_eq!(r.source_item(5), None);
        assert_eq!(r.target_item(0), None);
    }

    #[test]
    fn array_getter_returns_copy() {
        let r = Resource::new_array("k", ["a", "b"]);
        let mut copy = r.as_array().map(ResourceArray::source_array).unwrap_or_default();
        copy.push("c".into());
        assert_eq!(r.size(), 2);
    }

    #[test]
    fn equals_ignores_path_state_comment() {
        let a = Resource::new_array("k", ["a", "b"]).with_path_name("x");
        let b = Resource::new_array("k", ["a", "b"])
            .with_path_name("y")
            .with_comment("c")
            .with_state(ResourceState::New);
        assert!(a.equals(&b));
        assert!(!a.equals(&Resource::new_array("k", ["a", "c"])));
    }

    #[test]
    fn merge_reports_change() {
        let mut a = Resource::new_string("k", "src");
        let mut b = Resource::new_string("k", "src");
        assert!(!a.merge(&b));
        assert!(!a.is_dirty());

        b.set_target("cible");
        assert!(a.merge(&b));
        assert!(a.is_dirty());
        assert_eq!(a.target(), Some("cible"));
    }

    #[test]
    fn source_hash_falls_back_to_digest() {
        let a = Resource::new_string("k", "text");
        assert_eq!(a.source_hash(), hash::hash_source("text"));
        let b = Resource::new_string("k", "text").with_source_hash("abc");
        assert_eq!(b.source_hash(), "abc");
    }
}
