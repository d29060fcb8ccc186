//! Keyed, ordered collection of resources.
//!
//! # Invariants
//!
//! 1. Every stored resource has exactly one entry in the hash-key index, and
//!    no two stored resources share a hash key.
//! 2. The clean index maps each clean hash key to the first resource stored
//!    under it. Later resources with the same clean key stay reachable
//!    through `get`.
//! 3. Iteration follows insertion order; merging into an existing resource
//!    keeps its position.
//!
//! # Failure modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Lookup of unknown key | `None` |
//! | Query matches nothing | empty `Vec` |
//! | `remove` without enough identity | returns `false`, set untouched |
//! | `remove` matching several resources | returns `false`, set untouched |

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::model::criteria::Criteria;
use crate::model::resource::Resource;
use crate::services::convert;

/// Pseudo-locale used when a set is created without a source locale.
pub const DEFAULT_SET_LOCALE: &str = "zxx-XX";

#[derive(Debug, Clone)]
pub struct TranslationSet {
    source_locale: String,
    resources: Vec<Resource>,
    by_key: HashMap<String, usize>,
    by_clean_key: HashMap<String, usize>,
    dirty: bool,
}

impl Default for TranslationSet {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TranslationSet {
    pub fn new(source_locale: Option<&str>) -> Self {
        Self {
            source_locale: source_locale
                .filter(|l| !l.is_empty())
                .unwrap_or(DEFAULT_SET_LOCALE)
                .to_string(),
            resources: Vec::new(),
            by_key: HashMap::new(),
            by_clean_key: HashMap::new(),
            dirty: false,
        }
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    /// Adds a resource, merging into an existing one with the same hash key.
    ///
    /// Returns whether the set's content changed. The set is marked dirty
    /// only in that case.
    pub fn add(&mut self, resource: Resource) -> bool {
        let changed = self.insert_or_merge(resource);
        if changed {
            self.dirty = true;
        }
        changed
    }

    fn insert_or_merge(&mut self, resource: Resource) -> bool {
        let key = resource.hash_key();

        if let Some(&idx) = self.by_key.get(&key) {
            let existing = &mut self.resources[idx];
            let changed = existing.merge(&resource);
            if changed {
                debug!("[TranslationSet] merged changes into {key}");
            }
            if existing.path_name() != resource.path_name() {
                existing.add_instance(resource);
            }
            return changed;
        }

        let clean = resource.clean_hash_key();
        let idx = self.resources.len();
        self.resources.push(resource);
        self.by_key.insert(key, idx);
        self.by_clean_key.entry(clean).or_insert(idx);
        true
    }

    pub fn add_all<I>(&mut self, resources: I)
    where
        I: IntoIterator<Item = Resource>,
    {
        for r in resources {
            self.add(r);
        }
    }

    pub fn add_set(&mut self, other: &TranslationSet) {
        self.add_all(other.resources.iter().cloned());
    }

    pub fn get(&self, hash_key: &str) -> Option<&Resource> {
        self.by_key.get(hash_key).map(|&i| &self.resources[i])
    }

    /// Lookup through the whitespace-normalized key index.
    pub fn get_clean(&self, clean_hash_key: &str) -> Option<&Resource> {
        self.by_clean_key
            .get(clean_hash_key)
            .map(|&i| &self.resources[i])
    }

    /// Finds an auto-keyed string resource by its source text and context.
    pub fn get_by_source(&self, source: &str, context: Option<&str>) -> Option<&Resource> {
        let context = context.filter(|c| !c.is_empty());
        self.resources
            .iter()
            .find(|r| r.auto_key() && r.source() == Some(source) && r.context() == context)
    }

    /// Resources matching every present criterion, in insertion order.
    pub fn get_by(&self, criteria: &Criteria) -> Vec<&Resource> {
        self.resources.iter().filter(|r| criteria.matches(r)).collect()
    }

    pub fn get_all(&self) -> &[Resource] {
        &self.resources
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Distinct projects in first-seen order, `None` for an empty set.
    pub fn get_projects(&self) -> Option<Vec<String>> {
        distinct(self.resources.iter(), |r| r.project())
    }

    /// Distinct contexts of `project` (root context as `""`), `None` when the
    /// project has no resources.
    pub fn get_contexts(&self, project: &str) -> Option<Vec<String>> {
        distinct(
            self.resources.iter().filter(|r| r.project() == project),
            |r| r.context().unwrap_or(""),
        )
    }

    /// Distinct effective locales within `project` and `context`.
    pub fn get_locales(&self, project: &str, context: Option<&str>) -> Option<Vec<String>> {
        let context = context.filter(|c| !c.is_empty());
        distinct(
            self.resources
                .iter()
                .filter(|r| r.project() == project && r.context() == context),
            |r| r.locale(),
        )
    }

    /// Removes the single resource identified by `criteria`.
    ///
    /// The criteria must name one project, one key and one locale. A missing
    /// context means the root context. Returns `false` without touching the
    /// set when the criteria are insufficient or match zero or several
    /// resources.
    pub fn remove(&mut self, criteria: &Criteria) -> bool {
        if !criteria.identifies_single() {
            warn!("[TranslationSet] refusing remove: criteria do not identify a single resource");
            return false;
        }

        let resolved = criteria.with_root_context_default();
        let matches: Vec<usize> = self
            .resources
            .iter()
            .enumerate()
            .filter(|(_, r)| resolved.matches(r))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [idx] => {
                self.remove_at(*idx);
                true
            }
            [] => false,
            _ => {
                warn!(
                    "[TranslationSet] refusing remove: {} resources match",
                    matches.len()
                );
                false
            }
        }
    }

    /// Removes the resource with the same hash key as `resource`.
    pub fn remove_resource(&mut self, resource: &Resource) -> bool {
        match self.by_key.get(&resource.hash_key()) {
            Some(&idx) => {
                self.remove_at(idx);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, idx: usize) {
        self.resources.remove(idx);
        self.reindex();
        self.dirty = true;
    }

    fn reindex(&mut self) {
        self.by_key.clear();
        self.by_clean_key.clear();
        for (i, r) in self.resources.iter().enumerate() {
            self.by_key.insert(r.hash_key(), i);
            self.by_clean_key.entry(r.clean_hash_key()).or_insert(i);
        }
    }

    /// Resources of `other` that are missing here or carry different content.
    pub fn diff(&self, other: &TranslationSet) -> TranslationSet {
        let mut out = TranslationSet::new(Some(&self.source_locale));
        for r in &other.resources {
            let differs = match self.get(&r.hash_key()) {
                None => true,
                Some(existing) => !existing.equals(r),
            };
            if differs {
                out.add(r.clone());
            }
        }
        out
    }

    /// Number of resources. Arrays and plurals count once each.
    pub fn size(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn clear(&mut self) {
        self.resources.clear();
        self.by_key.clear();
        self.by_clean_key.clear();
        self.dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_clean(&mut self) {
        self.dirty = false;
        for r in &mut self.resources {
            r.set_clean();
        }
    }

    /// Replaces every plural resource with its ICU-string equivalent.
    pub fn convert_to_icu(&mut self) -> &mut Self {
        self.convert_each(convert::plural_to_icu)
    }

    /// Replaces every ICU-plural string resource with a plural resource.
    pub fn convert_to_plural_res(&mut self) -> &mut Self {
        self.convert_each(convert::icu_to_plural)
    }

    fn convert_each<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&Resource) -> Option<Resource>,
    {
        let old = std::mem::take(&mut self.resources);
        let original_keys: HashSet<String> = self.by_key.drain().map(|(k, _)| k).collect();
        self.by_clean_key.clear();

        let mut converted = 0usize;
        for r in old {
            let next = match f(&r) {
                Some(c) => {
                    let key = c.hash_key();
                    if original_keys.contains(&key) || self.by_key.contains_key(&key) {
                        warn!(
                            "[TranslationSet] {key} already exists, keeping {} unconverted",
                            r.hash_key()
                        );
                        r
                    } else {
                        converted += 1;
                        c
                    }
                }
                None => r,
            };
            self.insert_or_merge(next);
        }

        if converted > 0 {
            debug!("[TranslationSet] converted {converted} resources");
            self.dirty = true;
        }
        self
    }
}

fn distinct<'a, I, F>(resources: I, field: F) -> Option<Vec<String>>
where
    I: Iterator<Item = &'a Resource>,
    F: Fn(&'a Resource) -> &'a str,
{
    let mut seen = false;
    let mut out: Vec<String> = Vec::new();
    for r in resources {
        seen = true;
        let v = field(r);
        if !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    if seen {
        Some(out)
    } else {
        None
    }
}
