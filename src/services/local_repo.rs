//! Flat-file repository: one JSON exchange file per locale, named after the
//! locale (`de-DE.json`, `zh-Hans-CN.json`).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::factory;
use crate::model::criteria::Criteria;
use crate::model::props::ResourceProps;
use crate::model::resource::Resource;
use crate::model::translation_set::TranslationSet;
use crate::services::repository::TranslationRepository;
use crate::services::{encoding, locale, store};

const EXCHANGE_EXT: &str = "json";

/// Parses an exchange file into a translation set.
pub fn deserialize(text: &str, source_locale: &str) -> Result<TranslationSet> {
    let bags: Vec<ResourceProps> = serde_json::from_str(text)?;
    let mut set = TranslationSet::new(Some(source_locale));
    set.add_all(bags.into_iter().map(|p| factory::new_resource(Some(p))));
    Ok(set)
}

/// Serializes a translation set as an exchange file.
pub fn serialize(set: &TranslationSet) -> Result<Vec<u8>> {
    let bags: Vec<ResourceProps> = set.iter().map(Resource::to_props).collect();
    Ok(serde_json::to_vec_pretty(&bags)?)
}

pub struct LocalRepository {
    root: PathBuf,
    set: TranslationSet,
}

impl LocalRepository {
    pub fn new(root: impl Into<PathBuf>, source_locale: &str) -> Self {
        Self {
            root: root.into(),
            set: TranslationSet::new(Some(source_locale)),
        }
    }

    /// Creates the repository and loads every exchange file under `root`.
    pub fn open(root: impl Into<PathBuf>, source_locale: &str) -> Result<Self> {
        let mut repo = Self::new(root, source_locale);
        repo.load()?;
        Ok(repo)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn translation_set(&self) -> &TranslationSet {
        &self.set
    }

    pub fn translation_set_mut(&mut self) -> &mut TranslationSet {
        &mut self.set
    }

    /// Loads every `<locale>.json` file and merges it into the repository's
    /// set. Files whose name is not a valid locale are skipped. Returns the
    /// number of files loaded.
    pub fn load(&mut self) -> Result<usize> {
        if !self.root.exists() {
            debug!("[LocalRepo] {} does not exist yet", self.root.display());
            return Ok(0);
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.root)?
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(EXCHANGE_EXT))
            .collect();
        paths.sort();

        let mut loaded = 0usize;
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !locale::is_valid_locale(stem) {
                warn!("[LocalRepo] skipping {}: not a locale name", path.display());
                continue;
            }

            let text = encoding::read_text(&path)?;
            let file_set = deserialize(&text, self.set.source_locale())?;
            debug!(
                "[LocalRepo] {} -> {} resources",
                path.display(),
                file_set.size()
            );
            self.set.add_set(&file_set);
            loaded += 1;
        }

        self.set.set_clean();
        info!(
            "[LocalRepo] loaded {loaded} files, {} resources",
            self.set.size()
        );
        Ok(loaded)
    }

    /// Writes one file per effective locale. Returns the number of files
    /// written.
    pub fn save(&mut self) -> Result<usize> {
        let mut files: Vec<(String, TranslationSet)> = Vec::new();
        for r in self.set.iter() {
            let tag = locale::parse_locale(r.locale())?.to_tag();
            let slot = match files.iter().position(|(t, _)| *t == tag) {
                Some(i) => i,
                None => {
                    files.push((tag, TranslationSet::new(Some(self.set.source_locale()))));
                    files.len() - 1
                }
            };
            files[slot].1.add(r.clone());
        }

        for (tag, file_set) in &files {
            let path = self.root.join(format!("{tag}.{EXCHANGE_EXT}"));
            store::write_atomic(&path, &serialize(file_set)?)?;
        }

        self.set.set_clean();
        info!("[LocalRepo] saved {} files to {}", files.len(), self.root.display());
        Ok(files.len())
    }
}

impl TranslationRepository for LocalRepository {
    fn add_all(&mut self, set: &TranslationSet) -> Result<usize> {
        let mut changed = 0usize;
        for r in set.iter() {
            if self.set.add(r.clone()) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn get_by(&self, criteria: &Criteria) -> Result<Vec<Resource>> {
        Ok(self.set.get_by(criteria).into_iter().cloned().collect())
    }

    fn remove(&mut self, resource: &Resource) -> Result<usize> {
        Ok(usize::from(self.set.remove_resource(resource)))
    }

    fn size(&self) -> Result<usize> {
        Ok(self.set.size())
    }

    fn close(mut self) -> Result<()> {
        if self.set.is_dirty() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> TranslationSet {
        let mut ts = TranslationSet::new(Some("en-US"));
        ts.add(Resource::new_string("hello", "Hello").with_project("web"));
        let mut de = Resource::new_string("hello", "Hello")
            .with_project("web")
            .with_target_locale("de-DE");
        de.set_target("Hallo");
        ts.add(de);
        ts.add(Resource::new_array("days", ["Mon", "Tue"]).with_project("web"));
        ts
    }

    #[test]
    fn serialize_then_deserialize() {
        let ts = sample();
        let bytes = serialize(&ts).expect("serializes");
        let text = String::from_utf8(bytes).expect("utf8");
        let back = deserialize(&text, "en-US").expect("deserializes");
        assert_eq!(back.size(), 3);
        assert!(ts.diff(&back).is_empty());
    }

    #[test]
    fn save_writes_one_file_per_locale_and_reloads() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut repo = LocalRepository::new(dir.path(), "en-US");
        repo.add_all(&sample()).expect("adds");
        assert_eq!(repo.save().expect("saves"), 2);
        assert!(dir.path().join("en-US.json").exists());
        assert!(dir.path().join("de-DE.json").exists());

        let reopened = LocalRepository::open(dir.path(), "en-US").expect("opens");
        assert_eq!(reopened.size().expect("size"), 3);
        let de = reopened
            .get_by(&Criteria::new().target_locale("de-DE"))
            .expect("query");
        assert_eq!(de.len(), 1);
        assert_eq!(de[0].target(), Some("Hallo"));
    }

    #[test]
    fn load_skips_files_not_named_by_locale() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("notes.json"), "not json at all").expect("write");
        fs::write(
            dir.path().join("fr-FR.json"),
            r#"[{"key": "a", "source": "A", "targetLocale": "fr-FR", "target": "À"}]"#,
        )
        .expect("write");

        let repo = LocalRepository::open(dir.path(), "en-US").expect("opens");
        assert_eq!(repo.translation_set().size(), 1);
        assert!(!repo.translation_set().is_dirty());
    }

    #[test]
    fn close_saves_dirty_changes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut repo = LocalRepository::new(dir.path(), "en-US");
        repo.add_all(&sample()).expect("adds");
        repo.close().expect("closes");
        assert!(dir.path().join("en-US.json").exists());
    }

    #[test]
    fn locale_spellings_share_one_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut repo = LocalRepository::new(dir.path(), "en-US");
        let mut ts = TranslationSet::new(None);
        ts.add(Resource::new_string("a", "A").with_source_locale("pt_BR"));
        ts.add(Resource::new_string("b", "B").with_source_locale("pt-BR"));
        repo.add_all(&ts).expect("adds");

        assert_eq!(repo.save().expect("saves"), 1);
        let text = fs::read_to_string(dir.path().join("pt-BR.json")).expect("read");
        assert_eq!(deserialize(&text, "pt-BR").expect("parses").size(), 2);
    }

    #[test]
    fn save_rejects_unnameable_locale() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut repo = LocalRepository::new(dir.path(), "en-US");
        let mut ts = TranslationSet::new(None);
        ts.add(Resource::new_string("k", "v").with_source_locale("not a locale"));
        repo.add_all(&ts).expect("adds");
        assert!(matches!(repo.save(), Err(Error::InvalidLocale(_))));
    }
}
