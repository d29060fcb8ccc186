//! SQLite-backed translation repository.
//!
//! Every persisted unit is one row: a string is one row, an array one row per
//! item (`ordinal`), a plural one row per category (`pluralClass`). Each row
//! records the source locale of its resource; rows whose `locale` equals it
//! carry source text, all others carry translations.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, Row as SqlRow, ToSql};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::factory;
use crate::model::criteria::{Criteria, OneOrMany};
use crate::model::project::MAX_BATCH_SIZE;
use crate::model::props::ResourceProps;
use crate::model::resource::{ResType, Resource, ResourceKind};
use crate::model::translation_set::TranslationSet;
use crate::services::repository::TranslationRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS Resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reskey TEXT NOT NULL,
    text TEXT NOT NULL,
    pathName TEXT NOT NULL DEFAULT '',
    locale TEXT NOT NULL,
    context TEXT NOT NULL DEFAULT '',
    autoKey INTEGER NOT NULL DEFAULT 0,
    project TEXT NOT NULL DEFAULT '',
    resType TEXT NOT NULL DEFAULT 'string',
    comment TEXT,
    ordinal INTEGER NOT NULL DEFAULT 0,
    pluralClass TEXT NOT NULL DEFAULT '',
    state TEXT,
    datatype TEXT,
    flavor TEXT NOT NULL DEFAULT '',
    dnt INTEGER NOT NULL DEFAULT 0,
    sourceLocale TEXT NOT NULL DEFAULT '',
    UNIQUE (project, context, locale, reskey, resType, flavor, ordinal, pluralClass)
);
CREATE INDEX IF NOT EXISTS idx_resources_identity
    ON Resources (project, context, locale, reskey);
"#;

const COLUMNS: &str = "id, reskey, text, pathName, locale, context, autoKey, project, resType, \
                       comment, ordinal, pluralClass, state, datatype, flavor, dnt, sourceLocale";

const INSERT_SQL: &str = "INSERT INTO Resources (reskey, text, pathName, locale, context, autoKey, \
                          project, resType, comment, ordinal, pluralClass, state, datatype, flavor, dnt, \
                          sourceLocale) \
                          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";

const ADD_SOURCE_LOCALE_SQL: &str =
    "ALTER TABLE Resources ADD COLUMN sourceLocale TEXT NOT NULL DEFAULT ''";

const DELETE_SQL: &str = "DELETE FROM Resources WHERE project = ?1 AND context = ?2 AND locale = ?3 \
                          AND reskey = ?4 AND resType = ?5 AND flavor = ?6";

/// One row of the `Resources` table.
#[derive(Debug, Clone, PartialEq)]
struct ResourceRow {
    id: Option<i64>,
    reskey: String,
    text: String,
    path_name: String,
    locale: String,
    context: String,
    auto_key: bool,
    project: String,
    res_type: String,
    comment: Option<String>,
    ordinal: i64,
    plural_class: String,
    state: Option<String>,
    datatype: Option<String>,
    flavor: String,
    dnt: bool,
    /// Empty in rows written before the column existed.
    source_locale: String,
    /// First row written for its resource; replaces the resource's old rows.
    first: bool,
}

impl ResourceRow {
    fn from_sql(row: &SqlRow<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            reskey: row.get(1)?,
            text: row.get(2)?,
            path_name: row.get(3)?,
            locale: row.get(4)?,
            context: row.get(5)?,
            auto_key: row.get(6)?,
            project: row.get(7)?,
            res_type: row.get(8)?,
            comment: row.get(9)?,
            ordinal: row.get(10)?,
            plural_class: row.get(11)?,
            state: row.get(12)?,
            datatype: row.get(13)?,
            flavor: row.get(14)?,
            dnt: row.get(15)?,
            source_locale: row.get(16)?,
            first: false,
        })
    }

    fn group_key(&self) -> (String, String, String, String, String, String) {
        (
            self.project.clone(),
            self.context.clone(),
            self.locale.clone(),
            self.reskey.clone(),
            self.res_type.clone(),
            self.flavor.clone(),
        )
    }
}

/// Log row-parse errors instead of silently discarding them.
fn log_and_skip_err<T>(result: rusqlite::Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("[DB] row parse error (skipped): {e}");
            None
        }
    }
}

/// Flattens a resource into rows. Translations come from the target side
/// when a target locale is set, otherwise rows carry the source.
fn resource_rows(r: &Resource) -> Vec<ResourceRow> {
    let translated = r.target_locale().is_some();

    let texts: Vec<(i64, String, String)> = match r.kind() {
        ResourceKind::String(s) => {
            let text = if translated { s.target() } else { Some(s.source()) };
            text.map(|t| vec![(0, String::new(), t.to_string())])
                .unwrap_or_default()
        }
        ResourceKind::Array(a) => {
            let items = if translated {
                a.target_items().unwrap_or_default()
            } else {
                a.source_items()
            };
            items
                .iter()
                .enumerate()
                .map(|(i, t)| (i as i64, String::new(), t.clone()))
                .collect()
        }
        ResourceKind::Plural(p) => {
            let plurals = if translated {
                p.target_plurals()
            } else {
                Some(p.source_plurals())
            };
            plurals
                .map(|m| {
                    m.iter()
                        .map(|(cat, t)| (0, cat.as_str().to_string(), t.clone()))
                        .collect()
                })
                .unwrap_or_default()
        }
    };

    texts
        .into_iter()
        .enumerate()
        .map(|(n, (ordinal, plural_class, text))| ResourceRow {
            id: None,
            reskey: r.key().to_string(),
            text,
            path_name: r.path_name().to_string(),
            locale: r.locale().to_string(),
            context: r.context().unwrap_or_default().to_string(),
            auto_key: r.auto_key(),
            project: r.project().to_string(),
            res_type: r.res_type().as_str().to_string(),
            comment: r.comment().map(str::to_string),
            ordinal,
            plural_class,
            state: r.state().map(|s| s.as_str().to_string()),
            datatype: r.datatype().map(str::to_string),
            flavor: r.flavor().unwrap_or_default().to_string(),
            dnt: r.dnt(),
            source_locale: r.source_locale().to_string(),
            first: n == 0,
        })
        .collect()
}

/// Content of one group of rows, in the shape of the property bag fields.
enum GroupText {
    String(String),
    Array(Vec<String>),
    Plural(std::collections::BTreeMap<String, String>),
}

fn group_text(res_type: ResType, rows: &[ResourceRow]) -> GroupText {
    match res_type {
        ResType::String => GroupText::String(
            rows.first().map(|r| r.text.clone()).unwrap_or_default(),
        ),
        ResType::Array => {
            let len = rows.iter().map(|r| r.ordinal + 1).max().unwrap_or(0).max(0) as usize;
            let mut items = vec![String::new(); len];
            for r in rows {
                if let Some(slot) = usize::try_from(r.ordinal).ok().and_then(|i| items.get_mut(i)) {
                    *slot = r.text.clone();
                }
            }
            GroupText::Array(items)
        }
        ResType::Plural => GroupText::Plural(
            rows.iter()
                .map(|r| (r.plural_class.clone(), r.text.clone()))
                .collect(),
        ),
    }
}

fn apply_text(props: &mut ResourceProps, text: GroupText, as_target: bool) {
    match (text, as_target) {
        (GroupText::String(s), false) => props.source = Some(s),
        (GroupText::String(s), true) => props.target = Some(s),
        (GroupText::Array(a), false) => props.source_array = Some(a),
        (GroupText::Array(a), true) => props.target_array = Some(a),
        (GroupText::Plural(p), false) => props.source_strings = Some(p),
        (GroupText::Plural(p), true) => props.target_strings = Some(p),
    }
}

/// Rebuilds resources from rows (in id order). A translation picks up its
/// source text from the source-locale rows of the same result, when present.
/// `default_source_locale` stands in for rows that recorded none.
fn rows_to_resources(rows: Vec<ResourceRow>, default_source_locale: &str) -> Vec<Resource> {
    let mut order: Vec<Vec<ResourceRow>> = Vec::new();
    let mut index: HashMap<(String, String, String, String, String, String), usize> = HashMap::new();
    for row in rows {
        let key = row.group_key();
        match index.get(&key) {
            Some(&i) => order[i].push(row),
            None => {
                index.insert(key, order.len());
                order.push(vec![row]);
            }
        }
    }

    let row_source_locale = |row: &ResourceRow| {
        if row.source_locale.is_empty() {
            default_source_locale.to_string()
        } else {
            row.source_locale.clone()
        }
    };
    let source_group = |first: &ResourceRow, source_locale: &str| {
        let mut key = first.group_key();
        key.2 = source_locale.to_string();
        index.get(&key).map(|&i| &order[i])
    };

    let mut out = Vec::with_capacity(order.len());
    for group in &order {
        let first = &group[0];
        let res_type: ResType = first.res_type.parse().unwrap_or_default();
        let source_locale = row_source_locale(first);
        let is_source = first.locale == source_locale;

        let mut props = ResourceProps {
            res_type: Some(res_type.as_str().to_string()),
            datatype: first.datatype.clone(),
            project: first.project.clone(),
            context: Some(first.context.clone()).filter(|c| !c.is_empty()),
            source_locale: Some(source_locale.clone()),
            target_locale: (!is_source).then(|| first.locale.clone()),
            key: first.reskey.clone(),
            path_name: first.path_name.clone(),
            auto_key: first.auto_key,
            state: first.state.clone(),
            id: first.id,
            comment: first.comment.clone(),
            dnt: first.dnt,
            flavor: Some(first.flavor.clone()).filter(|f| !f.is_empty()),
            ..Default::default()
        };

        apply_text(&mut props, group_text(res_type, group), !is_source);
        if !is_source {
            if let Some(src) = source_group(first, &source_locale) {
                apply_text(&mut props, group_text(res_type, src), false);
            }
        }
        out.push(factory::new_resource(Some(props)));
    }
    out
}

fn push_filter(
    clauses: &mut Vec<String>,
    params: &mut Vec<Box<dyn ToSql>>,
    column: &str,
    value: Option<&OneOrMany>,
) {
    let Some(value) = value else {
        return;
    };
    let values = value.values();
    if values.is_empty() {
        clauses.push("0".to_string());
        return;
    }

    let start = params.len() + 1;
    let placeholders: Vec<String> = (start..start + values.len()).map(|i| format!("?{i}")).collect();
    clauses.push(format!("{column} IN ({})", placeholders.join(", ")));
    for v in values {
        params.push(Box::new(v.to_string()));
    }
}

pub struct DbTranslationSet {
    conn: Connection,
    source_locale: String,
    batch_size: usize,
}

impl DbTranslationSet {
    pub fn open(path: &Path, source_locale: &str, batch_size: usize) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!("[DB] opened {}", path.display());
        Self::init(conn, source_locale, batch_size)
    }

    pub fn open_in_memory(source_locale: &str) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, source_locale, MAX_BATCH_SIZE)
    }

    fn init(conn: Connection, source_locale: &str, batch_size: usize) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        if conn.prepare("SELECT sourceLocale FROM Resources LIMIT 0").is_err() {
            info!("[DB] adding sourceLocale column");
            conn.execute_batch(ADD_SOURCE_LOCALE_SQL)?;
        }
        Ok(Self {
            conn,
            source_locale: source_locale.to_string(),
            batch_size: batch_size.clamp(1, MAX_BATCH_SIZE),
        })
    }

    pub fn source_locale(&self) -> &str {
        &self.source_locale
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Writes one chunk in its own transaction. Dropping the transaction on
    /// error rolls the chunk back.
    fn write_chunk(&mut self, chunk: &[ResourceRow]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut affected = 0usize;
        {
            let mut delete = tx.prepare_cached(DELETE_SQL)?;
            let mut insert = tx.prepare_cached(INSERT_SQL)?;
            for row in chunk {
                if row.first {
                    delete.execute(params![
                        row.project,
                        row.context,
                        row.locale,
                        row.reskey,
                        row.res_type,
                        row.flavor
                    ])?;
                }
                affected += insert.execute(params![
                    row.reskey,
                    row.text,
                    row.path_name,
                    row.locale,
                    row.context,
                    row.auto_key,
                    row.project,
                    row.res_type,
                    row.comment,
                    row.ordinal,
                    row.plural_class,
                    row.state,
                    row.datatype,
                    row.flavor,
                    row.dnt,
                    row.source_locale
                ])?;
            }
        }
        tx.commit()?;
        Ok(affected)
    }

    /// Pushes the NOT NULL columns down to SQL; the rest is filtered after
    /// the resources are rebuilt.
    fn query_rows(&self, criteria: &Criteria) -> Result<Vec<ResourceRow>> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        push_filter(&mut clauses, &mut params, "project", criteria.project.as_ref());
        push_filter(&mut clauses, &mut params, "context", criteria.context.as_ref());
        push_filter(&mut clauses, &mut params, "reskey", criteria.key.as_ref());
        push_filter(&mut clauses, &mut params, "resType", criteria.res_type.as_ref());
        push_filter(&mut clauses, &mut params, "pathName", criteria.path_name.as_ref());
        push_filter(&mut clauses, &mut params, "flavor", criteria.flavor.as_ref());
        if let Some(auto_key) = criteria.auto_key {
            clauses.push(format!("autoKey = ?{}", params.len() + 1));
            params.push(Box::new(auto_key));
        }
        if let Some(dnt) = criteria.dnt {
            clauses.push(format!("dnt = ?{}", params.len() + 1));
            params.push(Box::new(dnt));
        }

        let mut sql = format!("SELECT {COLUMNS} FROM Resources");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), ResourceRow::from_sql)?
            .filter_map(log_and_skip_err)
            .collect();
        Ok(rows)
    }

    /// Deletes every row.
    pub fn clear(&mut self) -> Result<usize> {
        let n = self.conn.execute("DELETE FROM Resources", [])?;
        info!("[DB] cleared {n} rows");
        Ok(n)
    }

    fn distinct(&self, column: &str, filter: &str, args: &[&dyn ToSql]) -> Result<Option<Vec<String>>> {
        let sql = format!(
            "SELECT {column} FROM Resources {filter} GROUP BY {column} ORDER BY MIN(id)"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let values: Vec<String> = stmt
            .query_map(args, |row| row.get(0))?
            .filter_map(log_and_skip_err)
            .collect();
        Ok(if values.is_empty() { None } else { Some(values) })
    }

    pub fn get_projects(&self) -> Result<Option<Vec<String>>> {
        self.distinct("project", "", &[])
    }

    /// Root context is reported as "".
    pub fn get_contexts(&self, project: &str) -> Result<Option<Vec<String>>> {
        self.distinct("context", "WHERE project = ?1", &[&project])
    }

    pub fn get_locales(&self, project: &str, context: Option<&str>) -> Result<Option<Vec<String>>> {
        let context = context.unwrap_or_default();
        self.distinct(
            "locale",
            "WHERE project = ?1 AND context = ?2",
            &[&project, &context],
        )
    }
}

impl TranslationRepository for DbTranslationSet {
    /// Writes the set in chunks of at most `batch_size` rows, one transaction
    /// per chunk. A failing chunk is rolled back and the remaining chunks are
    /// not attempted; chunks already committed stay.
    fn add_all(&mut self, set: &TranslationSet) -> Result<usize> {
        let rows: Vec<ResourceRow> = set.iter().flat_map(resource_rows).collect();
        let total_chunks = rows.len().div_ceil(self.batch_size);

        let mut affected = 0usize;
        for (n, chunk) in rows.chunks(self.batch_size).enumerate() {
            match self.write_chunk(chunk) {
                Ok(count) => {
                    debug!("[DB] chunk {}/{total_chunks}: {count} rows", n + 1);
                    affected += count;
                }
                Err(e) => {
                    warn!(
                        "[DB] chunk {}/{total_chunks} failed, {} chunks not written: {e}",
                        n + 1,
                        total_chunks - n - 1
                    );
                    return Err(e);
                }
            }
        }

        info!("[DB] wrote {affected} rows for {} resources", set.size());
        Ok(affected)
    }

    fn get_by(&self, criteria: &Criteria) -> Result<Vec<Resource>> {
        let rows = self.query_rows(criteria)?;
        let resources = rows_to_resources(rows, &self.source_locale);
        Ok(resources.into_iter().filter(|r| criteria.matches(r)).collect())
    }

    fn remove(&mut self, resource: &Resource) -> Result<usize> {
        let n = self.conn.execute(
            DELETE_SQL,
            params![
                resource.project(),
                resource.context().unwrap_or_default(),
                resource.locale(),
                resource.key(),
                resource.res_type().as_str(),
                resource.flavor().unwrap_or_default()
            ],
        )?;
        debug!("[DB] removed {n} rows for {}", resource.hash_key());
        Ok(n)
    }

    /// Number of rows, not resources.
    fn size(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Resources", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plural::plural_strings_from;

    fn db() -> DbTranslationSet {
        DbTranslationSet::open_in_memory("en-US").expect("in-memory db")
    }

    fn set_of(resources: Vec<Resource>) -> TranslationSet {
        let mut ts = TranslationSet::new(Some("en-US"));
        ts.add_all(resources);
        ts
    }

    #[test]
    fn array_writes_one_row_per_item() {
        let mut db = db();
        let ts = set_of(vec![
            Resource::new_array("days", ["a", "b", "c", "d"]).with_project("web")
        ]);
        assert_eq!(db.add_all(&ts).expect("writes"), 4);
        assert_eq!(db.size().expect("size"), 4);

        let back = db.get_by(&Criteria::new().key("days")).expect("query");
        assert_eq!(back.len(), 1);
        assert_eq!(
            back[0].as_array().map(|a| a.source_array()),
            Some(vec!["a".to_string(), "b".into(), "c".into(), "d".into()])
        );
    }

    #[test]
    fn empty_array_writes_nothing() {
        let mut db = db();
        let empty: [&str; 0] = [];
        let ts = set_of(vec![Resource::new_array("none", empty)]);
        assert_eq!(db.add_all(&ts).expect("writes"), 0);
        assert_eq!(db.size().expect("size"), 0);
    }

    #[test]
    fn plural_and_translation_round_trip() {
        let mut db = db();
        let src = Resource::new_plural(
            "files",
            plural_strings_from([("one", "{n} file"), ("other", "{n} files")]),
        )
        .with_project("web");
        let mut de = src.clone().with_target_locale("de-DE");
        if let ResourceKind::Plural(p) = de.kind_mut() {
            p.set_target_plurals(Some(plural_strings_from([
                ("one", "{n} Datei"),
                ("other", "{n} Dateien"),
            ])));
        }
        let ts = set_of(vec![src, de]);
        assert_eq!(db.add_all(&ts).expect("writes"), 4);

        let back = db.get_by(&Criteria::new().locale("de-DE")).expect("query");
        assert_eq!(back.len(), 1);
        let p = back[0].as_plural().expect("plural");
        assert_eq!(p.source_plurals().len(), 2);
        assert_eq!(
            p.target_plural(crate::model::plural::PluralCategory::Other),
            Some("{n} Dateien")
        );
    }

    #[test]
    fn source_locale_survives_a_foreign_database() {
        let mut db = db();
        let r = Resource::new_string("asdf", "This is a test")
            .with_project("a")
            .with_context("b")
            .with_source_locale("de-DE");
        db.add_all(&set_of(vec![r])).expect("writes");

        let back = db.get_by(&Criteria::new().key("asdf")).expect("query");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].source(), Some("This is a test"));
        assert_eq!(back[0].target(), None);
        assert_eq!(back[0].source_locale(), "de-DE");
        assert_eq!(back[0].target_locale(), None);
    }

    #[test]
    fn translation_finds_its_own_source_rows() {
        let mut db = db();
        let src = Resource::new_string("k", "Hallo").with_source_locale("de-DE");
        let mut fr = src.clone().with_target_locale("fr-FR");
        fr.set_target("Bonjour");
        db.add_all(&set_of(vec![src, fr])).expect("writes");

        let back = db.get_by(&Criteria::new().locale("fr-FR")).expect("query");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].source(), Some("Hallo"));
        assert_eq!(back[0].target(), Some("Bonjour"));
        assert_eq!(back[0].source_locale(), "de-DE");
    }

    #[test]
    fn older_tables_gain_the_source_locale_column() {
        let conn = Connection::open_in_memory().expect("conn");
        conn.execute_batch(
            "CREATE TABLE Resources (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                reskey TEXT NOT NULL, text TEXT NOT NULL,
                pathName TEXT NOT NULL DEFAULT '', locale TEXT NOT NULL,
                context TEXT NOT NULL DEFAULT '', autoKey INTEGER NOT NULL DEFAULT 0,
                project TEXT NOT NULL DEFAULT '', resType TEXT NOT NULL DEFAULT 'string',
                comment TEXT, ordinal INTEGER NOT NULL DEFAULT 0,
                pluralClass TEXT NOT NULL DEFAULT '', state TEXT, datatype TEXT,
                flavor TEXT NOT NULL DEFAULT '', dnt INTEGER NOT NULL DEFAULT 0);
             INSERT INTO Resources (reskey, text, locale) VALUES ('k', 'Hello', 'en-US');",
        )
        .expect("legacy schema");

        let db = DbTranslationSet::init(conn, "en-US", MAX_BATCH_SIZE).expect("migrates");
        let back = db.get_by(&Criteria::new()).expect("query");
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].source_locale(), "en-US");
        assert_eq!(back[0].target_locale(), None);
    }

    #[test]
    fn rewriting_a_resource_replaces_its_rows() {
        let mut db = db();
        db.add_all(&set_of(vec![Resource::new_array("k", ["a", "b", "c"])]))
            .expect("writes");
        db.add_all(&set_of(vec![Resource::new_array("k", ["x"])]))
            .expect("writes");
        assert_eq!(db.size().expect("size"), 1);
    }

    #[test]
    fn chunks_respect_batch_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut db = DbTranslationSet::open(&dir.path().join("t.db"), "en-US", 2).expect("opens");
        let ts = set_of((0..5).map(|i| Resource::new_string(format!("k{i}"), "v")).collect());
        assert_eq!(db.add_all(&ts).expect("writes"), 5);
        assert_eq!(db.batch_size(), 2);
        db.close().expect("closes");

        let db = DbTranslationSet::open(&dir.path().join("t.db"), "en-US", 5000).expect("reopens");
        assert_eq!(db.batch_size(), MAX_BATCH_SIZE);
        assert_eq!(db.size().expect("size"), 5);
    }

    #[test]
    fn criteria_lists_become_in_clauses() {
        let mut db = db();
        let ts = set_of(vec![
            Resource::new_string("a", "A").with_project("p1"),
            Resource::new_string("b", "B").with_project("p2"),
            Resource::new_string("c", "C").with_project("p3"),
        ]);
        db.add_all(&ts).expect("writes");

        let got = db
            .get_by(&Criteria::new().project(vec!["p1".to_string(), "p3".to_string()]))
            .expect("query");
        let keys: Vec<&str> = got.iter().map(Resource::key).collect();
        assert_eq!(keys, ["a", "c"]);
        assert_eq!(
            db.get_projects().expect("projects"),
            Some(vec!["p1".to_string(), "p2".into(), "p3".into()])
        );
    }

    #[test]
    fn remove_and_clear() {
        let mut db = db();
        let r = Resource::new_string("a", "A").with_project("p").with_context("c");
        db.add_all(&set_of(vec![r.clone(), Resource::new_string("b", "B")]))
            .expect("writes");
        assert_eq!(db.get_contexts("p").expect("contexts"), Some(vec!["c".to_string()]));
        assert_eq!(db.remove(&r).expect("removes"), 1);
        assert_eq!(db.size().expect("size"), 1);
        assert_eq!(db.clear().expect("clears"), 1);
        assert_eq!(db.size().expect("size"), 0);
        assert_eq!(db.get_projects().expect("projects"), None);
    }
}
