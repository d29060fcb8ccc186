use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::info;

use crate::model::criteria::Criteria;
use crate::model::project::{ProjectConfig, MAX_BATCH_SIZE};
use crate::model::translation_set::TranslationSet;
use crate::services::db::DbTranslationSet;
use crate::services::local_repo::LocalRepository;
use crate::services::project as service;
use crate::services::repository::TranslationRepository;

use super::set::resources_json;
use super::{get_field, get_str, Command, Reply, Session};

fn text(e: crate::Error) -> String {
    e.to_string()
}

/// `payload.dir`, else the open project's exchange directory.
fn exchange_dir(session: &Session, payload: &Value) -> Result<PathBuf, String> {
    let dir = get_str(payload, "dir");
    if !dir.is_empty() {
        return Ok(PathBuf::from(dir));
    }
    session
        .project
        .as_ref()
        .map(service::xliff_dir)
        .ok_or_else(|| "payload.dir is required when no project is open".to_string())
}

/// `payload.db_path`, else the open project's database.
fn database_path(session: &Session, payload: &Value) -> Result<PathBuf, String> {
    let path = get_str(payload, "db_path");
    if !path.is_empty() {
        return Ok(PathBuf::from(path));
    }
    session
        .project
        .as_ref()
        .and_then(service::db_path)
        .ok_or_else(|| "payload.db_path is required when the project has no dbPath".to_string())
}

fn batch_size(session: &Session) -> usize {
    session
        .project
        .as_ref()
        .map_or(MAX_BATCH_SIZE, ProjectConfig::effective_batch_size)
}

fn open_db(session: &Session, path: &Path) -> Result<DbTranslationSet, String> {
    DbTranslationSet::open(path, session.source_locale(), batch_size(session)).map_err(text)
}

pub(super) fn handle(session: &mut Session, cmd: Command, payload: &Value) -> Reply {
    match cmd {
        Command::ProjectOpen => {
            let project_path = get_str(payload, "project_path");
            if project_path.is_empty() {
                return Err("payload.project_path is required".into());
            }

            let config = service::open_project(Path::new(project_path)).map_err(text)?;
            info!("[Protocol] opened project '{}'", config.name);
            session.set = TranslationSet::new(Some(&config.source_locale));
            session.project = Some(config.clone());
            Ok(json!({ "project": config }))
        }

        Command::ProjectSave => {
            let config: Option<ProjectConfig> = get_field(payload, "project")?;
            let config = config.ok_or_else(|| "payload.project is required".to_string())?;

            let saved = service::save_project(config).map_err(text)?;
            session.project = Some(saved.clone());
            Ok(json!({ "project": saved }))
        }

        Command::RepoLoad => {
            let dir = exchange_dir(session, payload)?;
            let repo = LocalRepository::open(&dir, session.source_locale()).map_err(text)?;
            let loaded = repo.translation_set().size();
            session.set.add_set(repo.translation_set());
            Ok(json!({ "loaded": loaded, "size": session.set.size() }))
        }

        Command::RepoSave => {
            let dir = exchange_dir(session, payload)?;
            let mut repo = LocalRepository::new(&dir, session.source_locale());
            repo.add_all(&session.set).map_err(text)?;
            let files = repo.save().map_err(text)?;
            session.set.set_clean();
            Ok(json!({ "files": files }))
        }

        Command::DbImport => {
            let path = database_path(session, payload)?;
            let mut db = open_db(session, &path)?;
            let rows = db.add_all(&session.set).map_err(text)?;
            db.close().map_err(text)?;
            Ok(json!({ "affectedRows": rows }))
        }

        Command::DbQuery => {
            let path = database_path(session, payload)?;
            let criteria: Option<Criteria> = get_field(payload, "criteria")?;
            let db = open_db(session, &path)?;
            let found = db.get_by(&criteria.unwrap_or_default()).map_err(text)?;
            db.close().map_err(text)?;
            Ok(json!({ "resources": resources_json(found.iter()) }))
        }

        _ => Err("unknown command".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(session: &mut Session) {
        let mut de = crate::model::resource::Resource::new_string("hello", "Hello")
            .with_project("web")
            .with_target_locale("de-DE");
        de.set_target("Hallo");
        session.set.add(de);
        session
            .set
            .add(crate::model::resource::Resource::new_string("hello", "Hello").with_project("web"));
    }

    #[test]
    fn repo_save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = Session::new();
        seed(&mut s);

        let payload = json!({ "dir": dir.path().to_string_lossy() });
        let saved = handle(&mut s, Command::RepoSave, &payload).expect("saves");
        assert_eq!(saved["files"], 2);

        let mut fresh = Session::new();
        let loaded = handle(&mut fresh, Command::RepoLoad, &payload).expect("loads");
        assert_eq!(loaded["size"], 2);
    }

    #[test]
    fn repo_needs_a_directory() {
        let mut s = Session::new();
        let e = handle(&mut s, Command::RepoLoad, &json!({})).expect_err("no dir");
        assert!(e.contains("payload.dir"));
    }

    #[test]
    fn db_import_then_query() {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir.path().join("res.db");
        let mut s = Session::new();
        seed(&mut s);

        let payload = json!({ "db_path": db_path.to_string_lossy() });
        let out = handle(&mut s, Command::DbImport, &payload).expect("imports");
        assert_eq!(out["affectedRows"], 2);

        let q = json!({
            "db_path": db_path.to_string_lossy(),
            "criteria": { "targetLocale": "de-DE" }
        });
        let out = handle(&mut s, Command::DbQuery, &q).expect("queries");
        assert_eq!(out["resources"][0]["target"], "Hallo");
        assert_eq!(out["resources"][0]["source"], "Hello");
    }

    #[test]
    fn project_save_then_open_resets_the_set() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut s = Session::new();
        seed(&mut s);

        let project = json!({
            "name": "demo",
            "projectPath": dir.path().to_string_lossy(),
            "sourceLocale": "fr-FR",
            "targetLocales": ["de-DE"]
        });
        handle(&mut s, Command::ProjectSave, &json!({ "project": project })).expect("saves");

        let opened = handle(
            &mut s,
            Command::ProjectOpen,
            &json!({ "project_path": dir.path().to_string_lossy() }),
        )
        .expect("opens");
        assert_eq!(opened["project"]["sourceLocale"], "fr-FR");
        assert_eq!(s.source_locale(), "fr-FR");
        assert_eq!(s.set.size(), 0);
    }
}
