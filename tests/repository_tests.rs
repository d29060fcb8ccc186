use std::fs;

use loctrans_core::model::{Criteria, Resource, TranslationSet};
use loctrans_core::{DbTranslationSet, LocalRepository, TranslationRepository};

fn sample() -> TranslationSet {
    let mut ts = TranslationSet::new(Some("en-US"));
    ts.add(Resource::new_string("greeting", "Hello").with_project("site"));
    ts.add(Resource::new_array("colors", ["red", "green", "blue"]).with_project("site"));
    let mut de = Resource::new_string("greeting", "Hello")
        .with_project("site")
        .with_target_locale("de-DE");
    de.set_target("Hallo");
    ts.add(de);
    ts
}

#[test]
fn local_repository_persists_across_instances() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut repo = LocalRepository::new(dir.path(), "en-US");
    repo.add_all(&sample()).expect("adds");
    repo.close().expect("closes");

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .expect("reads dir")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["de-DE.json", "en-US.json"]);

    let repo = LocalRepository::open(dir.path(), "en-US").expect("opens");
    assert_eq!(repo.size().expect("size"), 3);
    let colors = repo.get_by(&Criteria::new().key("colors")).expect("query");
    assert_eq!(colors[0].size(), 3);
}

#[test]
fn database_counts_rows_not_resources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("resources.db");

    let mut db = DbTranslationSet::open(&path, "en-US", 1000).expect("opens");
    assert_eq!(db.add_all(&sample()).expect("writes"), 5);
    assert_eq!(db.size().expect("size"), 5);
    db.close().expect("closes");

    let db = DbTranslationSet::open(&path, "en-US", 1000).expect("reopens");
    let de = db
        .get_by(&Criteria::new().target_locale("de-DE"))
        .expect("query");
    assert_eq!(de.len(), 1);
    assert_eq!(de[0].target(), Some("Hallo"));
    assert_eq!(de[0].source(), Some("Hello"));
}

#[test]
fn failing_batch_aborts_the_remaining_chunks() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("r.db");

    let mut db = DbTranslationSet::open(&path, "en-US", 2).expect("opens");
    db.close().expect("closes");

    // make the third chunk fail
    let conn = rusqlite::Connection::open(&path).expect("raw connection");
    conn.execute_batch(
        "CREATE TRIGGER reject_k4 BEFORE INSERT ON Resources WHEN NEW.reskey = 'k4'
         BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .expect("trigger");
    drop(conn);

    let mut ts = TranslationSet::new(Some("en-US"));
    ts.add_all((0..7).map(|i| Resource::new_string(format!("k{i}"), "v")));

    let mut db = DbTranslationSet::open(&path, "en-US", 2).expect("reopens");
    assert!(db.add_all(&ts).is_err());
    // chunks [k0,k1] and [k2,k3] committed, [k4,k5] rolled back, [k6] never written
    assert_eq!(db.size().expect("size"), 4);
}
