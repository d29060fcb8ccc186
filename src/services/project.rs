use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::project::ProjectConfig;
use crate::services::{locale, store};

const PROJECT_FILE: &str = "project.json";

pub fn open_project(project_path: &Path) -> Result<ProjectConfig> {
    let path = project_path.join(PROJECT_FILE);

    if !path.exists() {
        return Err(Error::Config(format!("{} not found", path.display())));
    }

    let data = fs::read_to_string(&path)?;
    let mut config: ProjectConfig = serde_json::from_str(&data)
        .map_err(|e| Error::Config(format!("invalid {PROJECT_FILE}: {e}")))?;

    if config.project_path.trim().is_empty() {
        config.project_path = project_path.to_string_lossy().to_string();
    }

    validate(&config)?;
    Ok(config)
}

pub fn save_project(mut config: ProjectConfig) -> Result<ProjectConfig> {
    if config.project_path.trim().is_empty() {
        return Err(Error::Config("projectPath is required".into()));
    }
    let project_dir = PathBuf::from(config.project_path.trim());

    validate(&config)?;

    fs::create_dir_all(&project_dir)?;
    config.project_path = project_dir.to_string_lossy().to_string();

    let json = serde_json::to_string_pretty(&config)?;
    store::write_atomic(&project_dir.join(PROJECT_FILE), json.as_bytes())?;

    Ok(config)
}

/// Directory holding the project's exchange files.
pub fn xliff_dir(config: &ProjectConfig) -> PathBuf {
    let dir = Path::new(&config.xliff_dir);
    if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        Path::new(&config.project_path).join(dir)
    }
}

/// SQLite file of the project, if one is configured.
pub fn db_path(config: &ProjectConfig) -> Option<PathBuf> {
    let p = Path::new(config.db_path.as_deref()?);
    Some(if p.is_absolute() {
        p.to_path_buf()
    } else {
        Path::new(&config.project_path).join(p)
    })
}

fn validate(config: &ProjectConfig) -> Result<()> {
    locale::parse_locale(&config.source_locale)?;
    for l in &config.target_locales {
        locale::parse_locale(l)?;
    }
    Ok(())
}
