//! Project Setup Module
//! Scaffolds the config file and checks the expected directory layout.

use crate::config::{ConfigError, DashboardConfig, CONFIG_FILE, TEMPLATE_FILE};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Directories the dashboard expects under the project root.
pub const REQUIRED_DIRS: [&str; 4] = ["data/raw", "data/processed", "data/external", "config"];

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Project root {0} does not exist")]
    RootMissing(PathBuf),
    #[error("Missing directories: {}", .0.join(", "))]
    MissingDirectories(Vec<String>),
    #[error("Failed to create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to copy config template: {0}")]
    CopyTemplate(#[source] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What happened to `config/dashboard.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    CopiedTemplate,
    WroteDefaults,
    AlreadyExists,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupReport {
    pub config_path: PathBuf,
    pub config_action: ConfigAction,
    pub created_dirs: Vec<String>,
}

impl SetupReport {
    pub fn summary(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.config_action {
            ConfigAction::CopiedTemplate => lines.push(format!(
                "Created {} from template. Edit it with your settings.",
                self.config_path.display()
            )),
            ConfigAction::WroteDefaults => lines.push(format!(
                "Created {} with default settings.",
                self.config_path.display()
            )),
            ConfigAction::AlreadyExists => {
                lines.push(format!("Config {} already exists.", self.config_path.display()))
            }
        }
        for dir in &self.created_dirs {
            lines.push(format!("Created directory {}", dir));
        }
        lines.push("All required directories exist.".to_string());
        lines
    }
}

/// Steps to follow once setup succeeds.
pub fn next_steps(config: &DashboardConfig) -> Vec<String> {
    vec![
        "Download a Steam dataset from Kaggle".to_string(),
        format!("Place the dataset in {}/", config.data.raw_dir.display()),
        format!("Update the dataset filename in {}", CONFIG_FILE),
        format!(
            "Clean it: steam-stats clean --input {} --output {}",
            config.raw_path().display(),
            config.processed_path().display()
        ),
        "Launch the dashboard: steam-stats dashboard".to_string(),
    ]
}

/// Create the config from the template (or defaults), then verify the layout.
/// With `create_dirs`, missing directories are created instead of reported.
pub fn run_setup(root: impl AsRef<Path>, create_dirs: bool) -> Result<SetupReport, SetupError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(SetupError::RootMissing(root.to_path_buf()));
    }

    let config_path = root.join(CONFIG_FILE);
    let config_action = create_config_file(root, &config_path)?;

    let mut created_dirs = Vec::new();
    let mut missing = Vec::new();
    for dir in REQUIRED_DIRS {
        let path = root.join(dir);
        if path.is_dir() {
            continue;
        }
        if create_dirs {
            fs::create_dir_all(&path).map_err(|source| SetupError::CreateDir {
                path: path.clone(),
                source,
            })?;
            info!("Created directory {}", path.display());
            created_dirs.push(dir.to_string());
        } else {
            missing.push(dir.to_string());
        }
    }

    if !missing.is_empty() {
        warn!("Project structure verification failed: {:?}", missing);
        return Err(SetupError::MissingDirectories(missing));
    }

    Ok(SetupReport {
        config_path,
        config_action,
        created_dirs,
    })
}

fn create_config_file(root: &Path, config_path: &Path) -> Result<ConfigAction, SetupError> {
    if config_path.exists() {
        info!("Config file already exists at {}", config_path.display());
        return Ok(ConfigAction::AlreadyExists);
    }

    let template = root.join(TEMPLATE_FILE);
    if template.is_file() {
        fs::copy(&template, config_path).map_err(SetupError::CopyTemplate)?;
        info!("Created {} from template", config_path.display());
        Ok(ConfigAction::CopiedTemplate)
    } else {
        DashboardConfig::default().write(config_path)?;
        info!("Created {} with defaults", config_path.display());
        Ok(ConfigAction::WroteDefaults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fresh_root_reports_missing_dirs() {
        let dir = tempdir().unwrap();
        let err = run_setup(dir.path(), false).unwrap_err();
        match err {
            SetupError::MissingDirectories(missing) => {
                assert_eq!(missing, vec!["data/raw", "data/processed", "data/external"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // config/ was created while writing the defaults
        assert!(dir.path().join(CONFIG_FILE).is_file());
    }

    #[test]
    fn create_dirs_scaffolds_everything() {
        let dir = tempdir().unwrap();
        let report = run_setup(dir.path(), true).unwrap();
        assert_eq!(report.config_action, ConfigAction::WroteDefaults);
        assert_eq!(report.created_dirs.len(), 3);
        for required in REQUIRED_DIRS {
            assert!(dir.path().join(required).is_dir());
        }

        let config = DashboardConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());

        let again = run_setup(dir.path(), false).unwrap();
        assert_eq!(again.config_action, ConfigAction::AlreadyExists);
        assert!(again.created_dirs.is_empty());
    }

    #[test]
    fn template_is_copied_verbatim() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let template = r#"{"dataset": {"filename": "games.csv"}}"#;
        fs::write(dir.path().join(TEMPLATE_FILE), template).unwrap();

        let report = run_setup(dir.path(), true).unwrap();
        assert_eq!(report.config_action, ConfigAction::CopiedTemplate);
        assert_eq!(
            fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap(),
            template
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempdir().unwrap();
        let err = run_setup(dir.path().join("absent"), true).unwrap_err();
        assert!(matches!(err, SetupError::RootMissing(_)));
    }

    #[test]
    fn next_steps_name_the_configured_paths() {
        let steps = next_steps(&DashboardConfig::default());
        assert!(steps.iter().any(|s| s.contains("data/raw/steam_dataset.csv")));
        assert!(steps.iter().any(|s| s.contains("data/processed/steam_clean.csv")));
    }
}
