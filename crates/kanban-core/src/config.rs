use crate::board::{BoardOptions, GroupDimension, SortKey};
use crate::error::BoardError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Upstream endpoint serving the ticket payload.
pub const DEFAULT_SOURCE_URL: &str = "https://api.quicksell.co/v1/internal/frontend-assignment";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One configuration file, project or user scope. Every key is optional so
/// files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub board: BoardSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSection {
    #[serde(default)]
    pub group_by: Option<String>,
    #[serde(default)]
    pub order_by: Option<String>,
    #[serde(default)]
    pub skip_invalid: Option<bool>,
}

/// Environment overrides, captured once so resolution stays testable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub source_url: Option<String>,
}

impl EnvOverrides {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            source_url: env::var("KANBAN_SOURCE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSettings {
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSettings {
    pub group_by: GroupDimension,
    pub order_by: SortKey,
    pub skip_invalid: bool,
}

impl BoardSettings {
    #[must_use]
    pub const fn options(&self) -> BoardOptions {
        BoardOptions {
            dimension: self.group_by,
            sort: self.order_by,
        }
    }
}

/// Fully resolved settings: env over project file over user file over defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub source: SourceSettings,
    pub board: BoardSettings,
    pub output: Option<String>,
}

#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".kanban/config.toml")
}

#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("kanban/config.toml"))
}

fn load_file(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<FileConfig>(&content).map_err(|err| {
        BoardError::Config {
            path: path.display().to_string(),
            message: err.message().to_string(),
        }
        .into()
    })
}

pub fn load_project_config(project_root: &Path) -> Result<FileConfig> {
    load_file(&project_config_path(project_root))
}

pub fn load_user_config() -> Result<FileConfig> {
    let Some(path) = user_config_path() else {
        return Ok(FileConfig::default());
    };
    load_file(&path)
}

pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    layer(&project, &user, &EnvOverrides::from_env())
}

/// Merge the layers. Option names are validated here so a typo in a config
/// file fails with the same error as a typo on the command line.
pub fn layer(
    project: &FileConfig,
    user: &FileConfig,
    env: &EnvOverrides,
) -> Result<EffectiveConfig> {
    let url = env
        .source_url
        .clone()
        .or_else(|| project.source.url.clone())
        .or_else(|| user.source.url.clone())
        .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

    let timeout_secs = project
        .source
        .timeout_secs
        .or(user.source.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let group_by = match project.board.group_by.as_ref().or(user.board.group_by.as_ref()) {
        Some(raw) => raw.parse::<GroupDimension>()?,
        None => GroupDimension::default(),
    };

    let order_by = match project.board.order_by.as_ref().or(user.board.order_by.as_ref()) {
        Some(raw) => raw.parse::<SortKey>()?,
        None => SortKey::default(),
    };

    let skip_invalid = project
        .board
        .skip_invalid
        .or(user.board.skip_invalid)
        .unwrap_or(false);

    Ok(EffectiveConfig {
        source: SourceSettings { url, timeout_secs },
        board: BoardSettings {
            group_by,
            order_by,
            skip_invalid,
        },
        output: project.output.clone().or_else(|| user.output.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn make_temp_dir(label: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("kanban-config-test-{label}-{id}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("temp dir must be created");
        dir
    }

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = make_temp_dir("project-default");
        let project = load_project_config(&root).expect("load should succeed");
        assert_eq!(project, FileConfig::default());

        let cfg = layer(&project, &FileConfig::default(), &EnvOverrides::default())
            .expect("defaults resolve");
        assert_eq!(cfg.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(cfg.source.timeout_secs, 10);
        assert_eq!(cfg.board.group_by, GroupDimension::ByStatus);
        assert_eq!(cfg.board.order_by, SortKey::ByPriorityDescending);
        assert!(!cfg.board.skip_invalid);
        assert!(cfg.output.is_none());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn project_file_is_parsed() {
        let root = make_temp_dir("project-file");
        std::fs::create_dir_all(root.join(".kanban")).expect("create .kanban");
        std::fs::write(
            project_config_path(&root),
            r#"
output = "json"

[source]
url = "http://localhost:8080/tickets"
timeout_secs = 3

[board]
group_by = "userId"
order_by = "title"
skip_invalid = true
"#,
        )
        .expect("write config");

        let project = load_project_config(&root).expect("parse");
        let cfg = layer(&project, &FileConfig::default(), &EnvOverrides::default())
            .expect("resolve");
        assert_eq!(cfg.source.url, "http://localhost:8080/tickets");
        assert_eq!(cfg.source.timeout_secs, 3);
        assert_eq!(
            cfg.board.options(),
            BoardOptions {
                dimension: GroupDimension::ByOwner,
                sort: SortKey::ByTitleAscending,
            }
        );
        assert!(cfg.board.skip_invalid);
        assert_eq!(cfg.output.as_deref(), Some("json"));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn malformed_project_file_reports_config_error() {
        let root = make_temp_dir("project-bad");
        std::fs::create_dir_all(root.join(".kanban")).expect("create .kanban");
        std::fs::write(project_config_path(&root), "[board\ngroup_by = ").expect("write");

        let err = load_project_config(&root).expect_err("must fail");
        let board_err = err.downcast_ref::<BoardError>().expect("typed error");
        assert!(matches!(board_err, BoardError::Config { .. }));
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn project_overrides_user_and_env_overrides_both() {
        let user = FileConfig {
            output: Some("text".into()),
            source: SourceSection {
                url: Some("http://user".into()),
                timeout_secs: Some(30),
            },
            board: BoardSection {
                group_by: Some("priority".into()),
                order_by: Some("title".into()),
                skip_invalid: Some(true),
            },
        };
        let project = FileConfig {
            output: None,
            source: SourceSection {
                url: Some("http://project".into()),
                timeout_secs: None,
            },
            board: BoardSection {
                group_by: Some("status".into()),
                order_by: None,
                skip_invalid: Some(false),
            },
        };

        let cfg = layer(&project, &user, &EnvOverrides::default()).expect("resolve");
        assert_eq!(cfg.source.url, "http://project");
        assert_eq!(cfg.source.timeout_secs, 30);
        assert_eq!(cfg.board.group_by, GroupDimension::ByStatus);
        assert_eq!(cfg.board.order_by, SortKey::ByTitleAscending);
        assert!(!cfg.board.skip_invalid);
        assert_eq!(cfg.output.as_deref(), Some("text"));

        let env = EnvOverrides {
            source_url: Some("http://env".into()),
        };
        let cfg = layer(&project, &user, &env).expect("resolve");
        assert_eq!(cfg.source.url, "http://env");
    }

    #[test]
    fn unknown_option_names_are_rejected() {
        let project = FileConfig {
            board: BoardSection {
                group_by: Some("tag".into()),
                ..BoardSection::default()
            },
            ..FileConfig::default()
        };
        let err = layer(&project, &FileConfig::default(), &EnvOverrides::default())
            .expect_err("must fail");
        assert_eq!(
            err.downcast_ref::<BoardError>(),
            Some(&BoardError::UnsupportedGroupDimension("tag".to_string()))
        );
    }
}
