use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// 配置结构版本号（用于未来的迁移/兼容）
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub dnd: DndConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            dnd: DndConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DndConfig {
    #[serde(default)]
    pub backend: PolicyBackend,
}

/// 通知策略后端的选择。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyBackend {
    /// 平台原生实现
    #[default]
    Native,
    /// 强制受限 handler（展台/测试安装用）
    Disabled,
}

fn default_schema_version() -> u32 {
    1
}

pub fn load_with_path() -> (ClientConfig, Option<PathBuf>) {
    for path in candidate_paths() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            if let Ok(config) = serde_json::from_str::<ClientConfig>(&content) {
                return (config, Some(path));
            }
        }
    }

    (ClientConfig::default(), None)
}

pub fn save_to_path(config: &ClientConfig, path: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let path = path.unwrap_or_else(default_save_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("create config dir")?;
        }
    }

    let content = serde_json::to_string_pretty(config).context("serialize config")?;
    std::fs::write(&path, content).context("write config")?;
    Ok(path)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(explicit) = std::env::var("MYNOTES_CONFIG") {
        paths.push(PathBuf::from(explicit));
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            paths.push(dir.join("config.json"));

            #[cfg(target_os = "macos")]
            if let Some(contents_dir) = dir.parent() {
                paths.push(contents_dir.join("Resources").join("config.json"));
            }
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config.json"));
    }

    paths
}

fn default_save_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join("config.json");
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        return cwd.join("config.json");
    }

    PathBuf::from("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_fills_every_default() {
        let config: ClientConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.schema_version, default_schema_version());
        assert_eq!(config.dnd.backend, PolicyBackend::Native);
    }

    #[test]
    fn backend_parses_from_snake_case() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "dnd": { "backend": "disabled" } }"#).expect("parse");
        assert_eq!(config.dnd.backend, PolicyBackend::Disabled);
    }

    #[test]
    fn explicit_env_path_is_checked_first() {
        let path = std::env::temp_dir().join(format!("mynotes-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "dnd": { "backend": "disabled" } }"#).expect("write config");
        std::env::set_var("MYNOTES_CONFIG", &path);

        let (config, found) = load_with_path();

        std::env::remove_var("MYNOTES_CONFIG");
        let _ = std::fs::remove_file(&path);

        assert_eq!(found.as_deref(), Some(path.as_path()));
        assert_eq!(config.dnd.backend, PolicyBackend::Disabled);
    }

    #[test]
    fn backend_survives_a_save_reload_cycle() {
        let config = ClientConfig {
            dnd: DndConfig {
                backend: PolicyBackend::Disabled,
            },
            ..ClientConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let reloaded: ClientConfig = serde_json::from_str(&json).expect("parse");
        assert_eq!(reloaded.dnd.backend, PolicyBackend::Disabled);
    }
}
