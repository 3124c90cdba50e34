use crate::models::AppConfig;
use anyhow::Context;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "resttable";
const APP_NAME: &str = "rest_table";

/// 获取配置文件路径: C:\Users\xxx\AppData\Local\resttable\rest_table\config.json
fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME) {
        let config_dir = proj_dirs.data_local_dir();
        // 确保目录存在
        if !config_dir.exists() {
            let _ = fs::create_dir_all(config_dir);
        }
        return config_dir.join("config.json");
    }
    // 回退方案：当前目录
    PathBuf::from("config.json")
}

/// 加载配置；第一次运行时把示例配置写到磁盘，方便用户修改
pub fn load_config() -> AppConfig {
    let path = get_config_path();
    let config = load_config_from(&path);
    if !path.exists() {
        if let Err(e) = save_config_to(&path, &config) {
            warn!("{e:#}");
        }
    }
    config
}

pub fn load_config_from(path: &Path) -> AppConfig {
    if !path.exists() {
        info!("No config at {}, using the demo tables", path.display());
        return AppConfig::default();
    }
    match read_config(path) {
        Ok(config) => config,
        Err(e) => {
            // 解析失败时返回默认值
            warn!("{e:#}");
            AppConfig::default()
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("malformed config {}", path.display()))
}

/// 保存配置
pub fn save_config_to(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
