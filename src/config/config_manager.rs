// ==========================================
// 留置质量报表系统 - 配置管理器
// ==========================================
// 职责: 会话配置的加载、保存（JSON 文件）
// 存储: {config_dir}/retention-report/session.json
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::report_config::ReportConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 应用配置目录名
const APP_DIR_NAME: &str = "retention-report";

/// 会话配置文件名
const SESSION_FILE_NAME: &str = "session.json";

/// 默认会话配置路径
///
/// # 返回
/// - Ok(PathBuf): {config_dir}/retention-report/session.json
/// - Err(NoConfigDir): 当前平台无配置目录
pub fn default_config_path() -> ConfigResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(SESSION_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 使用默认路径创建
    pub fn with_default_path() -> ConfigResult<Self> {
        Ok(Self::new(default_config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取配置（文件必须存在）
    pub fn load(&self) -> ConfigResult<ReportConfig> {
        let raw = fs::read_to_string(&self.path).map_err(|e| ConfigError::FileError {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: ReportConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;

        info!(path = %self.path.display(), "会话配置已加载");
        Ok(config)
    }

    /// 读取配置，文件不存在时返回默认配置
    pub fn load_or_default(&self) -> ConfigResult<ReportConfig> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "配置文件不存在，使用默认配置");
            return Ok(ReportConfig::default());
        }
        self.load()
    }

    /// 保存配置（自动创建父目录）
    pub fn save(&self, config: &ReportConfig) -> ConfigResult<()> {
        config.validate()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::FileError {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::ParseError {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|e| ConfigError::FileError {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(path = %self.path.display(), "会话配置已保存");
        Ok(())
    }
}
