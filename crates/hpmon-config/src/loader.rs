use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat, Map};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::GlobalConfig;

/// 环境变量前缀，形如 `HPMON__MODBUS__SERIAL_PORT`
pub const ENV_PREFIX: &str = "HPMON";

/// 配置加载器
///
/// 优先级：环境变量 > TOML 文件 > 内置默认值。
pub struct ConfigLoader {
    path: PathBuf,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            env: None,
        }
    }

    /// 用给定的变量表代替进程环境
    pub fn with_environment(mut self, vars: Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// 加载并验证全局配置；文件不存在时使用默认值
    pub fn load(&self) -> Result<GlobalConfig> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Config file not found, using defaults");
        }

        let config = Config::builder()
            .add_source(
                File::from(self.path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(self.env.clone()),
            )
            .build()
            .with_context(|| format!("Failed to read config {:?}", self.path))?;

        let global: GlobalConfig = config
            .try_deserialize()
            .with_context(|| format!("Invalid config {:?}", self.path))?;
        global.validate()?;

        Ok(global)
    }
}
