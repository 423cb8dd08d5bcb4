//! 容器配置源
//!
//! 依次合并可选的配置文件和 `LORN_DI` 前缀的环境变量，后者优先。
//! 嵌套字段用 `__` 分隔，例如 `LORN_DI__CONTAINER__IMPLICIT_CONSTRUCTORS=false`，
//! 扫描包列表用逗号分隔：`LORN_DI__SCAN_PACKAGES=app::web,app::jobs`。

use crate::component_scanner::is_valid_module_path;
use di_abstractions::ContainerOptions;
use infrastructure_common::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LORN_DI";

/// 环境变量层级分隔符
pub const ENV_SEPARATOR: &str = "__";

/// 容器设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSettings {
    /// 扫描包（模块路径前缀）
    pub scan_packages: Vec<String>,
    /// 引擎配置
    pub container: ContainerOptions,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` 过滤指令，如 `info,di_impl=debug`
    pub filter: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LoggingSettings {
    /// 生产环境日志配置
    pub fn production() -> Self {
        Self {
            filter: "info".to_string(),
            json: true,
            show_target: false,
            show_thread_ids: false,
        }
    }
}

impl ContainerSettings {
    /// 从配置文件（可选）和环境变量加载
    ///
    /// 文件格式按扩展名识别，支持 toml、json、yaml。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(path, None)
    }

    /// 只从环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// 使用指定的环境变量表加载，`None` 时读取进程环境
    pub fn load_from(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            info!("加载容器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("scan_packages")
                .source(env),
        );

        let settings: Self = builder
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigError::ParseError { source: e.into() })?;

        settings.validate()?;
        debug!(?settings, "容器配置加载完成");
        Ok(settings)
    }

    /// 验证配置，所有问题一次性报告
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = self
            .scan_packages
            .iter()
            .filter(|package| !is_valid_module_path(package))
            .map(|package| format!("scan_packages: 无效的包名 '{package}'"))
            .collect();

        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter: 不能为空".to_string());
        } else if let Err(e) = EnvFilter::try_new(&self.logging.filter) {
            errors.push(format!("logging.filter: {e}"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationFailed { errors })
        }
    }
}
