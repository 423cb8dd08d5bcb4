//! 容器启动器

use crate::builder::DiBuilder;
use crate::config_sources::{ContainerSettings, LoggingSettings};
use di_impl::Engine;
use infrastructure_common::InfrastructureError;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 容器启动器
///
/// 按配置初始化日志、扫描组件、应用手动绑定，最后初始化引擎。
pub struct Bootstrapper {
    /// 容器设置
    settings: ContainerSettings,
    /// 容器构建器
    builder: DiBuilder,
    /// 是否初始化日志
    logging_enabled: bool,
}

impl Bootstrapper {
    /// 使用指定设置创建启动器
    pub fn new(settings: ContainerSettings) -> Self {
        Self {
            settings,
            builder: DiBuilder::new(),
            logging_enabled: false,
        }
    }

    /// 从配置文件（可选）和环境变量加载设置
    pub fn from_config(path: Option<&Path>) -> Result<Self, InfrastructureError> {
        Ok(Self::new(ContainerSettings::load(path)?))
    }

    /// 配置手动绑定或替换组件发现器
    pub fn configure<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(DiBuilder) -> DiBuilder,
    {
        self.builder = configure(self.builder);
        self
    }

    /// 启用或禁用日志初始化
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 当前设置
    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    /// 启动容器
    pub fn bootstrap(self) -> Result<Engine, InfrastructureError> {
        if self.logging_enabled {
            init_logging(&self.settings.logging)?;
        }

        info!(packages = ?self.settings.scan_packages, "开始启动依赖注入容器");
        let engine = Engine::with_options(self.settings.container.clone());
        self.builder
            .scan_packages(self.settings.scan_packages)
            .build_and_init(&engine)?;

        info!(stats = ?engine.stats(), "依赖注入容器启动完成");
        Ok(engine)
    }
}

/// 初始化日志系统
///
/// 全局订阅者已经存在时保留原有的订阅者。
pub fn init_logging(settings: &LoggingSettings) -> Result<(), InfrastructureError> {
    let filter =
        EnvFilter::try_new(&settings.filter).map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志过滤器无效: {}", e),
        })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.show_target)
        .with_thread_ids(settings.show_thread_ids);

    let result = if settings.json {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };

    match result {
        Ok(()) => info!("日志系统初始化完成"),
        Err(e) => debug!("日志系统已初始化，跳过: {}", e),
    }
    Ok(())
}
