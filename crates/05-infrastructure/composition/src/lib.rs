//! # 依赖注入组合层
//!
//! 把组件发现、手动绑定和配置组合成一个可用的依赖注入引擎。
//!
//! ## 主要功能
//!
//! - **容器构建器**: 合并扫描结果与手动绑定，手动绑定优先
//! - **组件发现**: 读取 `#[component]` 填充的组件目录并按包过滤
//! - **配置加载**: 配置文件加环境变量，驱动扫描包、引擎选项和日志
//! - **启动器**: 按配置完成日志初始化和容器启动
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{Bootstrapper, ContainerSettings};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ContainerSettings::from_env()?;
//!     let engine = Bootstrapper::new(settings)
//!         .with_logging(true)
//!         .configure(|builder| builder.instance(Arc::new(String::from("lorn"))))
//!         .bootstrap()?;
//!
//!     let name = engine.get::<String>()?;
//!     println!("应用名称: {}", name);
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod component_scanner;
pub mod config_sources;

// 重新导出主要类型
pub use bootstrapper::{init_logging, Bootstrapper};
pub use builder::DiBuilder;
pub use component_scanner::{is_valid_module_path, CatalogDiscovery, StaticDiscovery};
pub use config_sources::{ContainerSettings, LoggingSettings, ENV_PREFIX, ENV_SEPARATOR};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
