//! 错误类型定义

use crate::metadata::Key;
use thiserror::Error;

/// 可跨线程传递的装箱错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("容器配置错误: {message}{}", render_key(.key))]
    Configuration { key: Option<Key>, message: String },

    #[error("无法解析依赖: {key}, 原因: {reason}")]
    UnresolvedDependency { key: Key, reason: String },

    #[error("检测到循环依赖: {}", render_path(.cycle))]
    CircularDependency { cycle: Vec<Key> },

    #[error("组件解析失败: {key}, 原因: {source}")]
    ResolutionFailed {
        key: Key,
        #[source]
        source: BoxError,
    },

    #[error("组件工厂执行失败: {source}")]
    FactoryFailed {
        #[source]
        source: BoxError,
    },

    #[error("类型不匹配: 期望 {key}, 实际 {actual}")]
    TypeMismatch { key: Key, actual: &'static str },
}

impl DependencyError {
    /// 创建不涉及具体绑定的配置错误
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            key: None,
            message: message.into(),
        }
    }

    /// 创建针对某个绑定键的配置错误
    pub fn configuration_for(key: Key, message: impl Into<String>) -> Self {
        Self::Configuration {
            key: Some(key),
            message: message.into(),
        }
    }

    /// 创建未解析依赖错误
    pub fn unresolved(key: Key, reason: impl Into<String>) -> Self {
        Self::UnresolvedDependency {
            key,
            reason: reason.into(),
        }
    }

    /// 包装工厂执行期间的失败
    pub fn factory(source: impl Into<BoxError>) -> Self {
        Self::FactoryFailed {
            source: source.into(),
        }
    }

    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// 是否为未解析依赖错误
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedDependency { .. })
    }

    /// 是否为循环依赖错误
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularDependency { .. })
    }

    /// 循环路径（仅循环依赖错误）
    pub fn cycle(&self) -> Option<&[Key]> {
        match self {
            Self::CircularDependency { cycle } => Some(cycle),
            _ => None,
        }
    }

    /// 出错的绑定键
    pub fn key(&self) -> Option<&Key> {
        match self {
            Self::Configuration { key, .. } => key.as_ref(),
            Self::UnresolvedDependency { key, .. }
            | Self::ResolutionFailed { key, .. }
            | Self::TypeMismatch { key, .. } => Some(key),
            Self::CircularDependency { cycle } => cycle.first(),
            Self::FactoryFailed { .. } => None,
        }
    }
}

fn render_key(key: &Option<Key>) -> String {
    key.as_ref()
        .map(|key| format!(" ({key})"))
        .unwrap_or_default()
}

fn render_path(cycle: &[Key]) -> String {
    cycle
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// 组件错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件发现失败: {message}: [{}]", .failures.join("; "))]
    DiscoveryError {
        message: String,
        failures: Vec<String>,
    },
}

impl ComponentError {
    /// 创建聚合的发现错误
    pub fn discovery_error(message: impl Into<String>, failures: Vec<String>) -> Self {
        Self::DiscoveryError {
            message: message.into(),
            failures,
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        #[source]
        source: BoxError,
    },

    #[error("配置验证失败: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}
