//! 组件生命周期

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// 单例模式 - 容器生命周期内只创建一个实例，直到容器被清空
    Singleton,
    /// 原型模式 - 每次请求都创建新实例
    #[default]
    Prototype,
}

impl Lifetime {
    /// 是否为单例
    pub fn is_singleton(self) -> bool {
        matches!(self, Self::Singleton)
    }

    /// 由单例标记得到生命周期
    pub fn from_singleton_flag(singleton: bool) -> Self {
        if singleton {
            Self::Singleton
        } else {
            Self::Prototype
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => f.write_str("singleton"),
            Self::Prototype => f.write_str("prototype"),
        }
    }
}
