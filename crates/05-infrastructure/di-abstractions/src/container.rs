//! 容器配置与统计

use serde::{Deserialize, Serialize};

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// 是否为未注册但可构造的组件隐式合成构造提供者
    pub implicit_constructors: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            implicit_constructors: true,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    /// 容器是否已初始化
    pub initialized: bool,
    /// 已注册的提供者数量
    pub registered_providers: usize,
    /// 带限定符的绑定数量
    pub qualified_bindings: usize,
    /// 已发布的单例数量
    pub published_singletons: usize,
    /// 隐式合成的提供者数量
    pub implicit_providers: usize,
}
