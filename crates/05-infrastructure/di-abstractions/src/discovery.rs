//! 组件发现抽象接口
//!
//! 提供组件自动发现的能力。发现器产出一组固定的组件描述符，
//! 失败时返回一个聚合错误，绝不返回部分结果。

use crate::descriptor::ComponentDescriptor;
use infrastructure_common::ComponentError;

/// 组件发现器 trait
pub trait ComponentDiscovery: Send + Sync {
    /// 发现符合条件的组件
    fn discover(&self, criteria: &DiscoveryCriteria)
        -> Result<Vec<ComponentDescriptor>, ComponentError>;

    /// 所有已知可构造的组件，供未扫描类型的隐式构造使用
    fn constructible(&self) -> Vec<ComponentDescriptor> {
        Vec::new()
    }

    /// 获取发现器名称
    fn name(&self) -> &str;
}

/// 发现条件
#[derive(Debug, Clone)]
pub struct DiscoveryCriteria {
    /// 扫描的包（模块路径前缀）
    pub packages: Vec<String>,
    /// 排除的包
    pub exclude_packages: Vec<String>,
    /// 是否包含子模块
    pub recursive: bool,
}

impl DiscoveryCriteria {
    /// 创建新的发现条件
    pub fn new() -> Self {
        Self {
            packages: Vec::new(),
            exclude_packages: Vec::new(),
            recursive: true,
        }
    }

    /// 添加扫描包
    pub fn add_package<S: Into<String>>(mut self, package: S) -> Self {
        self.packages.push(package.into());
        self
    }

    /// 添加排除包
    pub fn add_exclude_package<S: Into<String>>(mut self, package: S) -> Self {
        self.exclude_packages.push(package.into());
        self
    }

    /// 设置是否包含子模块
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 是否没有任何扫描包
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// 描述符是否满足条件
    pub fn matches(&self, descriptor: &ComponentDescriptor) -> bool {
        let included = self
            .packages
            .iter()
            .any(|package| descriptor.in_package(package, self.recursive));
        let excluded = self
            .exclude_packages
            .iter()
            .any(|package| descriptor.in_package(package, true));
        included && !excluded
    }
}

impl Default for DiscoveryCriteria {
    fn default() -> Self {
        Self::new()
    }
}
