//! 组件扫描和发现功能
//!
//! - [`CatalogDiscovery`]：读取 `#[component]` 在程序加载时填充的组件目录
//! - [`StaticDiscovery`]：固定的组件列表，主要用于测试

use di_abstractions::{
    global_catalog, ComponentCatalog, ComponentDescriptor, ComponentDiscovery, DiscoveryCriteria,
};
use infrastructure_common::ComponentError;
use std::sync::Arc;
use tracing::debug;

/// 基于组件目录的发现器
pub struct CatalogDiscovery {
    catalog: Arc<ComponentCatalog>,
}

impl CatalogDiscovery {
    /// 使用全局组件目录
    pub fn global() -> Self {
        Self::with_catalog(global_catalog())
    }

    /// 使用指定的组件目录
    pub fn with_catalog(catalog: Arc<ComponentCatalog>) -> Self {
        Self { catalog }
    }
}

impl ComponentDiscovery for CatalogDiscovery {
    fn discover(
        &self,
        criteria: &DiscoveryCriteria,
    ) -> Result<Vec<ComponentDescriptor>, ComponentError> {
        validate_criteria(criteria)?;

        let discovered: Vec<ComponentDescriptor> = self
            .catalog
            .descriptors()
            .into_iter()
            .filter(|descriptor| criteria.matches(descriptor))
            .collect();

        debug!(
            catalog = self.catalog.len(),
            discovered = discovered.len(),
            "从组件目录发现组件"
        );
        Ok(discovered)
    }

    fn constructible(&self) -> Vec<ComponentDescriptor> {
        self.catalog.descriptors()
    }

    fn name(&self) -> &str {
        "CatalogDiscovery"
    }
}

/// 固定列表发现器
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    descriptors: Vec<ComponentDescriptor>,
}

impl StaticDiscovery {
    /// 创建发现器
    pub fn new(descriptors: Vec<ComponentDescriptor>) -> Self {
        Self { descriptors }
    }

    /// 添加组件
    pub fn with(mut self, descriptor: ComponentDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }
}

impl ComponentDiscovery for StaticDiscovery {
    fn discover(
        &self,
        criteria: &DiscoveryCriteria,
    ) -> Result<Vec<ComponentDescriptor>, ComponentError> {
        validate_criteria(criteria)?;
        Ok(self
            .descriptors
            .iter()
            .filter(|descriptor| criteria.matches(descriptor))
            .cloned()
            .collect())
    }

    fn constructible(&self) -> Vec<ComponentDescriptor> {
        self.descriptors.clone()
    }

    fn name(&self) -> &str {
        "StaticDiscovery"
    }
}

/// 检查扫描条件，所有无效的包名一次性报告
fn validate_criteria(criteria: &DiscoveryCriteria) -> Result<(), ComponentError> {
    let failures: Vec<String> = criteria
        .packages
        .iter()
        .chain(&criteria.exclude_packages)
        .filter(|package| !is_valid_module_path(package))
        .map(|package| format!("无效的包名: '{package}'"))
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ComponentError::discovery_error("扫描条件无效", failures))
    }
}

/// 是否为合法的 Rust 模块路径，如 `app::services`
pub fn is_valid_module_path(path: &str) -> bool {
    !path.is_empty() && path.split("::").all(is_valid_identifier)
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
