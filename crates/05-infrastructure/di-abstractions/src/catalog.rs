//! 组件目录
//!
//! `#[component]` 宏在程序加载时把描述符提交到进程级目录，
//! 组件发现器再按包过滤读取。

use crate::descriptor::ComponentDescriptor;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::TypeId;
use std::sync::Arc;

/// 全局组件目录
static GLOBAL_COMPONENT_CATALOG: Lazy<Arc<ComponentCatalog>> =
    Lazy::new(|| Arc::new(ComponentCatalog::new()));

/// 组件目录
///
/// 同一类型重复提交时以最后一次为准，但保留首次提交的顺序。
#[derive(Debug, Default)]
pub struct ComponentCatalog {
    descriptors: RwLock<Vec<ComponentDescriptor>>,
}

impl ComponentCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交组件描述符
    pub fn submit(&self, descriptor: ComponentDescriptor) {
        let mut descriptors = self.descriptors.write();
        match descriptors
            .iter_mut()
            .find(|existing| existing.type_info == descriptor.type_info)
        {
            Some(existing) => *existing = descriptor,
            None => descriptors.push(descriptor),
        }
    }

    /// 获取所有描述符
    pub fn descriptors(&self) -> Vec<ComponentDescriptor> {
        self.descriptors.read().clone()
    }

    /// 按类型查找描述符
    pub fn find(&self, type_id: TypeId) -> Option<ComponentDescriptor> {
        self.descriptors
            .read()
            .iter()
            .find(|descriptor| descriptor.type_info.id == type_id)
            .cloned()
    }

    /// 目录中的组件数量
    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    /// 目录是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }
}

/// 获取全局组件目录
pub fn global_catalog() -> Arc<ComponentCatalog> {
    Arc::clone(&GLOBAL_COMPONENT_CATALOG)
}

/// 向全局组件目录提交描述符
pub fn submit_component(descriptor: ComponentDescriptor) {
    GLOBAL_COMPONENT_CATALOG.submit(descriptor);
}
