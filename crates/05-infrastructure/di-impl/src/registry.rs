//! 提供者注册表
//!
//! 容器初始化时整体移交给引擎，之后只读。

use di_abstractions::{ComponentDescriptor, ProviderRef};
use infrastructure_common::Key;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

/// 提供者注册表
///
/// 除了按绑定键保存提供者，还按类型维护带限定符的绑定索引，用于
/// 无限定符请求的自动别名；以及可构造组件表，用于隐式构造。
#[derive(Clone, Default)]
pub struct Registry {
    providers: HashMap<Key, ProviderRef>,
    qualified: HashMap<TypeId, Vec<Key>>,
    constructible: HashMap<TypeId, ComponentDescriptor>,
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册提供者，返回被替换的旧提供者
    pub fn register(&mut self, key: Key, provider: ProviderRef) -> Option<ProviderRef> {
        if key.is_qualified() {
            let keys = self.qualified.entry(key.type_id()).or_default();
            if !keys.contains(&key) {
                keys.push(key.clone());
            }
        }
        self.providers.insert(key, provider)
    }

    /// 查找提供者
    pub fn lookup(&self, key: &Key) -> Option<&ProviderRef> {
        self.providers.get(key)
    }

    /// 是否存在绑定
    pub fn contains(&self, key: &Key) -> bool {
        self.providers.contains_key(key)
    }

    /// 提供者数量
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// 所有绑定键
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.providers.keys()
    }

    /// 某类型下所有带限定符的绑定键，按注册顺序
    pub fn qualified_keys(&self, type_id: TypeId) -> &[Key] {
        self.qualified
            .get(&type_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 带限定符的绑定总数
    pub fn qualified_len(&self) -> usize {
        self.qualified.values().map(Vec::len).sum()
    }

    /// 登记可隐式构造的组件
    pub fn register_constructible(&mut self, descriptor: ComponentDescriptor) {
        self.constructible.insert(descriptor.type_info.id, descriptor);
    }

    /// 查找可隐式构造的组件
    pub fn constructible(&self, type_id: TypeId) -> Option<&ComponentDescriptor> {
        self.constructible.get(&type_id)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bindings: Vec<String> = self
            .providers
            .iter()
            .map(|(key, provider)| format!("{key} => {}", provider.name()))
            .collect();
        bindings.sort();
        f.debug_struct("Registry")
            .field("bindings", &bindings)
            .field("constructible", &self.constructible.len())
            .finish()
    }
}
