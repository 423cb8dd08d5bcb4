//! 单例缓存

use crate::creation::{CreationGuard, CreationLocks};
use dashmap::DashMap;
use di_abstractions::Instance;
use infrastructure_common::{DependencyError, Key};

/// 单例缓存
///
/// 已发布的单例可以无锁竞争地并发读取。首次构造按绑定键加锁，
/// 见 [`CreationLocks`]。
#[derive(Default)]
pub struct SingletonCache {
    entries: DashMap<Key, Instance>,
    creation: CreationLocks,
}

impl SingletonCache {
    /// 创建空缓存
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取已发布的单例
    pub fn get(&self, key: &Key) -> Option<Instance> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// 发布单例，键已存在时保留先发布的实例并返回它
    pub fn publish(&self, key: &Key, instance: Instance) -> Instance {
        self.entries
            .entry(key.clone())
            .or_insert(instance)
            .value()
            .clone()
    }

    /// 获取键的单例构造锁，跨线程互相等待时返回循环依赖错误
    pub fn lock_creation(
        &self,
        key: &Key,
        path: &[Key],
    ) -> Result<CreationGuard<'_>, DependencyError> {
        self.creation.acquire(key, path)
    }

    /// 正在首次构造的单例数量
    pub fn creation_in_progress(&self) -> usize {
        self.creation.in_progress()
    }

    /// 是否已发布
    pub fn contains(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// 已发布的单例数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.entries.clear();
    }
}
