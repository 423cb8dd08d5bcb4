//! 组件解析器抽象接口
//!
//! 提供依赖解析和循环依赖检测的能力

use crate::instance::Instance;
use infrastructure_common::{DependencyError, Key};
use std::sync::Arc;

/// 依赖解析器 trait
///
/// 提供者在构造实例时通过它递归获取依赖。实现方负责把当前解析帧
/// 沿调用链传递下去，从而在同一次顶层解析内发现循环依赖。
pub trait DependencyResolver {
    /// 按绑定键解析实例
    fn resolve_key(&mut self, key: &Key) -> Result<Instance, DependencyError>;
}

impl<'r> dyn DependencyResolver + 'r {
    /// 解析无限定符的组件
    pub fn get<T>(&mut self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_by_key(&Key::of::<T>())
    }

    /// 解析带限定符的组件
    pub fn get_named<T>(&mut self, qualifier: &str) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_by_key(&Key::named::<T>(qualifier))
    }

    /// 解析可选限定符的组件
    pub fn get_qualified<T>(&mut self, qualifier: Option<&str>) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match qualifier {
            Some(qualifier) => self.get_named::<T>(qualifier),
            None => self.get::<T>(),
        }
    }

    /// 按绑定键解析并还原类型
    pub fn get_by_key<T>(&mut self, key: &Key) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve_key(key)?.downcast_for::<T>(key)
    }
}

/// 解析帧
///
/// 记录当前调用链上正在构造的绑定键。每次顶层解析独享一个帧，
/// 不同线程上的独立解析互不干扰。
#[derive(Debug, Clone, Default)]
pub struct ResolutionFrame {
    chain: Vec<Key>,
}

impl ResolutionFrame {
    /// 创建空的解析帧
    pub fn new() -> Self {
        Self::default()
    }

    /// 将绑定键压入解析链，已在链上时返回循环依赖错误
    ///
    /// 错误中的路径从第一次出现的键开始，到再次出现的键结束。
    pub fn enter(&mut self, key: &Key) -> Result<(), DependencyError> {
        if let Some(start) = self.chain.iter().position(|k| k == key) {
            let mut cycle = self.chain[start..].to_vec();
            cycle.push(key.clone());
            return Err(DependencyError::CircularDependency { cycle });
        }
        self.chain.push(key.clone());
        Ok(())
    }

    /// 从解析链中移除最近压入的键
    pub fn exit(&mut self) -> Option<Key> {
        self.chain.pop()
    }

    /// 当前解析链
    pub fn path(&self) -> &[Key] {
        &self.chain
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// 键是否在解析链上
    pub fn contains(&self, key: &Key) -> bool {
        self.chain.contains(key)
    }

    /// 解析链是否为空
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
