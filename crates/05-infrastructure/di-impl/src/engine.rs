//! 依赖注入引擎

use crate::cache::SingletonCache;
use crate::context::ResolveContext;
use crate::registry::Registry;
use dashmap::DashMap;
use di_abstractions::{ContainerOptions, ContainerStats, DependencyResolver, Instance, ProviderRef};
use infrastructure_common::{DependencyError, Key};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// 引擎初始化后的状态
pub(crate) struct EngineState {
    pub(crate) registry: Registry,
    pub(crate) cache: SingletonCache,
    pub(crate) implicit: DashMap<Key, ProviderRef>,
}

impl EngineState {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            registry,
            cache: SingletonCache::new(),
            implicit: DashMap::new(),
        }
    }
}

/// 依赖注入引擎
///
/// 引擎是一个显式的值，可以同时存在多个互不相干的引擎。`init` 之后
/// 注册表只读，`get` 可以从任意线程并发调用。单例首次构造按绑定键加锁，
/// 工厂内部可以等待其他线程解析无关的单例。
pub struct Engine {
    options: ContainerOptions,
    state: RwLock<Option<Arc<EngineState>>>,
}

impl Engine {
    /// 使用默认配置创建未初始化的引擎
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// 使用指定配置创建未初始化的引擎
    pub fn with_options(options: ContainerOptions) -> Self {
        Self {
            options,
            state: RwLock::new(None),
        }
    }

    /// 引擎配置
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// 用构建好的注册表初始化引擎
    ///
    /// 已初始化时返回配置错误，必须先调用 [`Engine::clear`]。
    pub fn init(&self, registry: Registry) -> Result<(), DependencyError> {
        let mut state = self.state.write();
        if state.is_some() {
            return Err(DependencyError::configuration(
                "容器已初始化，重新初始化前必须先调用 clear()",
            ));
        }

        info!(
            providers = registry.len(),
            qualified = registry.qualified_len(),
            "依赖注入容器初始化完成"
        );
        *state = Some(Arc::new(EngineState::new(registry)));
        Ok(())
    }

    /// 丢弃注册表和单例缓存，回到未初始化状态
    pub fn clear(&self) {
        let previous = self.state.write().take();
        if let Some(previous) = previous {
            info!(
                providers = previous.registry.len(),
                singletons = previous.cache.len(),
                "依赖注入容器已清空"
            );
        }
    }

    /// 是否已初始化
    pub fn is_initialized(&self) -> bool {
        self.state.read().is_some()
    }

    /// 解析无限定符的组件
    pub fn get<T>(&self) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_by_key(&Key::of::<T>())
    }

    /// 解析带限定符的组件
    pub fn get_named<T>(&self, qualifier: &str) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.get_by_key(&Key::named::<T>(qualifier))
    }

    /// 按绑定键解析并还原类型
    pub fn get_by_key<T>(&self, key: &Key) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve(key)?.downcast_for::<T>(key)
    }

    /// 按绑定键解析类型擦除的实例
    pub fn resolve(&self, key: &Key) -> Result<Instance, DependencyError> {
        let state = self.current_state()?;
        ResolveContext::new(&state, &self.options).resolve_key(key)
    }

    /// 是否存在显式绑定
    pub fn contains(&self, key: &Key) -> bool {
        self.state
            .read()
            .as_ref()
            .is_some_and(|state| state.registry.contains(key))
    }

    /// 统计信息
    pub fn stats(&self) -> ContainerStats {
        match self.state.read().as_ref() {
            Some(state) => ContainerStats {
                initialized: true,
                registered_providers: state.registry.len(),
                qualified_bindings: state.registry.qualified_len(),
                published_singletons: state.cache.len(),
                implicit_providers: state.implicit.len(),
            },
            None => ContainerStats::default(),
        }
    }

    fn current_state(&self) -> Result<Arc<EngineState>, DependencyError> {
        self.state
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| DependencyError::configuration("容器尚未初始化，请先调用 init()"))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
