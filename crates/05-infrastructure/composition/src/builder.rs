//! 容器构建器

use crate::component_scanner::CatalogDiscovery;
use di_abstractions::{
    ComponentDescriptor, ComponentDiscovery, DependencyResolver, DiscoveryCriteria, ProviderRef,
};
use di_impl::{
    delegating, instance, singleton, ConstructorProvider, Engine, ForwardingProvider, Registry,
};
use infrastructure_common::{InfrastructureError, Key};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 容器构建器
///
/// 先注册扫描发现的组件，再按注册顺序应用手动绑定。相同绑定键时
/// 手动绑定覆盖扫描结果，后注册的手动绑定覆盖先注册的。
pub struct DiBuilder {
    /// 扫描包列表
    packages: Vec<String>,
    /// 组件发现器
    discovery: Arc<dyn ComponentDiscovery>,
    /// 手动绑定，按注册顺序
    bindings: Vec<(Key, ProviderRef)>,
}

impl DiBuilder {
    /// 创建使用全局组件目录的构建器
    pub fn new() -> Self {
        Self {
            packages: Vec::new(),
            discovery: Arc::new(CatalogDiscovery::global()),
            bindings: Vec::new(),
        }
    }

    /// 替换组件发现器
    pub fn with_discovery<D: ComponentDiscovery + 'static>(mut self, discovery: D) -> Self {
        debug!("使用组件发现器: {}", discovery.name());
        self.discovery = Arc::new(discovery);
        self
    }

    /// 添加扫描包（模块路径前缀）
    pub fn scan_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages.extend(packages.into_iter().map(Into::into));
        self
    }

    /// 把接口绑定到实现类型，解析时委托给实现类型的绑定
    pub fn bind<I, C>(self, cast: fn(Arc<C>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        self.bind_key(Key::of::<I>(), cast)
    }

    /// 带限定符地把接口绑定到实现类型
    pub fn bind_named<I, C>(self, name: &str, cast: fn(Arc<C>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        self.bind_key(Key::named::<I>(name), cast)
    }

    /// 注册原型工厂
    pub fn provide<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
    {
        self.provide_provider(Key::of::<T>(), delegating(factory))
    }

    /// 注册带限定符的原型工厂
    pub fn provide_named<T, F>(self, name: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
    {
        self.provide_provider(Key::named::<T>(name), delegating(factory))
    }

    /// 注册单例工厂
    pub fn provide_singleton<T, F>(self, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
    {
        self.provide_provider(Key::of::<T>(), singleton(factory))
    }

    /// 注册带限定符的单例工厂
    pub fn provide_singleton_named<T, F>(self, name: &str, factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
    {
        self.provide_provider(Key::named::<T>(name), singleton(factory))
    }

    /// 按绑定键注册自定义提供者
    pub fn provide_provider(mut self, key: Key, provider: ProviderRef) -> Self {
        debug!(%key, provider = provider.name(), "注册手动绑定");
        self.bindings.push((key, provider));
        self
    }

    /// 注册预构建实例
    pub fn instance<T>(self, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.provide_provider(Key::of::<T>(), instance(value))
    }

    /// 注册带限定符的预构建实例
    pub fn instance_named<T>(self, name: &str, value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.provide_provider(Key::named::<T>(name), instance(value))
    }

    /// 构建注册表
    ///
    /// 组件发现失败时返回聚合错误，不会产生部分注册表。
    pub fn build(self) -> Result<Registry, InfrastructureError> {
        let mut registry = Registry::new();
        for descriptor in self.discovery.constructible() {
            registry.register_constructible(descriptor);
        }

        if !self.packages.is_empty() {
            let criteria = self
                .packages
                .iter()
                .fold(DiscoveryCriteria::new(), |criteria, package| {
                    criteria.add_package(package.as_str())
                });
            let discovered = self.discovery.discover(&criteria)?;
            info!(
                discovery = self.discovery.name(),
                packages = ?self.packages,
                components = discovered.len(),
                "组件扫描完成"
            );
            for descriptor in discovered {
                register_discovered(&mut registry, &descriptor);
                registry.register_constructible(descriptor);
            }
        }

        let discovered_keys: HashSet<Key> = registry.keys().cloned().collect();
        for (key, provider) in self.bindings {
            if discovered_keys.contains(&key) {
                warn!(%key, provider = provider.name(), "手动绑定覆盖扫描发现的绑定");
            }
            if registry.register(key.clone(), provider).is_some() && !discovered_keys.contains(&key) {
                debug!(%key, "手动绑定覆盖先前的手动绑定");
            }
        }

        info!(providers = registry.len(), "容器构建完成");
        Ok(registry)
    }

    /// 构建注册表并初始化引擎
    pub fn build_and_init(self, engine: &Engine) -> Result<(), InfrastructureError> {
        let registry = self.build()?;
        engine.init(registry)?;
        Ok(())
    }

    fn bind_key<I, C>(self, key: Key, cast: fn(Arc<C>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        C: Send + Sync + 'static,
    {
        self.provide_provider(
            key,
            delegating(move |resolver: &mut dyn DependencyResolver| {
                Ok(cast(resolver.get::<C>()?))
            }),
        )
    }
}

impl Default for DiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn register_discovered(registry: &mut Registry, descriptor: &ComponentDescriptor) {
    let key = descriptor.key();
    debug!(
        %key,
        lifetime = %descriptor.lifetime,
        constructor = descriptor.constructor.kind(),
        "注册扫描发现的组件"
    );
    registry.register(key.clone(), ConstructorProvider::from_descriptor(descriptor));

    for interface in &descriptor.interfaces {
        let interface_key = interface.key();
        let provider = Arc::new(ForwardingProvider::new(key.clone(), interface.upcast));
        if registry.register(interface_key.clone(), provider).is_some() {
            warn!(interface = %interface_key, component = %key, "接口已有其他实现，使用后发现的组件");
        }
    }
}
