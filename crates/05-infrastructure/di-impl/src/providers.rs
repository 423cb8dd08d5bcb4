//! 提供者实现
//!
//! - [`ConstructorProvider`]：调用注册时选定的组件构造函数
//! - [`InstanceProvider`]：返回预先构建的实例
//! - [`DelegatingProvider`]：委托给用户工厂函数
//! - [`ForwardingProvider`]：解析另一个绑定键后转换为接口类型
//! - [`SingletonDecorator`]：让任意提供者只构造一次

use di_abstractions::{
    ComponentDescriptor, Constructor, DependencyResolver, Instance, Provider, ProviderRef,
    UpcastFn,
};
use infrastructure_common::{DependencyError, Key, Lifetime};
use once_cell::sync::OnceCell;
use std::sync::Arc;

type FactoryFn =
    dyn Fn(&mut dyn DependencyResolver) -> Result<Instance, DependencyError> + Send + Sync;

/// 构造函数提供者
pub struct ConstructorProvider {
    key: Key,
    constructor: Constructor,
}

impl ConstructorProvider {
    /// 从组件描述符创建
    pub fn new(descriptor: &ComponentDescriptor) -> Self {
        Self {
            key: descriptor.key(),
            constructor: descriptor.constructor,
        }
    }

    /// 从组件描述符创建，单例组件自动加上单例装饰
    pub fn from_descriptor(descriptor: &ComponentDescriptor) -> ProviderRef {
        let provider: ProviderRef = Arc::new(Self::new(descriptor));
        if descriptor.is_singleton() {
            Arc::new(SingletonDecorator::new(provider))
        } else {
            provider
        }
    }
}

impl Provider for ConstructorProvider {
    fn produce(&self, resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
        self.constructor.invoke(&self.key, resolver)
    }

    fn name(&self) -> &'static str {
        "constructor"
    }
}

/// 预构建实例提供者
pub struct InstanceProvider {
    instance: Instance,
}

impl InstanceProvider {
    /// 包装共享值
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            instance: Instance::new(value),
        }
    }
}

impl Provider for InstanceProvider {
    fn produce(&self, _resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
        Ok(self.instance.clone())
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }

    fn name(&self) -> &'static str {
        "instance"
    }
}

/// 委托提供者
///
/// 每次解析都调用工厂函数。工厂返回的 `anyhow::Error` 如果本身包装的是
/// [`DependencyError`]，会原样还原，循环依赖等结构化错误因此保留类别。
pub struct DelegatingProvider {
    factory: Box<FactoryFn>,
}

impl DelegatingProvider {
    /// 从类型化的工厂函数创建
    pub fn new<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(move |resolver: &mut dyn DependencyResolver| {
                factory(resolver)
                    .map(Instance::new)
                    .map_err(into_dependency_error)
            }),
        }
    }
}

impl Provider for DelegatingProvider {
    fn produce(&self, resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
        (self.factory)(resolver)
    }

    fn name(&self) -> &'static str {
        "delegating"
    }
}

/// 转发提供者
///
/// 解析目标绑定键，再转换成接口类型。目标是单例时接口也共享同一个实例。
pub struct ForwardingProvider {
    target: Key,
    upcast: UpcastFn,
}

impl ForwardingProvider {
    /// 创建转发提供者
    pub fn new(target: Key, upcast: UpcastFn) -> Self {
        Self { target, upcast }
    }
}

impl Provider for ForwardingProvider {
    fn produce(&self, resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
        let instance = resolver.resolve_key(&self.target)?;
        (self.upcast)(&instance).ok_or_else(|| DependencyError::TypeMismatch {
            key: self.target.clone(),
            actual: instance.type_name(),
        })
    }

    fn name(&self) -> &'static str {
        "forwarding"
    }
}

/// 单例装饰器
///
/// 第一次成功构造的实例被永久保留；构造失败不会留下任何状态，下次
/// 解析会重新尝试。
pub struct SingletonDecorator {
    inner: ProviderRef,
    cell: OnceCell<Instance>,
}

impl SingletonDecorator {
    /// 装饰提供者
    pub fn new(inner: ProviderRef) -> Self {
        Self {
            inner,
            cell: OnceCell::new(),
        }
    }

    /// 实例是否已构造
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl Provider for SingletonDecorator {
    fn produce(&self, resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError> {
        self.cell
            .get_or_try_init(|| self.inner.produce(resolver))
            .cloned()
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }

    fn name(&self) -> &'static str {
        "singleton"
    }
}

/// 把工厂函数包装为单例提供者
pub fn singleton<T, F>(factory: F) -> ProviderRef
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
{
    Arc::new(SingletonDecorator::new(Arc::new(DelegatingProvider::new(
        factory,
    ))))
}

/// 把工厂函数包装为原型提供者
pub fn delegating<T, F>(factory: F) -> ProviderRef
where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&mut dyn DependencyResolver) -> anyhow::Result<Arc<T>> + Send + Sync + 'static,
{
    Arc::new(DelegatingProvider::new(factory))
}

/// 把共享值包装为实例提供者
pub fn instance<T>(value: Arc<T>) -> ProviderRef
where
    T: ?Sized + Send + Sync + 'static,
{
    Arc::new(InstanceProvider::new(value))
}

fn into_dependency_error(error: anyhow::Error) -> DependencyError {
    match error.downcast::<DependencyError>() {
        Ok(structured) => structured,
        Err(other) => DependencyError::factory(other),
    }
}
