//! 提供者抽象接口

use crate::instance::Instance;
use crate::resolver::DependencyResolver;
use infrastructure_common::{DependencyError, Lifetime};
use std::sync::Arc;

/// 提供者 trait
///
/// 按需产生某个类型的一个实例。需要依赖时通过传入的解析器获取，
/// 这样循环检测帧才能跟随调用链。
pub trait Provider: Send + Sync {
    /// 产生实例
    fn produce(&self, resolver: &mut dyn DependencyResolver) -> Result<Instance, DependencyError>;

    /// 提供者的生命周期
    fn lifetime(&self) -> Lifetime {
        Lifetime::Prototype
    }

    /// 提供者名称，用于日志
    fn name(&self) -> &'static str;
}

/// 共享的提供者引用
pub type ProviderRef = Arc<dyn Provider>;
