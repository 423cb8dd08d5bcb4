//! 组件构造方式
//!
//! 构造方式在注册时选定一次，之后以固定的函数指针保存，不会在每次
//! 解析时重新判断。

use crate::instance::Instance;
use crate::resolver::DependencyResolver;
use infrastructure_common::{BoxError, DependencyError, Key};
use std::fmt;

/// 注入构造函数：按声明顺序解析参数后构造实例
pub type InjectFn = fn(&mut dyn DependencyResolver) -> Result<Instance, DependencyError>;

/// 无参构造函数
pub type DefaultFn = fn() -> Instance;

/// 组件构造方式
#[derive(Clone, Copy)]
pub enum Constructor {
    /// 显式标记的注入构造函数
    Inject(InjectFn),
    /// 公开的无参构造函数
    Default(DefaultFn),
    /// 没有可用的构造函数，首次使用时报配置错误
    Missing,
}

impl Constructor {
    /// 按优先级选定构造方式：注入构造函数优先，其次无参构造函数
    pub fn select(inject: Option<InjectFn>, default: Option<DefaultFn>) -> Self {
        match (inject, default) {
            (Some(inject), _) => Self::Inject(inject),
            (None, Some(default)) => Self::Default(default),
            (None, None) => Self::Missing,
        }
    }

    /// 调用构造函数
    pub fn invoke(
        &self,
        key: &Key,
        resolver: &mut dyn DependencyResolver,
    ) -> Result<Instance, DependencyError> {
        match self {
            Self::Inject(inject) => inject(resolver),
            Self::Default(default) => Ok(default()),
            Self::Missing => Err(DependencyError::configuration_for(
                key.clone(),
                "组件既没有 #[inject] 构造函数，也没有公开的无参 new()",
            )),
        }
    }

    /// 构造方式名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inject(_) => "inject",
            Self::Default(_) => "default",
            Self::Missing => "missing",
        }
    }

    /// 是否有可用的构造函数
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// 把构造函数返回的错误转换为依赖错误
///
/// 错误本身就是 [`DependencyError`] 时原样还原，其余包装为工厂失败。
pub fn constructor_failed<E: Into<BoxError>>(error: E) -> DependencyError {
    let error: BoxError = error.into();
    match error.downcast::<DependencyError>() {
        Ok(structured) => *structured,
        Err(other) => DependencyError::factory(other),
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor::{}", self.kind())
    }
}
