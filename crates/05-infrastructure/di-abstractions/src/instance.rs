//! 类型擦除的组件实例

use infrastructure_common::{DependencyError, Key};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 类型擦除的共享实例
///
/// 内部保存的是 `Arc<T>`（`T` 可以是 `dyn Trait`），所以具体类型和
/// trait object 走同一条路径。克隆只增加引用计数。
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// 包装一个共享值
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// 包装一个拥有所有权的值
    pub fn from_value<T>(value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::new(Arc::new(value))
    }

    /// 还原为 `Arc<T>`，类型不符时返回 `None`
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// 按绑定键还原，类型不符时返回类型不匹配错误
    pub fn downcast_for<T>(&self, key: &Key) -> Result<Arc<T>, DependencyError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.downcast::<T>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                key: key.clone(),
                actual: self.type_name,
            })
    }

    /// 实例的类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 是否为同一个实例
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish()
    }
}
