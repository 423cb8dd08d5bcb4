//! 组件描述符
//!
//! 组件发现的输出：每个可注入的具体类型对应一条描述符。

use crate::factory::Constructor;
use crate::instance::Instance;
use infrastructure_common::{Key, Lifetime, TypeInfo};
use std::fmt;

/// 接口转换函数：把具体类型的实例转换为接口类型的实例
pub type UpcastFn = fn(&Instance) -> Option<Instance>;

/// 组件实现的接口
#[derive(Clone, Copy)]
pub struct InterfaceBinding {
    /// 接口类型
    pub type_info: TypeInfo,
    /// 转换函数
    pub upcast: UpcastFn,
}

impl InterfaceBinding {
    /// 接口的无限定符绑定键
    pub fn key(&self) -> Key {
        Key::new(self.type_info, None)
    }
}

impl fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InterfaceBinding")
            .field(&self.type_info)
            .finish()
    }
}

/// 组件描述符
#[derive(Debug, Clone)]
pub struct ComponentDescriptor {
    /// 组件类型
    pub type_info: TypeInfo,
    /// 组件生命周期
    pub lifetime: Lifetime,
    /// 实现的接口类型
    pub interfaces: Vec<InterfaceBinding>,
    /// 组件所在模块路径
    pub module_path: &'static str,
    /// 注册时选定的构造方式
    pub constructor: Constructor,
}

impl ComponentDescriptor {
    /// 创建新的组件描述符，模块路径取自类型名称
    pub fn new<T: Send + Sync + 'static>(lifetime: Lifetime, constructor: Constructor) -> Self {
        let type_info = TypeInfo::of::<T>();
        Self {
            type_info,
            lifetime,
            interfaces: Vec::new(),
            module_path: parent_module(type_info.name),
            constructor,
        }
    }

    /// 单例组件
    pub fn singleton<T: Send + Sync + 'static>(constructor: Constructor) -> Self {
        Self::new::<T>(Lifetime::Singleton, constructor)
    }

    /// 原型组件
    pub fn prototype<T: Send + Sync + 'static>(constructor: Constructor) -> Self {
        Self::new::<T>(Lifetime::Prototype, constructor)
    }

    /// 添加实现的接口
    pub fn with_interface<I: ?Sized + 'static>(mut self, upcast: UpcastFn) -> Self {
        self.interfaces.push(InterfaceBinding {
            type_info: TypeInfo::of::<I>(),
            upcast,
        });
        self
    }

    /// 设置模块路径
    pub fn with_module_path(mut self, module_path: &'static str) -> Self {
        self.module_path = module_path;
        self
    }

    /// 组件的无限定符绑定键
    pub fn key(&self) -> Key {
        Key::new(self.type_info, None)
    }

    /// 是否为单例
    pub fn is_singleton(&self) -> bool {
        self.lifetime.is_singleton()
    }

    /// 组件是否位于指定包（模块路径前缀）内
    ///
    /// `recursive` 为 false 时只匹配模块本身，不包括子模块。
    pub fn in_package(&self, package: &str, recursive: bool) -> bool {
        let package = package.trim_end_matches("::");
        if self.module_path == package {
            return true;
        }
        recursive
            && self
                .module_path
                .strip_prefix(package)
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

/// 可注入组件 trait
///
/// 通常由 `#[component]` 宏实现。
pub trait Injectable: Send + Sync + 'static {
    /// 组件描述符
    fn descriptor() -> ComponentDescriptor
    where
        Self: Sized;
}

fn parent_module(type_name: &'static str) -> &'static str {
    let head = type_name.split('<').next().unwrap_or(type_name);
    match head.rfind("::") {
        Some(end) => &type_name[..end],
        None => "",
    }
}
