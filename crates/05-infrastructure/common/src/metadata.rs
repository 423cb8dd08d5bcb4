//! 元数据定义
//!
//! 提供类型身份与绑定键

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 相等性和哈希只看 `TypeId`，名称仅用于诊断输出。
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    /// 类型ID
    pub id: TypeId,
    /// 完整类型名称
    pub name: &'static str,
}

impl TypeInfo {
    /// 创建新的类型信息
    pub fn new(id: TypeId, name: &'static str) -> Self {
        Self { id, name }
    }

    /// 从类型获取类型信息，支持 `dyn Trait` 等非固定大小类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        // 泛型参数里也可能出现 `::`，只截取尖括号之前的部分
        let head = self.name.split('<').next().unwrap_or(self.name);
        let start = head.rfind("::").map(|i| i + 2).unwrap_or(0);
        &self.name[start..]
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 绑定键
///
/// 由声明类型和可选限定符组成。没有限定符本身就是一种独立身份，
/// 只有解析引擎的自动别名规则才会把它和唯一的限定绑定联系起来。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    type_info: TypeInfo,
    qualifier: Option<String>,
}

impl Key {
    /// 创建新的绑定键
    pub fn new(type_info: TypeInfo, qualifier: Option<String>) -> Self {
        Self {
            type_info,
            qualifier,
        }
    }

    /// 无限定符的绑定键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(TypeInfo::of::<T>(), None)
    }

    /// 带限定符的绑定键
    pub fn named<T: ?Sized + 'static>(qualifier: impl Into<String>) -> Self {
        Self::new(TypeInfo::of::<T>(), Some(qualifier.into()))
    }

    /// 类型信息
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// 类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_info.id
    }

    /// 限定符
    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// 是否带限定符
    pub fn is_qualified(&self) -> bool {
        self.qualifier.is_some()
    }

    /// 去掉限定符后的同类型键
    pub fn unqualified(&self) -> Self {
        Self::new(self.type_info, None)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}@{}", self.type_info.name, qualifier),
            None => f.write_str(self.type_info.name),
        }
    }
}
