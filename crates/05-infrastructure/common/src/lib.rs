//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn DI 容器各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 类型身份（`TypeId` + 类型名称）
//! - [`Key`] - 绑定键：类型 + 可选限定符
//! - [`Lifetime`] - 组件生命周期（单例 / 原型）
//! - [`DependencyError`] - 解析阶段错误分类
//! - [`ComponentError`] - 组件发现阶段错误
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 错误必须指明出错的绑定键
//! - 不依赖任何运行时或全局状态

pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
