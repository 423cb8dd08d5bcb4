//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件描述、提供者和依赖解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Instance`] - 类型擦除的共享实例
//! - [`DependencyResolver`] - 依赖解析接口，提供者通过它递归获取依赖
//! - [`ResolutionFrame`] - 单次解析调用链上的循环检测帧
//! - [`Provider`] - 按需产生实例的提供者
//! - [`Constructor`] - 注册时选定的构造方式
//! - [`ComponentDescriptor`] - 组件发现的输出
//! - [`ComponentCatalog`] - 进程级组件目录，由 `#[component]` 在加载时填充
//! - [`ComponentDiscovery`] - 组件发现器接口

pub mod catalog;
pub mod container;
pub mod descriptor;
pub mod discovery;
pub mod factory;
pub mod instance;
pub mod provider;
pub mod resolver;

pub use catalog::*;
pub use container::*;
pub use descriptor::*;
pub use discovery::*;
pub use factory::*;
pub use instance::*;
pub use provider::*;
pub use resolver::*;

// 重新导出 `#[component]` 生成代码用到的公共类型
pub use infrastructure_common::{BoxError, DependencyError, Key, Lifetime};
