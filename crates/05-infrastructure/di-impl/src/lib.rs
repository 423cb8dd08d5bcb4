//! # 依赖注入具体实现
//!
//! 提供解析引擎、提供者注册表、单例缓存和各类提供者实现。
//!
//! 解析顺序：
//! 1. 已发布的单例直接返回
//! 2. 精确匹配绑定键
//! 3. 无限定符请求且该类型只有一个限定绑定时自动别名
//! 4. 该类型没有任何绑定但可构造时隐式合成构造提供者
//!
//! 同一次顶层解析内的嵌套解析共享一个解析帧，用于检测循环依赖。
//! 单例首次构造按绑定键加锁，多个线程的构造互相等待时同样报告循环依赖。

pub mod cache;
pub mod context;
pub mod creation;
pub mod engine;
pub mod providers;
pub mod registry;

pub use cache::SingletonCache;
pub use context::ResolveContext;
pub use creation::{CreationGuard, CreationLocks};
pub use engine::Engine;
pub use providers::{
    delegating, instance, singleton, ConstructorProvider, DelegatingProvider, ForwardingProvider,
    InstanceProvider, SingletonDecorator,
};
pub use registry::Registry;
