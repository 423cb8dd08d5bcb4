//! # Component Macros
//!
//! 这个 crate 提供了用于自动组件注册的过程宏。
//!
//! ## 核心宏
//!
//! - [`component`] - 自动组件注册宏
//!
//! 生成的代码引用 `di_abstractions` 和 `ctor`，使用方需要依赖这两个 crate。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::component;
//! use std::sync::Arc;
//!
//! pub struct Database;
//!
//! #[component(singleton)]
//! impl Database {
//!     pub fn new() -> Self {
//!         Database
//!     }
//! }
//!
//! pub struct OrderService {
//!     primary: Arc<Database>,
//! }
//!
//! #[component]
//! impl OrderService {
//!     #[inject]
//!     pub fn create(#[named("primary")] primary: Arc<Database>) -> Self {
//!         Self { primary }
//!     }
//! }
//! ```

use proc_macro::TokenStream;

mod component;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 自动组件注册宏
///
/// 用在组件的固有 `impl` 块上，为组件实现 `Injectable`，并在程序加载时
/// 把组件描述符提交到全局组件目录。
///
/// # 参数
///
/// - `singleton` - 单例生命周期
/// - `prototype` - 原型生命周期（默认）
/// - `provides(dyn Trait, ...)` - 同时以这些接口类型注册
///
/// # 构造函数
///
/// - 标记了 `#[inject]` 的方法优先，参数必须是 `Arc<T>`，可以用
///   `#[named("q")]` 指定限定符；返回 `Self` 或 `Result<Self, E>`
/// - 否则使用公开的无参 `new()`
/// - 两者都没有时，组件在首次解析时报配置错误
///
/// # 示例
///
/// ```rust,ignore
/// #[component(singleton, provides(dyn Notifier))]
/// impl EmailNotifier {
///     #[inject]
///     fn new(#[named("smtp")] transport: Arc<dyn Transport>) -> Self {
///         Self { transport }
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn component(args: TokenStream, input: TokenStream) -> TokenStream {
    component::component_impl(args, input)
}
