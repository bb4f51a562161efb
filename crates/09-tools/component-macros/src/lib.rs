//! # Component Macros
//!
//! 这个 crate 提供 `#[derive(Component)]`，为结构体生成
//! `di_abstractions::Component` 实现及其能力描述符。
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Component;
//! use di_abstractions::SiteSlot;
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Debug, Default, Component)]
//! #[component(provides(dyn Clock), inheritance = "inherited_read_only")]
//! pub struct SystemClock {
//!     #[site]
//!     slot: SiteSlot,
//! }
//! ```
//!
//! 使用方需要依赖 `di-abstractions` 与 `infrastructure-common`。

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 组件派生宏
///
/// # 参数
///
/// - `provides(dyn A, dyn B)` - 组件提供的接口能力
/// - `inheritance = "not_inherited" | "inherited" | "inherited_read_only"` - 继承级别
/// - `release = "method"` - 容器销毁时调用的无参方法
///
/// 站点字段用 `#[site]` 标记，未标记时使用名为 `site` 的字段，字段类型必须是
/// `di_abstractions::SiteSlot`。
#[proc_macro_derive(Component, attributes(component, site))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
