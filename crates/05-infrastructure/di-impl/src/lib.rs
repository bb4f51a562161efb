//! # 组件容器具体实现
//!
//! 提供具体的组件容器 [`ServiceContainer`] 以及它为每个组件签发的 [`ServiceSite`]。
//!
//! ```rust
//! use di_abstractions::{Component, ComponentContainer, ServiceProviderExt, SiteSlot};
//! use di_impl::ServiceContainer;
//! use infrastructure_common::Capabilities;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Debug, Default)]
//! struct English {
//!     site: SiteSlot,
//! }
//!
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! impl Component for English {
//!     fn capabilities(&self) -> Capabilities {
//!         Capabilities::builder::<Self>()
//!             .provide::<dyn Greeter>(|this| this)
//!             .build()
//!     }
//!
//!     fn site_slot(&self) -> &SiteSlot {
//!         &self.site
//!     }
//! }
//!
//! let container = ServiceContainer::new();
//! container.add_named(Arc::new(English::default()), Some("greeter")).unwrap();
//!
//! let greeter = container.get_service::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "hello");
//! ```

mod container;
mod site;

pub use container::ServiceContainer;
pub use site::ServiceSite;
