//! # Component Container Abstractions
//!
//! 组件容器抽象层，定义组件放置（site）和能力解析的核心接口。
//!
//! ## 核心接口
//!
//! - [`Component`] - 可注册到容器中的组件
//! - [`ComponentSite`] - 容器为每个已注册组件签发的站点
//! - [`ComponentContainer`] - 组件容器（注册、移除、枚举、能力解析）
//! - [`ServiceProvider`] - 按能力标识解析服务
//! - [`ContainerFilter`] - 枚举结果的可选后处理钩子
//!
//! ## 所有权
//!
//! 容器独占站点记录；站点对容器和组件只持有 `Weak` 引用；组件通过 [`SiteSlot`]
//! 持有当前站点，移除时清空。整个结构中没有强引用环。

pub mod component;
pub mod container;
pub mod resolver;
pub mod site;

pub use component::*;
pub use container::*;
pub use resolver::*;
pub use site::*;
