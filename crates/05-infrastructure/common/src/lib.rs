//! # Infrastructure Common
//!
//! 这个 crate 提供了组件注册表基础设施层的公共类型和工具。
//!
//! ## 核心内容
//!
//! - [`CapabilityId`] / [`Capabilities`] - 组件能力标识与能力描述符
//! - [`TypeInfo`] - 类型元数据
//! - [`InheritanceLevel`] - 组件继承标记（影响命名冲突策略）
//! - [`ConfigSection`] - 配置节与类型绑定
//! - 错误类型：[`ComponentError`]、[`DependencyError`]、[`FileAccessError`]、
//!   [`ConfigError`]、[`InfrastructureError`]
//!
//! ## 设计原则
//!
//! - 能力解析基于显式声明的能力集合，而不是运行时反射
//! - 同步 API，所有操作立即完成或立即失败

pub mod capability;
pub mod configuration;
pub mod errors;
pub mod inheritance;
pub mod metadata;

pub use capability::*;
pub use configuration::*;
pub use errors::*;
pub use inheritance::*;
pub use metadata::*;
