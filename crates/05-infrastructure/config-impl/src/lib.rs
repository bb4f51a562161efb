//! # Configuration Implementation
//!
//! 配置管理的具体实现，提供各种配置源和分层配置管理器。
//!
//! ## 主要组件
//!
//! - [`RegistryConfigManager`] - 分层配置管理器
//! - [`TomlConfigProvider`] - TOML 配置提供者
//! - [`JsonConfigProvider`] - JSON 配置提供者
//! - [`EnvironmentConfigProvider`] - 环境变量配置提供者

pub mod manager;
pub mod providers;

pub use manager::*;
pub use providers::*;
