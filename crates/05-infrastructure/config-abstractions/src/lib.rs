//! # Configuration Abstractions
//!
//! 配置管理抽象层，定义配置提供者的统一接口。
//!
//! ## 核心接口
//!
//! - [`ConfigProvider`] - 配置提供者接口
//! - [`FileConfigProvider`] - 基于文件的配置提供者接口

pub mod provider;

pub use provider::*;
