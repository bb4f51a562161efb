//! # 基础设施组合层
//!
//! 负责把配置源、日志、组件容器和文件协作组件组合成一个可运行的注册表。
//!
//! ## 主要功能
//!
//! - **注册表构建器**: 使用构建者模式组装配置源、日志与容器
//! - **分层配置**: TOML、JSON、环境变量按优先级合并
//! - **协作组件注册**: 自动注册目录服务与文件访问组件
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use file_components::OpenMode;
//! use infrastructure_composition::RegistryBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = RegistryBuilder::new()
//!         .add_config_toml("registry.toml")?
//!         .add_config_env_vars("REGISTRY")
//!         .build()?;
//!
//!     let files = registry.file_handler()?;
//!     files.open("hello.txt", OpenMode::Create)?;
//!     files.write("hello")?;
//!     files.close()?;
//!
//!     registry.shutdown();
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod registry;


// 重新导出主要类型
pub use builder::{LoggingConfig, RegistryBuilder};
pub use registry::{ComponentRegistry, RegistryConfig};

// 重新导出错误类型
pub use infrastructure_common::InfrastructureError;
