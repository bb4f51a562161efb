//! # File Components
//!
//! 注册到组件容器中的文件协作组件。
//!
//! - [`DirectoryComponent`] 提供 [`DirectoryService`] 能力，以显式的基础目录为根
//! - [`FileComponent`] 提供 [`FileAccess`] 能力，初始化时通过站点解析 [`DirectoryService`]
//! - [`FileServiceHandler`] 从容器解析上述两种能力并转发文件操作

pub mod directory;
pub mod file;
pub mod handler;
pub mod options;

pub use directory::*;
pub use file::*;
pub use handler::*;
pub use options::*;
