//! 文件服务门面

use crate::directory::DirectoryService;
use crate::file::FileAccess;
use crate::options::OpenMode;
use di_abstractions::{ServiceProvider, ServiceProviderExt};
use infrastructure_common::{DependencyError, FileAccessError};
use std::path::Path;
use std::sync::Arc;

/// 文件服务处理器
///
/// 构造时从服务提供者解析 [`FileAccess`] 和 [`DirectoryService`]，
/// 任一缺失立即失败；之后把文件操作原样转发给文件组件。
#[derive(Clone)]
pub struct FileServiceHandler {
    files: Arc<dyn FileAccess>,
    directory: Arc<dyn DirectoryService>,
}

impl FileServiceHandler {
    /// 从服务提供者解析依赖
    pub fn new<P: ServiceProvider + ?Sized>(provider: &P) -> Result<Self, DependencyError> {
        let files = provider.require_service::<dyn FileAccess>()?;
        let directory = provider.require_service::<dyn DirectoryService>()?;
        Ok(Self { files, directory })
    }

    /// 解析到的目录服务
    pub fn directory(&self) -> &Arc<dyn DirectoryService> {
        &self.directory
    }

    /// 在基础目录下打开文件
    pub fn open(&self, file_name: &str, mode: OpenMode) -> Result<(), FileAccessError> {
        self.files.open(file_name, mode)
    }

    /// 在指定目录下打开文件
    pub fn open_in(
        &self,
        path: &Path,
        file_name: &str,
        mode: OpenMode,
    ) -> Result<(), FileAccessError> {
        self.files.open_in(path, file_name, mode)
    }

    /// 向当前文件写入文本
    pub fn write(&self, content: &str) -> Result<(), FileAccessError> {
        self.files.write(content)
    }

    /// 刷新并关闭当前文件
    pub fn close(&self) -> Result<(), FileAccessError> {
        self.files.close()
    }
}

impl std::fmt::Debug for FileServiceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileServiceHandler")
            .field("base_directory", &self.directory.base_directory())
            .field("open", &self.files.is_open())
            .finish()
    }
}
