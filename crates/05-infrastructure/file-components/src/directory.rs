//! 目录服务组件

use di_abstractions::{Component, SiteSlot};
use infrastructure_common::{Capabilities, FileAccessError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 目录服务能力
pub trait DirectoryService: Send + Sync {
    /// 基础目录
    fn base_directory(&self) -> &Path;

    /// 把相对文件名解析到基础目录下；绝对路径原样返回
    fn resolve(&self, file_name: &str) -> PathBuf {
        self.base_directory().join(file_name)
    }

    /// 确保目录存在，相对路径相对于基础目录
    fn ensure_directory(&self, path: &Path) -> Result<PathBuf, FileAccessError>;

    /// 基础目录下的普通文件，按路径排序
    fn list_files(&self) -> Result<Vec<PathBuf>, FileAccessError>;
}

/// 以显式基础目录为根的目录服务组件
#[derive(Debug)]
pub struct DirectoryComponent {
    site: SiteSlot,
    base: PathBuf,
}

impl DirectoryComponent {
    /// 创建目录服务组件
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            site: SiteSlot::new(),
            base: base.into(),
        }
    }
}

impl DirectoryService for DirectoryComponent {
    fn base_directory(&self) -> &Path {
        &self.base
    }

    fn ensure_directory(&self, path: &Path) -> Result<PathBuf, FileAccessError> {
        let target = self.base.join(path);
        if !target.is_dir() {
            debug!("创建目录: {}", target.display());
            std::fs::create_dir_all(&target)?;
        }
        Ok(target)
    }

    fn list_files(&self) -> Result<Vec<PathBuf>, FileAccessError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.base)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl Component for DirectoryComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::builder::<Self>()
            .provide::<dyn DirectoryService>(|this| this)
            .build()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }
}
