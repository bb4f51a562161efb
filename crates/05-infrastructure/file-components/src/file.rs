//! 文件访问组件

use crate::directory::DirectoryService;
use crate::options::{FileAccessOptions, OpenMode};
use di_abstractions::{Component, ServiceProviderExt, SiteSlot};
use infrastructure_common::{Capabilities, ComponentError, FileAccessError};
use parking_lot::{Mutex, RwLock};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 文件访问能力
pub trait FileAccess: Send + Sync {
    /// 在配置的基础目录下打开文件
    fn open(&self, file_name: &str, mode: OpenMode) -> Result<(), FileAccessError>;

    /// 在指定目录下打开文件
    fn open_in(&self, path: &Path, file_name: &str, mode: OpenMode)
        -> Result<(), FileAccessError>;

    /// 在当前位置写入文本
    fn write(&self, content: &str) -> Result<(), FileAccessError>;

    /// 刷新并关闭当前文件
    fn close(&self) -> Result<(), FileAccessError>;

    /// 是否有已打开的文件
    fn is_open(&self) -> bool;
}

struct OpenFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// 文件访问组件
///
/// 同一时刻最多持有一个打开的文件。容器销毁时刷新并关闭文件，
/// 之后所有操作返回 [`FileAccessError::AlreadyReleased`]。
pub struct FileComponent {
    site: SiteSlot,
    options: FileAccessOptions,
    directory: RwLock<Option<Arc<dyn DirectoryService>>>,
    stream: Mutex<Option<OpenFile>>,
    disposed: AtomicBool,
}

impl FileComponent {
    /// 创建文件访问组件
    pub fn new(options: FileAccessOptions) -> Self {
        Self {
            site: SiteSlot::new(),
            options,
            directory: RwLock::new(None),
            stream: Mutex::new(None),
            disposed: AtomicBool::new(false),
        }
    }

    /// 组件配置
    pub fn options(&self) -> &FileAccessOptions {
        &self.options
    }

    /// 通过站点解析 [`DirectoryService`]
    ///
    /// 组件尚未放置时返回 [`ComponentError::NotSited`]，容器中没有目录服务时返回
    /// [`infrastructure_common::DependencyError::ComponentNotFound`]。
    pub fn initialize(&self) -> Result<(), FileAccessError> {
        let site = self.site().ok_or_else(|| ComponentError::NotSited {
            component: "FileComponent".to_string(),
        })?;
        let directory = site.require_service::<dyn DirectoryService>()?;

        debug!(
            "文件组件已解析目录服务: {}",
            directory.base_directory().display()
        );
        *self.directory.write() = Some(directory);
        Ok(())
    }

    /// 是否已完成初始化
    pub fn is_initialized(&self) -> bool {
        self.directory.read().is_some()
    }

    /// 当前打开的文件路径
    pub fn current_path(&self) -> Option<PathBuf> {
        self.stream.lock().as_ref().map(|open| open.path.clone())
    }

    fn ensure_live(&self) -> Result<(), FileAccessError> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(FileAccessError::AlreadyReleased);
        }
        Ok(())
    }

    fn prepare_directory(&self, path: &Path) -> Result<(), FileAccessError> {
        if !self.options.create_missing_directories {
            return Ok(());
        }
        match self.directory.read().as_ref() {
            Some(directory) => directory.ensure_directory(path).map(|_| ()),
            None => Ok(std::fs::create_dir_all(path)?),
        }
    }

    fn flush_and_close(open: OpenFile) -> Result<(), FileAccessError> {
        let OpenFile { path, mut writer } = open;
        writer.flush()?;
        debug!("关闭文件: {}", path.display());
        Ok(())
    }
}

impl FileAccess for FileComponent {
    fn open(&self, file_name: &str, mode: OpenMode) -> Result<(), FileAccessError> {
        let base = self.options.base_path.clone();
        self.open_in(&base, file_name, mode)
    }

    fn open_in(
        &self,
        path: &Path,
        file_name: &str,
        mode: OpenMode,
    ) -> Result<(), FileAccessError> {
        self.ensure_live()?;
        self.prepare_directory(path)?;

        // 先关闭旧文件，刷新失败时不再打开新文件
        let mut stream = self.stream.lock();
        if let Some(previous) = stream.take() {
            Self::flush_and_close(previous)?;
        }

        let full_path = path.join(file_name);
        let file = mode.to_open_options().open(&full_path)?;
        info!("打开文件: {} ({:?})", full_path.display(), mode);

        *stream = Some(OpenFile {
            path: full_path,
            writer: BufWriter::new(file),
        });
        Ok(())
    }

    fn write(&self, content: &str) -> Result<(), FileAccessError> {
        self.ensure_live()?;
        let mut stream = self.stream.lock();
        let open = stream.as_mut().ok_or(FileAccessError::NotOpen)?;
        open.writer.write_all(content.as_bytes())?;
        Ok(())
    }

    fn close(&self) -> Result<(), FileAccessError> {
        self.ensure_live()?;
        let open = self.stream.lock().take().ok_or(FileAccessError::NotOpen)?;
        Self::flush_and_close(open)
    }

    fn is_open(&self) -> bool {
        self.stream.lock().is_some()
    }
}

impl std::fmt::Debug for FileComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileComponent")
            .field("site", &self.site)
            .field("options", &self.options)
            .field("open", &self.current_path())
            .field("disposed", &self.disposed.load(Ordering::Acquire))
            .finish()
    }
}

impl Component for FileComponent {
    fn capabilities(&self) -> Capabilities {
        Capabilities::builder::<Self>()
            .provide::<dyn FileAccess>(|this| this)
            .build()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }

    fn release(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let open = self.stream.lock().take();
        if let Some(open) = open {
            if let Err(e) = Self::flush_and_close(open) {
                warn!("释放文件组件时刷新失败: {}", e);
            }
        }
        self.directory.write().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryComponent;
    use di_abstractions::ComponentContainer;
    use di_impl::ServiceContainer;
    use infrastructure_common::DependencyError;

    #[test]
    fn test_initialize_requires_site() {
        let component = FileComponent::new(FileAccessOptions::default());
        assert!(matches!(
            component.initialize(),
            Err(FileAccessError::Component {
                source: ComponentError::NotSited { .. }
            })
        ));
    }

    #[test]
    fn test_initialize_requires_directory_service() {
        let container = ServiceContainer::new();
        let component = Arc::new(FileComponent::new(FileAccessOptions::default()));
        container.add(component.clone()).unwrap();

        match component.initialize() {
            Err(FileAccessError::Dependency {
                source: DependencyError::ComponentNotFound { capability },
            }) => assert!(capability.contains("DirectoryService")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_initialize_resolves_directory_service() {
        let root = tempfile::tempdir().unwrap();
        let container = ServiceContainer::new();
        let component = Arc::new(FileComponent::new(FileAccessOptions::new(root.path())));
        container
            .add(Arc::new(DirectoryComponent::new(root.path())))
            .unwrap();
        container.add(component.clone()).unwrap();

        component.initialize().unwrap();
        assert!(component.is_initialized());
    }

    #[test]
    fn test_open_write_close() {
        let root = tempfile::tempdir().unwrap();
        let component = FileComponent::new(FileAccessOptions::new(root.path()));

        component.open("out.txt", OpenMode::Create).unwrap();
        component.write("hello ").unwrap();
        component.write("wörld").unwrap();
        component.close().unwrap();

        let written = std::fs::read_to_string(root.path().join("out.txt")).unwrap();
        assert_eq!(written, "hello wörld");
        assert!(!component.is_open());
    }

    #[test]
    fn test_append_mode_keeps_content() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("log.txt"), "a").unwrap();
        let component = FileComponent::new(FileAccessOptions::new(root.path()));

        component.open("log.txt", OpenMode::Append).unwrap();
        component.write("b").unwrap();
        component.close().unwrap();

        let written = std::fs::read_to_string(root.path().join("log.txt")).unwrap();
        assert_eq!(written, "ab");
    }

    #[test]
    fn test_write_without_open_fails() {
        let component = FileComponent::new(FileAccessOptions::default());
        assert!(matches!(
            component.write("x"),
            Err(FileAccessError::NotOpen)
        ));
        assert!(matches!(component.close(), Err(FileAccessError::NotOpen)));
    }

    #[test]
    fn test_open_in_creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a/b");
        let component = FileComponent::new(
            FileAccessOptions::new(root.path()).with_create_missing_directories(true),
        );

        component
            .open_in(&nested, "deep.txt", OpenMode::CreateNew)
            .unwrap();
        component.close().unwrap();

        assert!(nested.join("deep.txt").is_file());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_flush_keeps_next_file_closed() {
        let device = Path::new("/dev/full");
        if !device.exists() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let component = FileComponent::new(FileAccessOptions::new(root.path()));

        component
            .open_in(Path::new("/dev"), "full", OpenMode::Open)
            .unwrap();
        component.write("pending").unwrap();

        let result = component.open("next.txt", OpenMode::Create);

        assert!(matches!(result, Err(FileAccessError::Io { .. })));
        assert!(!component.is_open());
        assert!(!root.path().join("next.txt").exists());
    }

    #[test]
    fn test_reopen_flushes_previous_file() {
        let root = tempfile::tempdir().unwrap();
        let component = FileComponent::new(FileAccessOptions::new(root.path()));

        component.open("first.txt", OpenMode::Create).unwrap();
        component.write("one").unwrap();
        component.open("second.txt", OpenMode::Create).unwrap();

        let first = std::fs::read_to_string(root.path().join("first.txt")).unwrap();
        assert_eq!(first, "one");
        assert_eq!(component.current_path(), Some(root.path().join("second.txt")));
    }

    #[test]
    fn test_release_flushes_once() {
        let root = tempfile::tempdir().unwrap();
        let component = FileComponent::new(FileAccessOptions::new(root.path()));
        component.open("r.txt", OpenMode::Create).unwrap();
        component.write("pending").unwrap();

        component.release();
        component.release();

        let written = std::fs::read_to_string(root.path().join("r.txt")).unwrap();
        assert_eq!(written, "pending");
        assert!(matches!(
            component.open("r.txt", OpenMode::Open),
            Err(FileAccessError::AlreadyReleased)
        ));
    }
}
