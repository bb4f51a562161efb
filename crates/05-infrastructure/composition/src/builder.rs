//! 注册表构建器

use crate::registry::{ComponentRegistry, RegistryConfig};
use config_abstractions::ConfigProvider;
use config_impl::{
    EnvironmentConfigProvider, JsonConfigProvider, RegistryConfigManager, TomlConfigProvider,
};
use di_abstractions::{ComponentContainer, ContainerConfig};
use di_impl::ServiceContainer;
use file_components::{DirectoryComponent, FileAccessOptions, FileComponent};
use infrastructure_common::InfrastructureError;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// 目录服务组件的注册名称
pub const DIRECTORY_COMPONENT_NAME: &str = "directory";
/// 文件访问组件的注册名称
pub const FILE_COMPONENT_NAME: &str = "files";

/// 注册表构建器
///
/// 使用建造者模式组装配置源、日志、容器和文件协作组件
pub struct RegistryBuilder {
    /// 配置源列表
    config_sources: Vec<Box<dyn ConfigProvider>>,
    /// 显式指定的容器配置，优先于配置源
    container_config: Option<ContainerConfig>,
    /// 显式指定的文件组件配置，优先于配置源
    file_options: Option<FileAccessOptions>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl RegistryBuilder {
    /// 创建新的注册表构建器
    pub fn new() -> Self {
        Self {
            config_sources: Vec::new(),
            container_config: None,
            file_options: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 添加 TOML 配置文件
    pub fn add_config_toml<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 TOML 配置文件: {}", path.display());
        let provider = TomlConfigProvider::new(path)?;
        self.config_sources.push(Box::new(provider));
        Ok(self)
    }

    /// 添加 JSON 配置文件
    pub fn add_config_json<P: AsRef<Path>>(mut self, path: P) -> Result<Self, InfrastructureError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("配置文件不存在: {}", path.display()),
            });
        }

        info!("添加 JSON 配置文件: {}", path.display());
        let provider = JsonConfigProvider::new(path)?;
        self.config_sources.push(Box::new(provider));
        Ok(self)
    }

    /// 添加环境变量配置源
    pub fn add_config_env_vars<S: Into<String>>(mut self, prefix: S) -> Self {
        let prefix = prefix.into();
        info!("添加环境变量配置源，前缀: {}", prefix);

        self.config_sources
            .push(Box::new(EnvironmentConfigProvider::new(prefix)));
        self
    }

    /// 添加自定义配置提供者
    pub fn add_config_provider<T: ConfigProvider + 'static>(mut self, provider: T) -> Self {
        info!("添加自定义配置提供者: {}", provider.name());
        self.config_sources.push(Box::new(provider));
        self
    }

    /// 指定容器配置
    pub fn with_container_config(mut self, config: ContainerConfig) -> Self {
        self.container_config = Some(config);
        self
    }

    /// 指定文件组件配置
    pub fn with_file_options(mut self, options: FileAccessOptions) -> Self {
        self.file_options = Some(options);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建注册表
    pub fn build(self) -> Result<ComponentRegistry, InfrastructureError> {
        // 只有在明确配置了日志时才初始化日志，避免在测试环境中重复初始化
        if self.logging_enabled {
            self.logging_config.init()?;
        }

        info!("开始构建组件注册表");

        let mut config_manager = RegistryConfigManager::new();
        for provider in self.config_sources {
            config_manager.add_provider(provider);
        }

        let mut config = RegistryConfig::load(&config_manager)?;
        if let Some(container) = self.container_config {
            config.container = container;
        }
        if let Some(files) = self.file_options {
            config.files = files;
        }
        debug!("注册表配置: {:?}", config);

        let container = ServiceContainer::with_config(config.container.clone());

        let directory = Arc::new(DirectoryComponent::new(config.files.base_path.clone()));
        container.add_named(directory, Some(DIRECTORY_COMPONENT_NAME))?;

        let files = Arc::new(FileComponent::new(config.files.clone()));
        container.add_named(files.clone(), Some(FILE_COMPONENT_NAME))?;
        files.initialize()?;

        info!("组件注册表构建完成，共 {} 个组件", container.len());
        Ok(ComponentRegistry::new(
            container,
            config_manager,
            config,
            files,
        ))
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，未设置 `RUST_LOG` 时生效
    pub level: tracing::Level,
    /// 显式的过滤指令，例如 `di_impl=debug,info`
    pub filter: Option<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            filter: None,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 设置过滤指令
    pub fn with_filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into());
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, InfrastructureError> {
        match &self.filter {
            Some(directives) => {
                EnvFilter::try_new(directives).map_err(|e| InfrastructureError::BootstrapFailed {
                    message: format!("日志过滤指令无效: {}", e),
                })
            }
            None => Ok(EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(self.level).into())
                .from_env_lossy()),
        }
    }

    /// 初始化全局日志订阅者
    pub fn init(&self) -> Result<(), InfrastructureError> {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter()?)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
