//! 组件注册表

use config_impl::RegistryConfigManager;
use di_abstractions::{ComponentContainer, ContainerConfig};
use di_impl::ServiceContainer;
use file_components::{FileAccessOptions, FileComponent, FileServiceHandler};
use infrastructure_common::{ConfigError, DependencyError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 注册表配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// `container` 配置节
    pub container: ContainerConfig,
    /// `files` 配置节
    pub files: FileAccessOptions,
}

impl RegistryConfig {
    /// 从配置管理器读取各配置节，缺失的配置节使用默认值
    pub fn load(manager: &RegistryConfigManager) -> Result<Self, ConfigError> {
        Ok(Self {
            container: manager.bind_section("container")?,
            files: manager.bind_section("files")?,
        })
    }
}

/// 已组装完成的组件注册表
pub struct ComponentRegistry {
    container: ServiceContainer,
    config_manager: RegistryConfigManager,
    config: RegistryConfig,
    files: Arc<FileComponent>,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl ComponentRegistry {
    pub(crate) fn new(
        container: ServiceContainer,
        config_manager: RegistryConfigManager,
        config: RegistryConfig,
        files: Arc<FileComponent>,
    ) -> Self {
        Self {
            container,
            config_manager,
            config,
            files,
            started_at: chrono::Utc::now(),
        }
    }

    /// 组件容器
    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// 生效的注册表配置
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// 配置管理器
    pub fn config_manager(&self) -> &RegistryConfigManager {
        &self.config_manager
    }

    /// 注册表创建的文件访问组件
    pub fn file_component(&self) -> &Arc<FileComponent> {
        &self.files
    }

    /// 从容器解析文件服务处理器
    pub fn file_handler(&self) -> Result<FileServiceHandler, DependencyError> {
        FileServiceHandler::new(&self.container)
    }

    /// 启动时间
    pub fn started_at(&self) -> chrono::DateTime<chrono::Utc> {
        self.started_at
    }

    /// 运行时长
    pub fn uptime(&self) -> chrono::Duration {
        chrono::Utc::now() - self.started_at
    }

    /// 销毁容器，按注册逆序释放所有组件
    pub fn shutdown(&self) {
        info!(
            "关闭组件注册表，运行时长 {} 秒",
            self.uptime().num_seconds()
        );
        self.container.dispose();
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("container", &self.container)
            .field("config", &self.config)
            .field("started_at", &self.started_at)
            .finish()
    }
}
