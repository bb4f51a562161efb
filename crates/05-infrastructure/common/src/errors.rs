//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置序列化失败: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    #[error("配置键不存在: {key}")]
    KeyNotFound { key: String },

    #[error("配置类型转换失败: {message}")]
    TypeConversionError { message: String },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖解析错误类型
///
/// 协作组件在构造或初始化阶段无法解析所需能力时返回，属于致命错误，不重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    #[error("组件未找到: {capability}")]
    ComponentNotFound { capability: String },

    #[error("能力类型转换失败: {capability}")]
    CapabilityMismatch { capability: String },
}

impl DependencyError {
    /// 创建组件未找到错误
    pub fn not_found(capability: impl Into<String>) -> Self {
        Self::ComponentNotFound {
            capability: capability.into(),
        }
    }
}

/// 组件错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("参数无效: {name}")]
    InvalidArgument { name: String },

    #[error("组件名称重复: {name}")]
    DuplicateName { name: String },

    #[error("组件尚未放置到容器中: {component}")]
    NotSited { component: String },

    #[error("所属容器已不可用")]
    ContainerUnavailable,

    #[error("组件注册失败: {type_name}, 原因: {message}")]
    RegistrationError { type_name: String, message: String },
}

impl ComponentError {
    /// 创建参数无效错误
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }

    /// 创建名称重复错误
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }
}

/// 文件访问错误类型
#[derive(Error, Debug)]
pub enum FileAccessError {
    #[error("没有已打开的文件")]
    NotOpen,

    #[error("文件组件已释放")]
    AlreadyReleased,

    #[error("文件操作失败: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("依赖错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    Component {
        #[from]
        source: ComponentError,
    },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("组件错误: {source}")]
    ComponentError {
        #[from]
        source: ComponentError,
    },

    #[error("文件访问错误: {source}")]
    FileAccessError {
        #[from]
        source: FileAccessError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type FileAccessResult<T> = Result<T, FileAccessError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
