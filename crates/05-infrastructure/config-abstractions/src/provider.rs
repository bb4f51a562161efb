//! 配置提供者抽象接口

use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::path::Path;
use std::time::SystemTime;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口。键使用 `.` 分隔的嵌套路径，
/// 例如 `container.initial_capacity`。
pub trait ConfigProvider: Send + Sync {
    /// 获取配置值
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取配置节
    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError>;

    /// 重新加载配置
    fn reload(&mut self) -> Result<(), ConfigError>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool;

    /// 获取所有配置键
    fn get_all_keys(&self) -> Vec<String>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级，数值越大越先被查询
    fn priority(&self) -> i32 {
        0
    }
}

/// 文件配置提供者 trait
pub trait FileConfigProvider: ConfigProvider {
    /// 获取文件路径
    fn file_path(&self) -> &Path;

    /// 检查文件是否存在
    fn file_exists(&self) -> bool {
        self.file_path().exists()
    }

    /// 获取文件最后修改时间
    fn last_modified(&self) -> Result<SystemTime, ConfigError>;
}
