//! 配置管理器实现

use config_abstractions::ConfigProvider;
use infrastructure_common::{ConfigError, ConfigSection};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

/// 注册表配置管理器
///
/// 协调多个配置源，按优先级从高到低查询。读取配置节时合并所有提供者的数据，
/// 高优先级提供者的键不会被低优先级覆盖。
#[derive(Default)]
pub struct RegistryConfigManager {
    /// 配置提供者列表（按优先级排序）
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl fmt::Debug for RegistryConfigManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryConfigManager")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl RegistryConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册配置提供者
    pub fn add_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        info!(
            "注册配置提供者: {} (优先级 {})",
            provider.name(),
            provider.priority()
        );
        self.providers.push(provider);
        // 稳定排序，同优先级保持注册顺序
        self.providers.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// 获取配置提供者数量
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// 按优先级顺序获取配置值
    pub fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        for provider in &self.providers {
            match provider.get_configuration(key) {
                Ok(value) => {
                    debug!("从提供者 {} 获取配置: {}", provider.name(), key);
                    return Ok(value);
                }
                Err(ConfigError::KeyNotFound { .. }) => continue,
                Err(e) => {
                    warn!("提供者 {} 获取配置失败: {}", provider.name(), e);
                    continue;
                }
            }
        }

        Err(ConfigError::KeyNotFound {
            key: key.to_string(),
        })
    }

    /// 获取指定类型的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self.get_configuration(key)?;
        serde_json::from_value(value).map_err(|e| ConfigError::TypeConversionError {
            message: format!("{}: {}", key, e),
        })
    }

    /// 合并所有提供者的配置节；没有任何提供者包含该节时返回空配置节
    pub fn get_section(&self, section_name: &str) -> ConfigSection {
        let mut combined = ConfigSection::new();

        for provider in &self.providers {
            match provider.get_section(section_name) {
                Ok(section) => combined.merge_missing(section),
                Err(ConfigError::KeyNotFound { .. }) => continue,
                Err(e) => {
                    warn!("提供者 {} 获取配置节失败: {}", provider.name(), e);
                }
            }
        }

        combined
    }

    /// 将配置节绑定到类型；配置节不存在时使用类型默认值
    pub fn bind_section<T>(&self, section_name: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Default,
    {
        let section = self.get_section(section_name);
        if section.is_empty() {
            debug!("配置节 {} 不存在，使用默认配置", section_name);
            return Ok(T::default());
        }
        section.bind()
    }

    /// 是否有任一提供者包含该键
    pub fn contains_key(&self, key: &str) -> bool {
        self.providers.iter().any(|p| p.contains_key(key))
    }

    /// 所有提供者的键，去重后排序
    pub fn get_all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .providers
            .iter()
            .flat_map(|p| p.get_all_keys())
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    /// 重新加载所有提供者
    pub fn reload_all(&mut self) -> Result<(), ConfigError> {
        for provider in &mut self.providers {
            debug!("重新加载配置提供者: {}", provider.name());
            provider.reload()?;
        }
        Ok(())
    }
}
