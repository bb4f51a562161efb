//! 配置提供者实现

use config_abstractions::{ConfigProvider, FileConfigProvider};
use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// TOML 配置提供者
#[derive(Debug)]
pub struct TomlConfigProvider {
    file_path: PathBuf,
    config: Option<toml::Value>,
    last_modified: Option<SystemTime>,
    priority: i32,
}

impl TomlConfigProvider {
    /// 创建新的 TOML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            config: None,
            last_modified: None,
            priority: 100, // TOML 文件默认高优先级
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        self.config = Some(toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?);
        self.last_modified = Some(modified_time(&self.file_path)?);

        debug!("TOML 配置文件加载完成");
        Ok(())
    }

    fn get_nested_value(&self, path: &str) -> Option<&toml::Value> {
        let mut current = self.config.as_ref()?;
        for part in path.split('.') {
            match current {
                toml::Value::Table(table) => current = table.get(part)?,
                _ => return None,
            }
        }
        Some(current)
    }
}

/// 将 TOML 值转换为 JSON 值
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

fn collect_toml_keys(table: &toml::Table, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in table {
        let full_key = join_key(prefix, key);
        if let toml::Value::Table(nested) = value {
            collect_toml_keys(nested, &full_key, keys);
        }
        keys.push(full_key);
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.get_nested_value(key)
            .map(toml_to_json)
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        match self.get_nested_value(section_name) {
            Some(toml::Value::Table(table)) => {
                let mut section = ConfigSection::new();
                for (key, value) in table {
                    section.insert(key.clone(), toml_to_json(value));
                }
                Ok(section)
            }
            Some(_) => Err(ConfigError::TypeConversionError {
                message: format!("配置节 {} 不是表类型", section_name),
            }),
            None => Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            }),
        }
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get_nested_value(key).is_some()
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(toml::Value::Table(table)) = &self.config {
            collect_toml_keys(table, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "TomlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for TomlConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn last_modified(&self) -> Result<SystemTime, ConfigError> {
        self.last_modified.ok_or_else(|| ConfigError::ValidationError {
            message: "文件尚未加载".to_string(),
        })
    }
}

/// JSON 配置提供者
#[derive(Debug)]
pub struct JsonConfigProvider {
    file_path: PathBuf,
    config: Option<Value>,
    last_modified: Option<SystemTime>,
    priority: i32,
}

impl JsonConfigProvider {
    /// 创建新的 JSON 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            config: None,
            last_modified: None,
            priority: 90, // JSON 文件中等优先级
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 JSON 配置文件: {}", self.file_path.display());

        let content = read_config_file(&self.file_path)?;
        self.config = Some(serde_json::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?);
        self.last_modified = Some(modified_time(&self.file_path)?);

        debug!("JSON 配置文件加载完成");
        Ok(())
    }

    fn get_nested_value(&self, path: &str) -> Option<&Value> {
        let mut current = self.config.as_ref()?;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }
}

fn collect_json_keys(obj: &serde_json::Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in obj {
        let full_key = join_key(prefix, key);
        if let Value::Object(nested) = value {
            collect_json_keys(nested, &full_key, keys);
        }
        keys.push(full_key);
    }
}

impl ConfigProvider for JsonConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.get_nested_value(key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        match self.get_nested_value(section_name) {
            Some(Value::Object(obj)) => {
                let mut section = ConfigSection::new();
                for (key, value) in obj {
                    section.insert(key.clone(), value.clone());
                }
                Ok(section)
            }
            Some(_) => Err(ConfigError::TypeConversionError {
                message: format!("配置节 {} 不是对象类型", section_name),
            }),
            None => Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            }),
        }
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get_nested_value(key).is_some()
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Some(Value::Object(obj)) = &self.config {
            collect_json_keys(obj, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "JsonConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for JsonConfigProvider {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn last_modified(&self) -> Result<SystemTime, ConfigError> {
        self.last_modified.ok_or_else(|| ConfigError::ValidationError {
            message: "文件尚未加载".to_string(),
        })
    }
}

/// 环境变量配置提供者
///
/// `REGISTRY_CONTAINER_INITIAL_CAPACITY=8` 在前缀为 `REGISTRY` 时映射为键
/// `container.initial.capacity`；读取配置节 `container` 时子键还原为
/// `initial_capacity`，以便直接绑定到结构体字段。
#[derive(Debug)]
pub struct EnvironmentConfigProvider {
    prefix: String,
    separator: String,
    priority: i32,
    env_vars: HashMap<String, String>,
    snapshot: Option<Vec<(String, String)>>,
}

impl EnvironmentConfigProvider {
    /// 从进程环境变量创建提供者
    pub fn new(prefix: impl Into<String>) -> Self {
        let mut provider = Self {
            prefix: prefix.into(),
            separator: "_".to_string(),
            priority: 200, // 环境变量最高优先级
            env_vars: HashMap::new(),
            snapshot: None,
        };
        provider.load_env_vars();
        provider
    }

    /// 从给定的变量集合创建提供者，不读取进程环境
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let snapshot = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let mut provider = Self {
            prefix: prefix.into(),
            separator: "_".to_string(),
            priority: 200,
            env_vars: HashMap::new(),
            snapshot: Some(snapshot),
        };
        provider.load_env_vars();
        provider
    }

    /// 设置分隔符
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self.load_env_vars();
        self
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 环境变量前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn load_env_vars(&mut self) {
        debug!("加载环境变量，前缀: {}", self.prefix);

        let vars: Vec<(String, String)> = match &self.snapshot {
            Some(snapshot) => snapshot.clone(),
            None => std::env::vars().collect(),
        };

        self.env_vars.clear();
        for (key, value) in vars {
            if let Some(config_key) = self.env_key_to_config_key(&key) {
                self.env_vars.insert(config_key, value);
            }
        }

        debug!("加载了 {} 个环境变量", self.env_vars.len());
    }

    /// 将环境变量键转换为配置键；前缀不匹配时返回 `None`
    fn env_key_to_config_key(&self, env_key: &str) -> Option<String> {
        let rest = env_key.strip_prefix(&self.prefix)?;
        let rest = rest.strip_prefix(self.separator.as_str())?;
        if rest.is_empty() {
            return None;
        }
        Some(rest.replace(self.separator.as_str(), ".").to_lowercase())
    }
}

/// 按布尔、整数、浮点、字符串的顺序推断标量类型
fn sniff_scalar(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Number(serde_json::Number::from(i))
    } else if let Some(n) = raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        Value::Number(n)
    } else {
        Value::String(raw.to_string())
    }
}

impl ConfigProvider for EnvironmentConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.env_vars
            .get(key)
            .map(|raw| sniff_scalar(raw))
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        let section_prefix = format!("{}.", section_name);
        let mut section = ConfigSection::new();

        for (key, value) in &self.env_vars {
            if let Some(sub_key) = key.strip_prefix(&section_prefix) {
                section.insert(sub_key.replace('.', "_"), sniff_scalar(value));
            }
        }

        if section.is_empty() {
            Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            })
        } else {
            Ok(section)
        }
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_env_vars();
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.env_vars.contains_key(key)
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.env_vars.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

fn modified_time(path: &Path) -> Result<SystemTime, ConfigError> {
    Ok(std::fs::metadata(path).and_then(|m| m.modified())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_toml_nested_lookup() {
        let file = write_temp(
            ".toml",
            r#"
[container]
initial_capacity = 8
name_policy = "relaxed"

[files]
base_path = "/var/data"
"#,
        );
        let provider = TomlConfigProvider::new(file.path()).unwrap();

        assert_eq!(
            provider.get_configuration("container.initial_capacity").unwrap(),
            json!(8)
        );
        assert!(provider.contains_key("files.base_path"));
        assert!(!provider.contains_key("files.missing"));

        let section = provider.get_section("container").unwrap();
        assert_eq!(section.get("name_policy"), Some(&json!("relaxed")));

        let keys = provider.get_all_keys();
        assert!(keys.contains(&"container".to_string()));
        assert!(keys.contains(&"container.initial_capacity".to_string()));
        assert!(provider.last_modified().is_ok());
    }

    #[test]
    fn test_toml_section_must_be_table() {
        let file = write_temp(".toml", "value = 1\n");
        let provider = TomlConfigProvider::new(file.path()).unwrap();

        assert!(matches!(
            provider.get_section("value"),
            Err(ConfigError::TypeConversionError { .. })
        ));
        assert!(matches!(
            provider.get_section("absent"),
            Err(ConfigError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn test_toml_reload_picks_up_changes() {
        let file = write_temp(".toml", "[files]\nbase_path = \"a\"\n");
        let mut provider = TomlConfigProvider::new(file.path()).unwrap();

        std::fs::write(file.path(), "[files]\nbase_path = \"b\"\n").unwrap();
        provider.reload().unwrap();

        assert_eq!(
            provider.get_configuration("files.base_path").unwrap(),
            json!("b")
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = TomlConfigProvider::new("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let file = write_temp(".toml", "[container\n");
        let err = TomlConfigProvider::new(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_json_provider() {
        let file = write_temp(
            ".json",
            r#"{ "files": { "base_path": "/srv", "create_missing_directories": true } }"#,
        );
        let provider = JsonConfigProvider::new(file.path()).unwrap();

        assert_eq!(
            provider
                .get_configuration("files.create_missing_directories")
                .unwrap(),
            json!(true)
        );
        assert_eq!(provider.get_section("files").unwrap().data.len(), 2);
        assert_eq!(provider.priority(), 90);
        assert!(provider.file_exists());
    }

    #[test]
    fn test_environment_key_mapping() {
        let provider = EnvironmentConfigProvider::from_vars(
            "REGISTRY",
            vec![
                ("REGISTRY_CONTAINER_INITIAL_CAPACITY", "16"),
                ("REGISTRY_FILES_CREATE_MISSING_DIRECTORIES", "true"),
                ("REGISTRY_FILES_BASE_PATH", "/tmp/out"),
                ("OTHER_VALUE", "ignored"),
                ("REGISTRYX_VALUE", "ignored"),
            ],
        );

        assert_eq!(
            provider
                .get_configuration("container.initial.capacity")
                .unwrap(),
            json!(16)
        );
        assert_eq!(provider.get_all_keys().len(), 3);

        let files = provider.get_section("files").unwrap();
        assert_eq!(files.get("create_missing_directories"), Some(&json!(true)));
        assert_eq!(files.get("base_path"), Some(&json!("/tmp/out")));
        assert!(provider.get_section("absent").is_err());
    }

    #[test]
    fn test_scalar_sniffing() {
        assert_eq!(sniff_scalar("false"), json!(false));
        assert_eq!(sniff_scalar("-3"), json!(-3));
        assert_eq!(sniff_scalar("2.5"), json!(2.5));
        assert_eq!(sniff_scalar("strict"), json!("strict"));
    }
}
