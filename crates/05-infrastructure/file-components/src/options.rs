//! 文件组件配置

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::PathBuf;

/// 文件打开模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenMode {
    /// 创建新文件，文件已存在时失败
    CreateNew,
    /// 创建文件，已存在时截断
    Create,
    /// 打开已存在的文件
    Open,
    /// 打开文件，不存在时创建
    OpenOrCreate,
    /// 打开已存在的文件并截断
    Truncate,
    /// 追加到文件末尾，不存在时创建
    Append,
}

impl OpenMode {
    /// 转换为对应的 [`OpenOptions`]
    pub fn to_open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            Self::CreateNew => options.write(true).create_new(true),
            Self::Create => options.write(true).create(true).truncate(true),
            Self::Open => options.read(true).write(true),
            Self::OpenOrCreate => options.read(true).write(true).create(true),
            Self::Truncate => options.write(true).truncate(true),
            Self::Append => options.append(true).create(true),
        };
        options
    }
}

/// 文件组件配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAccessOptions {
    /// `open` 使用的基础目录
    pub base_path: PathBuf,
    /// 打开文件前是否创建缺失的目录
    pub create_missing_directories: bool,
}

impl Default for FileAccessOptions {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("."),
            create_missing_directories: false,
        }
    }
}

impl FileAccessOptions {
    /// 以指定目录为基础目录
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// 设置是否创建缺失的目录
    pub fn with_create_missing_directories(mut self, create: bool) -> Self {
        self.create_missing_directories = create;
        self
    }
}
