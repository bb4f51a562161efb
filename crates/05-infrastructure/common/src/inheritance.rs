//! 组件继承标记

use serde::{Deserialize, Serialize};

/// 组件继承级别
///
/// 名称冲突检查时，与 `InheritedReadOnly` 组件的冲突会被容忍。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InheritanceLevel {
    /// 非继承组件
    #[default]
    NotInherited,
    /// 继承而来，可修改
    Inherited,
    /// 继承而来，只读
    InheritedReadOnly,
}

impl InheritanceLevel {
    /// 是否为只读继承组件
    pub fn is_read_only(self) -> bool {
        matches!(self, Self::InheritedReadOnly)
    }
}
