//! 元数据定义
//!
//! 提供组件和类型的元数据信息

use std::any::TypeId;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称（不含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name).to_string(),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

/// 去掉类型路径前缀，保留 `dyn ` 前缀与泛型参数之前的最后一段
fn short_type_name(full_name: &str) -> &str {
    let without_dyn = full_name.strip_prefix("dyn ").unwrap_or(full_name);
    let head = without_dyn.split('<').next().unwrap_or(without_dyn);
    match head.rfind("::") {
        Some(pos) => &without_dyn[pos + 2..],
        None => without_dyn,
    }
}
