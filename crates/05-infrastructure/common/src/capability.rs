//! 组件能力描述
//!
//! 每个组件通过 [`Capabilities`] 显式声明自己满足的能力：自身的具体类型（精确能力）
//! 以及它实现的接口（提供的能力）。容器按能力标识查找组件，不依赖运行时反射。

use crate::metadata::TypeInfo;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// 类型擦除后的组件实例
pub type AnyInstance = Arc<dyn Any + Send + Sync>;

/// 类型擦除后的能力转换结果，内部总是 `Arc<I>`
pub type BoxedCapability = Box<dyn Any + Send + Sync>;

type Caster = Arc<dyn Fn(AnyInstance) -> Option<BoxedCapability> + Send + Sync>;

/// 能力标识
///
/// 相等性只比较 `TypeId`，类型名只用于诊断输出。
#[derive(Clone, Copy)]
pub struct CapabilityId {
    type_id: TypeId,
    name: &'static str,
}

impl CapabilityId {
    /// 获取类型或 trait 对象的能力标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 完整类型名
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CapabilityId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CapabilityId {}

impl Hash for CapabilityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.name)
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Clone)]
struct CapabilityEntry {
    id: CapabilityId,
    caster: Caster,
}

/// 组件能力描述符
#[derive(Clone)]
pub struct Capabilities {
    type_info: TypeInfo,
    exact: CapabilityEntry,
    provided: Vec<CapabilityEntry>,
}

impl Capabilities {
    /// 只包含精确类型的能力描述符
    pub fn of<T: Any + Send + Sync>() -> Self {
        Self::builder::<T>().build()
    }

    /// 创建能力描述符构建器
    pub fn builder<T: Any + Send + Sync>() -> CapabilitiesBuilder<T> {
        CapabilitiesBuilder {
            provided: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// 组件具体类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 精确能力（组件具体类型）
    pub fn exact(&self) -> CapabilityId {
        self.exact.id
    }

    /// 是否为精确类型匹配
    pub fn matches_exact(&self, id: CapabilityId) -> bool {
        self.exact.id == id
    }

    /// 是否在声明的接口集合中
    pub fn provides(&self, id: CapabilityId) -> bool {
        self.provided.iter().any(|entry| entry.id == id)
    }

    /// 精确类型匹配或提供该接口
    pub fn satisfies(&self, id: CapabilityId) -> bool {
        self.matches_exact(id) || self.provides(id)
    }

    /// 所有能力标识，精确能力在前
    pub fn ids(&self) -> Vec<CapabilityId> {
        std::iter::once(self.exact.id)
            .chain(self.provided.iter().map(|entry| entry.id))
            .collect()
    }

    /// 按能力标识进行类型擦除的转换
    pub fn cast_by_id(&self, id: CapabilityId, instance: AnyInstance) -> Option<BoxedCapability> {
        let entry = if self.exact.id == id {
            &self.exact
        } else {
            self.provided.iter().find(|entry| entry.id == id)?
        };
        (entry.caster)(instance)
    }

    /// 转换为指定能力的强类型 `Arc`
    pub fn cast<I: ?Sized + Send + Sync + 'static>(&self, instance: AnyInstance) -> Option<Arc<I>> {
        self.cast_by_id(CapabilityId::of::<I>(), instance)
            .and_then(|boxed| boxed.downcast::<Arc<I>>().ok())
            .map(|boxed| *boxed)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("exact", &self.exact.id)
            .field(
                "provided",
                &self.provided.iter().map(|entry| entry.id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// 能力描述符构建器
pub struct CapabilitiesBuilder<T> {
    provided: Vec<CapabilityEntry>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> CapabilitiesBuilder<T> {
    /// 声明组件实现的接口
    ///
    /// `cast` 通常写成 `|this| this`，由编译器完成到 trait 对象的转换。
    pub fn provide<I: ?Sized + Send + Sync + 'static>(mut self, cast: fn(Arc<T>) -> Arc<I>) -> Self {
        let id = CapabilityId::of::<I>();
        if id == CapabilityId::of::<T>() || self.provided.iter().any(|entry| entry.id == id) {
            return self;
        }

        let caster: Caster = Arc::new(move |instance: AnyInstance| {
            let typed = instance.downcast::<T>().ok()?;
            Some(Box::new(cast(typed)) as BoxedCapability)
        });
        self.provided.push(CapabilityEntry { id, caster });
        self
    }

    /// 构建能力描述符
    pub fn build(self) -> Capabilities {
        let exact: Caster = Arc::new(|instance: AnyInstance| {
            let typed = instance.downcast::<T>().ok()?;
            Some(Box::new(typed) as BoxedCapability)
        });

        Capabilities {
            type_info: TypeInfo::of::<T>(),
            exact: CapabilityEntry {
                id: CapabilityId::of::<T>(),
                caster: exact,
            },
            provided: self.provided,
        }
    }
}
