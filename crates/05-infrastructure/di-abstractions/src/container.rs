//! 组件容器抽象接口
//!
//! 提供组件容器的核心抽象

use crate::component::{same_component, Component};
use crate::resolver::ServiceProvider;
use infrastructure_common::ComponentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// 容器标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub uuid::Uuid);

impl ContainerId {
    /// 生成新的容器标识
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container-{}", self.0)
    }
}

/// 组件容器 trait
///
/// 所有结构性操作（注册、移除、销毁、重建枚举缓存）在同一把容器锁下串行执行。
pub trait ComponentContainer: ServiceProvider {
    /// 容器标识
    fn id(&self) -> ContainerId;

    /// 注册无名称组件
    fn add(&self, component: Arc<dyn Component>) -> Result<(), ComponentError> {
        self.add_named(component, None)
    }

    /// 注册组件
    ///
    /// 组件已放置在本容器中时不做任何事；放置在其他容器中时先从原容器移除。
    fn add_named(
        &self,
        component: Arc<dyn Component>,
        name: Option<&str>,
    ) -> Result<(), ComponentError>;

    /// 移除组件；组件的站点不属于本容器时不做任何事
    fn remove(&self, component: &dyn Component);

    /// 按注册顺序枚举组件（可能经过 [`ContainerFilter`] 处理）
    fn components(&self) -> ComponentCollection;

    /// 校验名称在活动站点中（忽略大小写）是否唯一
    fn validate_name(
        &self,
        component: Option<&dyn Component>,
        name: Option<&str>,
    ) -> Result<(), ComponentError>;

    /// 活动站点数量
    fn len(&self) -> usize;

    /// 是否没有活动站点
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 销毁容器：按注册的逆序释放所有组件
    fn dispose(&self);
}

/// 容器枚举过滤器
///
/// 注册为组件并声明 `dyn ContainerFilter` 能力即可生效；返回 `None` 表示保持原序列。
pub trait ContainerFilter: Send + Sync {
    /// 过滤组件序列
    fn filter_components(&self, components: &ComponentCollection) -> Option<ComponentCollection>;
}

/// 组件序列
///
/// 克隆代价很低，容器的枚举缓存直接共享给调用方。
#[derive(Clone)]
pub struct ComponentCollection {
    components: Arc<[Arc<dyn Component>]>,
}

impl ComponentCollection {
    /// 由组件列表创建
    pub fn new(components: Vec<Arc<dyn Component>>) -> Self {
        Self {
            components: components.into(),
        }
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// 按位置获取组件
    pub fn get(&self, index: usize) -> Option<&Arc<dyn Component>> {
        self.components.get(index)
    }

    /// 迭代组件
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<dyn Component>> {
        self.components.iter()
    }

    /// 是否包含指定组件实例
    pub fn contains(&self, component: &dyn Component) -> bool {
        self.components
            .iter()
            .any(|c| same_component(c.as_ref(), component))
    }

    /// 复制为列表
    pub fn to_vec(&self) -> Vec<Arc<dyn Component>> {
        self.components.to_vec()
    }
}

impl Default for ComponentCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl fmt::Debug for ComponentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.components.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ComponentCollection {
    type Item = &'a Arc<dyn Component>;
    type IntoIter = std::slice::Iter<'a, Arc<dyn Component>>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

impl FromIterator<Arc<dyn Component>> for ComponentCollection {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Component>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// 名称冲突策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// 与非只读继承组件的名称冲突直接拒绝
    #[default]
    Strict,
    /// 名称冲突只记录警告并接受
    Relaxed,
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 站点存储的初始容量，耗尽时翻倍
    pub initial_capacity: usize,
    /// 名称冲突策略
    pub name_policy: NamePolicy,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 4,
            name_policy: NamePolicy::Strict,
        }
    }
}

impl ContainerConfig {
    /// 设置初始容量
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity.max(1);
        self
    }

    /// 设置名称冲突策略
    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }
}
