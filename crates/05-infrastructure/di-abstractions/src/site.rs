//! 组件站点抽象接口
//!
//! 站点是容器为每个已注册组件签发的句柄，绑定组件、所属容器和显示名称。

use crate::component::Component;
use crate::container::{ComponentContainer, ContainerId};
use crate::resolver::ServiceProvider;
use infrastructure_common::ComponentError;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// 站点标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteId(pub uuid::Uuid);

impl SiteId {
    /// 生成新的站点标识
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SiteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "site-{}", self.0)
    }
}

/// 组件站点 trait
pub trait ComponentSite: ServiceProvider + Debug {
    /// 站点标识
    fn id(&self) -> SiteId;

    /// 被放置的组件；站点失效或组件已释放时返回 `None`
    fn component(&self) -> Option<Arc<dyn Component>>;

    /// 所属容器；容器已销毁时返回 `None`
    fn container(&self) -> Option<Arc<dyn ComponentContainer>>;

    /// 所属容器标识
    fn container_id(&self) -> ContainerId;

    /// 当前名称
    fn name(&self) -> Option<String>;

    /// 重命名，名称经所属容器校验
    fn set_name(&self, name: Option<&str>) -> Result<(), ComponentError>;

    /// 是否处于设计模式，本注册表中始终为 `false`
    fn design_mode(&self) -> bool {
        false
    }

    /// 站点是否仍处于活动状态
    fn is_active(&self) -> bool;

    /// 站点创建时间
    fn attached_at(&self) -> chrono::DateTime<chrono::Utc>;
}

/// 站点快照，用于诊断输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteInfo {
    /// 站点标识
    pub id: SiteId,
    /// 站点名称
    pub name: Option<String>,
    /// 组件类型名称
    pub type_name: String,
    /// 站点创建时间
    pub attached_at: chrono::DateTime<chrono::Utc>,
}
