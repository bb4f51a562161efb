//! 组件基础接口定义

use crate::site::{ComponentSite, SiteId};
use infrastructure_common::{AnyInstance, Capabilities, InheritanceLevel};
use parking_lot::RwLock;
use std::any::Any;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// 把 `Arc<Self>` 转换为类型擦除实例
///
/// 对所有 `Any + Send + Sync` 类型自动实现，使 `Arc<dyn Component>` 可以被向下转换。
pub trait IntoAnyInstance: Any + Send + Sync {
    /// 转换为类型擦除实例
    fn into_any_instance(self: Arc<Self>) -> AnyInstance;
}

impl<T: Any + Send + Sync> IntoAnyInstance for T {
    fn into_any_instance(self: Arc<Self>) -> AnyInstance {
        self
    }
}

/// 组件基础 trait
///
/// 所有可注册到容器中的组件都必须实现此 trait。通常通过
/// `#[derive(Component)]` 生成实现。
pub trait Component: IntoAnyInstance + Debug {
    /// 组件能力描述符（具体类型与实现的接口）
    fn capabilities(&self) -> Capabilities;

    /// 当前站点存放位置
    fn site_slot(&self) -> &SiteSlot;

    /// 当前站点
    fn site(&self) -> Option<Arc<dyn ComponentSite>> {
        self.site_slot().get()
    }

    /// 设置或清空当前站点，由容器调用
    fn set_site(&self, site: Option<Arc<dyn ComponentSite>>) {
        self.site_slot().set(site);
    }

    /// 组件继承级别
    fn inheritance_level(&self) -> InheritanceLevel {
        InheritanceLevel::NotInherited
    }

    /// 容器销毁时调用的释放操作
    fn release(&self) {}
}

/// 组件当前站点的存放位置
#[derive(Default)]
pub struct SiteSlot {
    site: RwLock<Option<Arc<dyn ComponentSite>>>,
}

impl SiteSlot {
    /// 创建空的站点槽
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取当前站点
    pub fn get(&self) -> Option<Arc<dyn ComponentSite>> {
        self.site.read().clone()
    }

    /// 设置当前站点
    pub fn set(&self, site: Option<Arc<dyn ComponentSite>>) {
        *self.site.write() = site;
    }

    /// 是否已放置
    pub fn is_sited(&self) -> bool {
        self.site.read().is_some()
    }

    /// 槽位空闲（未放置或站点已失效）时放入新站点，返回是否放入
    pub fn attach_if_vacant(&self, site: Arc<dyn ComponentSite>) -> bool {
        let mut slot = self.site.write();
        if slot.as_ref().map_or(false, |current| current.is_active()) {
            return false;
        }
        *slot = Some(site);
        true
    }

    /// 仅当槽位仍指向指定站点时清空
    pub fn clear_if(&self, site_id: SiteId) -> bool {
        let mut slot = self.site.write();
        if slot.as_ref().map_or(false, |current| current.id() == site_id) {
            *slot = None;
            return true;
        }
        false
    }
}

impl Debug for SiteSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.site.read().as_ref() {
            Some(site) => f
                .debug_struct("SiteSlot")
                .field("site", &site.id())
                .finish(),
            None => f.write_str("SiteSlot(unsited)"),
        }
    }
}

/// 组件实例地址，用于身份比较
pub fn component_addr(component: &dyn Component) -> *const () {
    component as *const dyn Component as *const ()
}

/// 两个引用是否指向同一个组件实例
pub fn same_component(a: &dyn Component, b: &dyn Component) -> bool {
    component_addr(a) == component_addr(b)
}
