//! 服务站点实现

use crate::container::{ContainerShared, ServiceContainer};
use chrono::{DateTime, Utc};
use di_abstractions::{
    Component, ComponentContainer, ComponentSite, ContainerId, Service, ServiceProvider, SiteId,
};
use infrastructure_common::{CapabilityId, ComponentError};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

/// 容器为每个已注册组件签发的站点
///
/// 站点对所属容器和组件都只持有弱引用，组件通过自己的站点槽持有站点。
pub struct ServiceSite {
    id: SiteId,
    this: Weak<ServiceSite>,
    container: Weak<ContainerShared>,
    container_id: ContainerId,
    component: Weak<dyn Component>,
    name: RwLock<Option<String>>,
    active: AtomicBool,
    attached_at: DateTime<Utc>,
}

impl ServiceSite {
    pub(crate) fn new(
        container: Weak<ContainerShared>,
        container_id: ContainerId,
        component: Weak<dyn Component>,
        name: Option<String>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            id: SiteId::new(),
            this: this.clone(),
            container,
            container_id,
            component,
            name: RwLock::new(name),
            active: AtomicBool::new(true),
            attached_at: Utc::now(),
        })
    }

    /// 站点离开容器后失效
    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// 写入已校验的名称，由容器在写锁内调用
    pub(crate) fn store_name(&self, name: Option<&str>) {
        debug!("站点 {} 重命名为 {:?}", self.id, name);
        *self.name.write() = name.map(str::to_owned);
    }
}

impl ComponentSite for ServiceSite {
    fn id(&self) -> SiteId {
        self.id
    }

    fn component(&self) -> Option<Arc<dyn Component>> {
        if !self.is_active() {
            return None;
        }
        self.component.upgrade()
    }

    fn container(&self) -> Option<Arc<dyn ComponentContainer>> {
        let shared = self.container.upgrade()?;
        let container: Arc<dyn ComponentContainer> =
            Arc::new(ServiceContainer::from_shared(shared));
        Some(container)
    }

    fn container_id(&self) -> ContainerId {
        self.container_id
    }

    fn name(&self) -> Option<String> {
        self.name.read().clone()
    }

    fn set_name(&self, name: Option<&str>) -> Result<(), ComponentError> {
        if let (Some(new), Some(current)) = (name, self.name.read().as_deref()) {
            if new == current {
                return Ok(());
            }
        }

        let shared = self
            .container
            .upgrade()
            .ok_or(ComponentError::ContainerUnavailable)?;
        let component = self
            .component()
            .ok_or_else(|| ComponentError::invalid_argument("component"))?;
        shared.rename(self, component.as_ref(), name)
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn attached_at(&self) -> DateTime<Utc> {
        self.attached_at
    }
}

impl ServiceProvider for ServiceSite {
    fn get_service_by_id(&self, capability: CapabilityId) -> Option<Service> {
        if capability == CapabilityId::of::<dyn ComponentSite>() {
            let this: Arc<dyn ComponentSite> = self.this.upgrade()?;
            return Some(Service::Site(this));
        }
        self.container()?.get_service_by_id(capability)
    }
}

impl fmt::Debug for ServiceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSite")
            .field("id", &self.id)
            .field("name", &*self.name.read())
            .field("container", &self.container_id)
            .field("active", &self.is_active())
            .finish()
    }
}
