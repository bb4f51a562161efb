//! 服务容器实现

use crate::site::ServiceSite;
use di_abstractions::{
    same_component, Component, ComponentCollection, ComponentContainer, ComponentSite,
    ContainerConfig, ContainerFilter, ContainerId, NamePolicy, ResolvedComponent, Service,
    ServiceProvider, SiteId, SiteInfo,
};
use infrastructure_common::{Capabilities, CapabilityId, ComponentError};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 已注册组件的记录
#[derive(Clone)]
struct SiteRecord {
    site: Arc<ServiceSite>,
    component: Arc<dyn Component>,
    capabilities: Capabilities,
}

#[derive(Default)]
struct ContainerState {
    sites: Vec<SiteRecord>,
    /// 枚举缓存，任何结构性变更都会清空
    cache: Option<ComponentCollection>,
    /// 每次结构性变更递增
    generation: u64,
}

impl ContainerState {
    fn invalidate(&mut self) {
        self.cache = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

/// 容器共享状态，由所有容器句柄共同持有；站点只持有弱引用
pub(crate) struct ContainerShared {
    id: ContainerId,
    config: ContainerConfig,
    state: RwLock<ContainerState>,
}

impl ContainerShared {
    fn new(config: ContainerConfig) -> Self {
        Self {
            id: ContainerId::new(),
            config,
            state: RwLock::new(ContainerState::default()),
        }
    }

    fn check_name(
        &self,
        state: &ContainerState,
        component: &dyn Component,
        name: Option<&str>,
    ) -> Result<(), ComponentError> {
        let Some(name) = name else {
            return Ok(());
        };

        for record in &state.sites {
            if same_component(record.component.as_ref(), component) {
                continue;
            }
            let Some(existing) = record.site.name() else {
                continue;
            };
            if !names_collide(&existing, name) {
                continue;
            }

            if record.component.inheritance_level().is_read_only() {
                debug!("名称 '{}' 与只读继承组件重复，允许使用", name);
                continue;
            }

            match self.config.name_policy {
                NamePolicy::Strict => return Err(ComponentError::duplicate_name(name)),
                NamePolicy::Relaxed => {
                    warn!("名称 '{}' 与已有组件重复，按宽松策略接受", name);
                }
            }
        }

        Ok(())
    }

    fn find(state: &ContainerState, capability: CapabilityId) -> Option<Service> {
        state
            .sites
            .iter()
            .find(|record| record.capabilities.satisfies(capability))
            .map(|record| {
                Service::Component(ResolvedComponent::new(
                    record.component.clone(),
                    record.capabilities.clone(),
                    capability,
                ))
            })
    }

    fn detach(&self, site_id: SiteId, component: &dyn Component, unsite: bool) -> bool {
        let mut state = self.state.write();
        let Some(index) = state.sites.iter().position(|r| r.site.id() == site_id) else {
            return false;
        };

        let record = state.sites.remove(index);
        record.site.deactivate();
        state.invalidate();
        if unsite {
            component.site_slot().clear_if(site_id);
        }
        drop(state);

        info!(
            "移除组件: {} ({})",
            record.capabilities.type_info().short_name(),
            record.site.id()
        );
        true
    }

    /// 清空站点后按注册逆序释放组件，释放期间不持有容器锁
    fn teardown(&self) {
        let drained = {
            let mut state = self.state.write();
            state.invalidate();
            std::mem::take(&mut state.sites)
        };
        if drained.is_empty() {
            return;
        }

        info!("销毁容器 {}，释放 {} 个组件", self.id, drained.len());
        for record in drained.into_iter().rev() {
            record.site.deactivate();
            record.component.site_slot().clear_if(record.site.id());
            debug!("释放组件: {}", record.capabilities.type_info().short_name());
            record.component.release();
        }
    }

    /// 在容器写锁内校验并写入站点名称
    pub(crate) fn rename(
        &self,
        site: &ServiceSite,
        component: &dyn Component,
        name: Option<&str>,
    ) -> Result<(), ComponentError> {
        let state = self.state.write();
        self.check_name(&state, component, name)?;
        site.store_name(name);
        Ok(())
    }
}

impl Drop for ContainerShared {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn names_collide(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// 站点存储耗尽时的增长策略：首次分配初始容量，之后翻倍
fn reserve_slot(sites: &mut Vec<SiteRecord>, initial_capacity: usize) {
    if sites.capacity() == 0 {
        sites.reserve_exact(initial_capacity.max(1));
    } else if sites.len() == sites.capacity() {
        let doubled = sites.capacity();
        sites.reserve_exact(doubled);
    }
}

/// 服务容器
///
/// 句柄可以廉价克隆，所有克隆共享同一个容器。最后一个句柄被丢弃时，
/// 容器按注册逆序释放仍在其中的组件。
#[derive(Clone)]
pub struct ServiceContainer {
    shared: Arc<ContainerShared>,
}

impl ServiceContainer {
    /// 使用默认配置创建容器
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// 使用指定配置创建容器
    pub fn with_config(config: ContainerConfig) -> Self {
        let shared = Arc::new(ContainerShared::new(config));
        debug!("创建容器: {}", shared.id);
        Self { shared }
    }

    pub(crate) fn from_shared(shared: Arc<ContainerShared>) -> Self {
        Self { shared }
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.shared.config
    }

    /// 移除组件但保留其失效的站点引用
    ///
    /// 组件之后仍可通过 [`Component::site`] 看到旧站点，但站点已不再活动，
    /// 也不再出现在枚举和查找结果中。
    pub fn remove_without_unsiting(&self, component: &dyn Component) {
        let Some(site) = component.site() else {
            return;
        };
        if site.container_id() != self.shared.id {
            return;
        }
        self.shared.detach(site.id(), component, false);
    }

    /// 站点存储当前容量
    pub fn capacity(&self) -> usize {
        self.shared.state.read().sites.capacity()
    }

    /// 所有活动站点的快照，按注册顺序排列
    pub fn sites(&self) -> Vec<SiteInfo> {
        self.shared
            .state
            .read()
            .sites
            .iter()
            .map(|record| SiteInfo {
                id: record.site.id(),
                name: record.site.name(),
                type_name: record.capabilities.type_info().name.clone(),
                attached_at: record.site.attached_at(),
            })
            .collect()
    }

    /// 指定组件实例当前是否在本容器中
    pub fn contains(&self, component: &dyn Component) -> bool {
        self.shared
            .state
            .read()
            .sites
            .iter()
            .any(|record| same_component(record.component.as_ref(), component))
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("id", &self.shared.id)
            .field("len", &self.len())
            .finish()
    }
}

impl ServiceProvider for ServiceContainer {
    fn get_service_by_id(&self, capability: CapabilityId) -> Option<Service> {
        if capability == CapabilityId::of::<dyn ComponentContainer>() {
            return Some(Service::Container(Arc::new(self.clone())));
        }

        let state = self.shared.state.read();
        let found = ContainerShared::find(&state, capability);
        if found.is_none() {
            debug!("容器 {} 中没有满足能力的组件: {}", self.shared.id, capability);
        }
        found
    }
}

impl ComponentContainer for ServiceContainer {
    fn id(&self) -> ContainerId {
        self.shared.id
    }

    fn add_named(
        &self,
        component: Arc<dyn Component>,
        name: Option<&str>,
    ) -> Result<(), ComponentError> {
        loop {
            let previous = component.site();
            if let Some(site) = &previous {
                if site.container_id() == self.shared.id && site.is_active() {
                    return Ok(());
                }
            }

            {
                let state = self.shared.state.read();
                if state
                    .sites
                    .iter()
                    .any(|record| same_component(record.component.as_ref(), component.as_ref()))
                {
                    return Ok(());
                }
                self.shared.check_name(&state, component.as_ref(), name)?;
            }

            // 先从原容器移除，此时不持有本容器的锁
            if let Some(site) = previous.filter(|site| site.container_id() != self.shared.id) {
                match site.container() {
                    Some(container) => container.remove(component.as_ref()),
                    None => {
                        component.site_slot().clear_if(site.id());
                    }
                }
            }

            let mut state = self.shared.state.write();
            if state
                .sites
                .iter()
                .any(|record| same_component(record.component.as_ref(), component.as_ref()))
            {
                return Ok(());
            }
            self.shared.check_name(&state, component.as_ref(), name)?;

            let site = ServiceSite::new(
                Arc::downgrade(&self.shared),
                self.shared.id,
                Arc::downgrade(&component),
                name.map(str::to_owned),
            );
            // 组件槽位被其他容器抢先占用时重新执行迁移
            if !component
                .site_slot()
                .attach_if_vacant(site.clone() as Arc<dyn ComponentSite>)
            {
                drop(state);
                debug!("组件在迁移期间被其他容器放置，重试注册");
                continue;
            }

            reserve_slot(&mut state.sites, self.shared.config.initial_capacity);
            let capabilities = component.capabilities();
            info!(
                "注册组件: {} (名称: {})",
                capabilities.type_info().short_name(),
                name.unwrap_or("<无>")
            );
            state.sites.push(SiteRecord {
                site,
                component,
                capabilities,
            });
            state.invalidate();
            return Ok(());
        }
    }

    fn remove(&self, component: &dyn Component) {
        let Some(site) = component.site() else {
            return;
        };
        if site.container_id() != self.shared.id {
            return;
        }
        self.shared.detach(site.id(), component, true);
    }

    /// 过滤器在不持有容器锁的情况下执行，可以回调容器查找能力
    fn components(&self) -> ComponentCollection {
        let (raw, filter, generation) = {
            let state = self.shared.state.read();
            if let Some(cache) = &state.cache {
                return cache.clone();
            }
            let raw: ComponentCollection = state
                .sites
                .iter()
                .map(|record| record.component.clone())
                .collect();
            let filter = ContainerShared::find(&state, CapabilityId::of::<dyn ContainerFilter>())
                .and_then(|service| service.downcast::<dyn ContainerFilter>());
            (raw, filter, state.generation)
        };

        let result = match filter {
            Some(filter) => filter.filter_components(&raw).unwrap_or(raw),
            None => raw,
        };

        let mut state = self.shared.state.write();
        if state.generation == generation && state.cache.is_none() {
            state.cache = Some(result.clone());
        } else {
            debug!("枚举期间容器 {} 发生变更，结果不写入缓存", self.shared.id);
        }
        result
    }

    fn validate_name(
        &self,
        component: Option<&dyn Component>,
        name: Option<&str>,
    ) -> Result<(), ComponentError> {
        let component = component.ok_or_else(|| ComponentError::invalid_argument("component"))?;
        let state = self.shared.state.read();
        self.shared.check_name(&state, component, name)
    }

    fn len(&self) -> usize {
        self.shared.state.read().sites.len()
    }

    fn dispose(&self) {
        self.shared.teardown();
    }
}
