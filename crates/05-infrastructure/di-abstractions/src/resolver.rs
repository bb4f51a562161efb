//! 能力解析接口
//!
//! 容器和站点都是 [`ServiceProvider`]：按能力标识返回第一个满足该能力的服务。

use crate::component::{Component, IntoAnyInstance};
use crate::container::ComponentContainer;
use crate::site::ComponentSite;
use infrastructure_common::{BoxedCapability, Capabilities, CapabilityId, DependencyError};
use std::fmt;
use std::sync::Arc;

/// 服务提供者 trait
pub trait ServiceProvider: Send + Sync {
    /// 按能力标识解析服务；未找到时返回 `None`，这不是错误
    fn get_service_by_id(&self, capability: CapabilityId) -> Option<Service>;
}

/// 强类型解析的便捷方法，对所有 [`ServiceProvider`]（包括 trait 对象）可用
pub trait ServiceProviderExt: ServiceProvider {
    /// 解析指定能力
    fn get_service<I: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<I>> {
        self.get_service_by_id(CapabilityId::of::<I>())
            .and_then(|service| service.downcast::<I>())
    }

    /// 解析必需的能力，缺失时返回 [`DependencyError::ComponentNotFound`]
    fn require_service<I: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<I>, DependencyError> {
        self.get_service::<I>()
            .ok_or_else(|| DependencyError::not_found(std::any::type_name::<I>()))
    }

    /// 是否能解析指定能力
    fn can_resolve<I: ?Sized + 'static>(&self) -> bool {
        self.get_service_by_id(CapabilityId::of::<I>()).is_some()
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}

/// 解析结果
#[derive(Clone)]
pub enum Service {
    /// 容器自身（请求 `dyn ComponentContainer` 时返回）
    Container(Arc<dyn ComponentContainer>),
    /// 站点自身（向站点请求 `dyn ComponentSite` 时返回）
    Site(Arc<dyn ComponentSite>),
    /// 已注册的组件
    Component(ResolvedComponent),
}

impl Service {
    /// 转换为指定能力的强类型 `Arc`
    pub fn downcast<I: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<I>> {
        match self {
            Self::Container(container) => downcast_boxed(Box::new(container.clone())),
            Self::Site(site) => downcast_boxed(Box::new(site.clone())),
            Self::Component(resolved) => resolved.downcast::<I>(),
        }
    }

    /// 组件结果
    pub fn as_component(&self) -> Option<&Arc<dyn Component>> {
        match self {
            Self::Component(resolved) => Some(resolved.component()),
            _ => None,
        }
    }

    /// 是否为容器自身
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    /// 是否为站点自身
    pub fn is_site(&self) -> bool {
        matches!(self, Self::Site(_))
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container(container) => write!(f, "Service::Container({})", container.id()),
            Self::Site(site) => write!(f, "Service::Site({})", site.id()),
            Self::Component(resolved) => f
                .debug_tuple("Service::Component")
                .field(resolved.component())
                .finish(),
        }
    }
}

fn downcast_boxed<I: ?Sized + Send + Sync + 'static>(boxed: BoxedCapability) -> Option<Arc<I>> {
    boxed.downcast::<Arc<I>>().ok().map(|arc| *arc)
}

/// 解析到的组件及其能力描述符
#[derive(Clone)]
pub struct ResolvedComponent {
    component: Arc<dyn Component>,
    capabilities: Capabilities,
    capability: CapabilityId,
}

impl ResolvedComponent {
    /// 创建解析结果
    pub fn new(
        component: Arc<dyn Component>,
        capabilities: Capabilities,
        capability: CapabilityId,
    ) -> Self {
        Self {
            component,
            capabilities,
            capability,
        }
    }

    /// 组件实例
    pub fn component(&self) -> &Arc<dyn Component> {
        &self.component
    }

    /// 本次请求的能力
    pub fn capability(&self) -> CapabilityId {
        self.capability
    }

    /// 组件的能力描述符
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// 转换为组件满足的任一能力
    pub fn downcast<I: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<I>> {
        self.capabilities
            .cast::<I>(self.component.clone().into_any_instance())
    }
}
