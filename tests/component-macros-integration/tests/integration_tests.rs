//! component-macros 派生宏集成测试

use component_macros::Component;
use di_abstractions::{Component, ComponentContainer, ServiceProviderExt, SiteSlot};
use di_impl::ServiceContainer;
use infrastructure_common::{CapabilityId, InheritanceLevel};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

pub trait Labelled: Send + Sync {
    fn label(&self) -> String;
}

#[derive(Debug, Default, Component)]
#[component(provides(dyn Clock, dyn Labelled))]
pub struct FixedClock {
    site: SiteSlot,
    value: u64,
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.value
    }
}

impl Labelled for FixedClock {
    fn label(&self) -> String {
        format!("fixed@{}", self.value)
    }
}

#[derive(Debug, Default, Component)]
#[component(inheritance = "inherited_read_only", release = "shutdown")]
pub struct BaseService {
    #[site]
    slot: SiteSlot,
    releases: AtomicUsize,
}

impl BaseService {
    fn shutdown(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default, Component)]
pub struct Bare {
    site: SiteSlot,
}

#[test]
fn test_derived_capabilities_list_provided_interfaces() {
    let clock = FixedClock::default();
    let capabilities = clock.capabilities();

    assert!(capabilities.matches_exact(CapabilityId::of::<FixedClock>()));
    assert!(capabilities.provides(CapabilityId::of::<dyn Clock>()));
    assert!(capabilities.provides(CapabilityId::of::<dyn Labelled>()));
    assert_eq!(capabilities.ids().len(), 3);
}

#[test]
fn test_derived_component_resolves_through_container() {
    let container = ServiceContainer::new();
    let clock = Arc::new(FixedClock {
        site: SiteSlot::new(),
        value: 42,
    });

    container.add_named(clock.clone(), Some("clock")).unwrap();

    assert_eq!(container.require_service::<dyn Clock>().unwrap().now(), 42);
    assert_eq!(
        container.require_service::<dyn Labelled>().unwrap().label(),
        "fixed@42"
    );
    assert!(container.get_service::<FixedClock>().is_some());
    assert_eq!(clock.site().unwrap().name().as_deref(), Some("clock"));
}

#[test]
fn test_marked_site_field_receives_site() {
    let container = ServiceContainer::new();
    let service = Arc::new(BaseService::default());

    container.add(service.clone()).unwrap();

    assert!(service.slot.is_sited());
    container.remove(service.as_ref());
    assert!(!service.slot.is_sited());
}

#[test]
fn test_inheritance_defaults_and_overrides() {
    assert_eq!(
        BaseService::default().inheritance_level(),
        InheritanceLevel::InheritedReadOnly
    );
    assert_eq!(
        Bare::default().inheritance_level(),
        InheritanceLevel::NotInherited
    );
}

#[test]
fn test_release_method_runs_on_dispose() {
    let container = ServiceContainer::new();
    let service = Arc::new(BaseService::default());
    container.add(service.clone()).unwrap();

    container.dispose();
    container.dispose();

    assert_eq!(service.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_bare_component_only_matches_exact_type() {
    let container = ServiceContainer::new();
    container.add(Arc::new(Bare::default())).unwrap();

    assert!(container.can_resolve::<Bare>());
    assert!(!container.can_resolve::<dyn Clock>());
}
