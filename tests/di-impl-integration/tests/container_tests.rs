//! di-impl 容器集成测试

use di_abstractions::{
    same_component, Component, ComponentContainer, ServiceProviderExt, SiteSlot,
};
use di_impl::ServiceContainer;
use infrastructure_common::{Capabilities, ComponentError};
use parking_lot::Mutex;
use std::sync::Arc;

trait Storage: Send + Sync {
    fn label(&self) -> &str;
}

#[derive(Debug, Default)]
struct Foo {
    site: SiteSlot,
}

impl Component for Foo {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of::<Self>()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }
}

#[derive(Debug, Default)]
struct Bar {
    site: SiteSlot,
}

impl Component for Bar {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of::<Self>()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }
}

#[derive(Debug)]
struct DiskStorage {
    site: SiteSlot,
    label: String,
}

impl DiskStorage {
    fn new(label: &str) -> Self {
        Self {
            site: SiteSlot::new(),
            label: label.to_string(),
        }
    }
}

impl Storage for DiskStorage {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Component for DiskStorage {
    fn capabilities(&self) -> Capabilities {
        Capabilities::builder::<Self>()
            .provide::<dyn Storage>(|this| this)
            .build()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }
}

#[derive(Debug)]
struct Tracked {
    site: SiteSlot,
    label: &'static str,
    released: Arc<Mutex<Vec<&'static str>>>,
}

impl Component for Tracked {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of::<Self>()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }

    fn release(&self) {
        self.released.lock().push(self.label);
    }
}

#[test]
fn test_registration_scenario() {
    let container = ServiceContainer::new();
    let a = Arc::new(Foo::default());
    let b = Arc::new(Bar::default());

    container.add(a.clone()).unwrap();
    container.add_named(b.clone(), Some("bar")).unwrap();

    let components = container.components();
    assert_eq!(components.len(), 2);
    assert!(same_component(components.get(0).unwrap().as_ref(), a.as_ref()));
    assert!(same_component(components.get(1).unwrap().as_ref(), b.as_ref()));

    let resolved = container.get_service::<Bar>().unwrap();
    assert!(Arc::ptr_eq(&resolved, &b));

    container.remove(a.as_ref());
    let components = container.components();
    assert_eq!(components.len(), 1);
    assert!(components.contains(b.as_ref()));
    assert!(container.get_service::<Foo>().is_none());
}

#[test]
fn test_count_tracks_adds_and_removes() {
    let container = ServiceContainer::new();
    let items: Vec<Arc<Foo>> = (0..5).map(|_| Arc::new(Foo::default())).collect();

    for item in &items {
        container.add(item.clone()).unwrap();
    }
    assert_eq!(container.len(), 5);

    container.remove(items[1].as_ref());
    container.remove(items[3].as_ref());
    // 已移除的组件再次移除不影响计数
    container.remove(items[3].as_ref());
    assert_eq!(container.len(), 3);

    container.add(items[1].clone()).unwrap();
    assert_eq!(container.len(), 4);
}

#[test]
fn test_double_add_is_noop() {
    let container = ServiceContainer::new();
    let foo = Arc::new(Foo::default());

    container.add_named(foo.clone(), Some("foo")).unwrap();
    let first_site = foo.site().unwrap().id();
    container.add_named(foo.clone(), Some("other")).unwrap();

    assert_eq!(container.len(), 1);
    let site = foo.site().unwrap();
    assert_eq!(site.id(), first_site);
    assert_eq!(site.name().as_deref(), Some("foo"));
}

#[test]
fn test_add_to_second_container_moves_component() {
    let first = ServiceContainer::new();
    let second = ServiceContainer::new();
    let foo = Arc::new(Foo::default());

    first.add(foo.clone()).unwrap();
    second.add(foo.clone()).unwrap();

    assert_eq!(first.len(), 0);
    assert_eq!(second.len(), 1);
    assert!(first.get_service::<Foo>().is_none());
    assert_eq!(foo.site().unwrap().container_id(), second.id());
}

#[test]
fn test_interface_resolution_does_not_match_other_types() {
    let container = ServiceContainer::new();
    container.add(Arc::new(DiskStorage::new("disk"))).unwrap();

    let storage = container.require_service::<dyn Storage>().unwrap();
    assert_eq!(storage.label(), "disk");
    assert!(container.get_service::<DiskStorage>().is_some());
    assert!(container.get_service::<Foo>().is_none());
}

#[test]
fn test_empty_container_resolves_nothing() {
    let container = ServiceContainer::new();

    assert!(container.get_service::<Foo>().is_none());
    assert!(!container.can_resolve::<dyn Storage>());

    let error = container.require_service::<dyn Storage>().err().unwrap();
    assert!(error.to_string().contains("Storage"));
}

#[test]
fn test_components_reflect_removal_immediately() {
    let container = ServiceContainer::new();
    let a = Arc::new(Foo::default());
    let b = Arc::new(Foo::default());
    container.add(a.clone()).unwrap();
    container.add(b.clone()).unwrap();

    let before = container.components();
    container.remove(b.as_ref());
    let after = container.components();

    assert_eq!(before.len(), 2);
    assert_eq!(after.len(), 1);
    assert!(!after.contains(b.as_ref()));
}

#[test]
fn test_rename_to_taken_name_is_rejected() {
    let container = ServiceContainer::new();
    let foo = Arc::new(Foo::default());
    let bar = Arc::new(Bar::default());
    container.add_named(foo.clone(), Some("primary")).unwrap();
    container.add_named(bar.clone(), Some("secondary")).unwrap();

    let site = bar.site().unwrap();
    let result = site.set_name(Some("PRIMARY"));

    assert!(matches!(result, Err(ComponentError::DuplicateName { .. })));
    assert_eq!(site.name().as_deref(), Some("secondary"));

    site.set_name(Some("tertiary")).unwrap();
    assert_eq!(site.name().as_deref(), Some("tertiary"));
}

#[test]
fn test_teardown_releases_once_in_reverse_order() {
    let released = Arc::new(Mutex::new(Vec::new()));
    let container = ServiceContainer::new();
    let components: Vec<Arc<Tracked>> = ["first", "second", "third"]
        .into_iter()
        .map(|label| {
            Arc::new(Tracked {
                site: SiteSlot::new(),
                label,
                released: released.clone(),
            })
        })
        .collect();
    for component in &components {
        container.add(component.clone()).unwrap();
    }

    container.dispose();
    container.dispose();

    assert_eq!(*released.lock(), vec!["third", "second", "first"]);
    assert!(container.is_empty());
    assert!(components.iter().all(|c| c.site().is_none()));
}

#[test]
fn test_dropping_last_handle_releases_components() {
    let released = Arc::new(Mutex::new(Vec::new()));
    let tracked = Arc::new(Tracked {
        site: SiteSlot::new(),
        label: "only",
        released: released.clone(),
    });

    {
        let container = ServiceContainer::new();
        container.add(tracked.clone()).unwrap();
    }

    assert_eq!(*released.lock(), vec!["only"]);
    assert!(tracked.site().is_none());
}
