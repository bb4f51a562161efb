//! di-impl 容器并发行为测试

use di_abstractions::{
    Component, ComponentCollection, ComponentContainer, ContainerFilter, ServiceProviderExt,
    SiteSlot,
};
use di_impl::ServiceContainer;
use infrastructure_common::Capabilities;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[derive(Debug, Default)]
struct Worker {
    site: SiteSlot,
}

impl Component for Worker {
    fn capabilities(&self) -> Capabilities {
        Capabilities::of::<Self>()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }
}

/// 过滤时通过自己的站点查找 [`Worker`]
#[derive(Debug, Default)]
struct LookupFilter {
    site: SiteSlot,
    hits: AtomicUsize,
}

impl ContainerFilter for LookupFilter {
    fn filter_components(&self, _components: &ComponentCollection) -> Option<ComponentCollection> {
        let found = self
            .site
            .get()
            .and_then(|site| site.get_service::<Worker>())
            .is_some();
        if found {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        None
    }
}

impl Component for LookupFilter {
    fn capabilities(&self) -> Capabilities {
        Capabilities::builder::<Self>()
            .provide::<dyn ContainerFilter>(|this| this)
            .build()
    }

    fn site_slot(&self) -> &SiteSlot {
        &self.site
    }
}

#[test]
fn test_filter_can_resolve_through_its_site() {
    let container = ServiceContainer::new();
    let filter = Arc::new(LookupFilter::default());
    container.add(Arc::new(Worker::default())).unwrap();
    container.add(filter.clone()).unwrap();

    let (tx, rx) = mpsc::channel();
    let worker_container = container.clone();
    thread::spawn(move || {
        let listed = worker_container.components();
        let _ = tx.send(listed.len());
    });

    let listed = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("components() 在过滤器回调容器时没有返回");
    assert_eq!(listed, 2);
    assert_eq!(filter.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_moves_leave_one_active_site() {
    for _ in 0..500 {
        let origin = ServiceContainer::new();
        let left = ServiceContainer::new();
        let right = ServiceContainer::new();
        let component = Arc::new(Worker::default());
        origin.add(component.clone()).unwrap();

        let barrier = Barrier::new(2);
        thread::scope(|scope| {
            for target in [&left, &right] {
                let barrier = &barrier;
                let component = component.clone();
                scope.spawn(move || {
                    barrier.wait();
                    target.add(component).unwrap();
                });
            }
        });

        assert_eq!(origin.len(), 0);
        assert_eq!(left.len() + right.len(), 1);

        let site = component.site().unwrap();
        assert!(site.is_active());
        let holder = if left.len() == 1 { &left } else { &right };
        assert_eq!(site.container_id(), holder.id());
        assert!(holder.contains(component.as_ref()));
    }
}

#[test]
fn test_concurrent_renames_to_same_name_admit_one() {
    for _ in 0..500 {
        let container = ServiceContainer::new();
        let first = Arc::new(Worker::default());
        let second = Arc::new(Worker::default());
        container.add_named(first.clone(), Some("first")).unwrap();
        container.add_named(second.clone(), Some("second")).unwrap();

        let barrier = Barrier::new(2);
        let accepted = AtomicUsize::new(0);
        thread::scope(|scope| {
            for component in [&first, &second] {
                let barrier = &barrier;
                let accepted = &accepted;
                scope.spawn(move || {
                    let site = component.site().unwrap();
                    barrier.wait();
                    if site.set_name(Some("shared")).is_ok() {
                        accepted.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(accepted.load(Ordering::SeqCst), 1);
        let shared = container
            .sites()
            .into_iter()
            .filter(|site| site.name.as_deref() == Some("shared"))
            .count();
        assert_eq!(shared, 1);
    }
}

#[test]
fn test_concurrent_adds_keep_count_consistent() {
    let container = ServiceContainer::new();
    let components: Vec<Arc<Worker>> = (0..64).map(|_| Arc::new(Worker::default())).collect();

    thread::scope(|scope| {
        for chunk in components.chunks(16) {
            let container = &container;
            scope.spawn(move || {
                for component in chunk {
                    container.add(component.clone()).unwrap();
                    // 重复注册是空操作
                    container.add(component.clone()).unwrap();
                }
            });
        }
    });

    assert_eq!(container.len(), 64);
    assert_eq!(container.components().len(), 64);
}
