use component_macros::Component;
use di_abstractions::{Component, SiteSlot};

trait Clock: Send + Sync {}

#[derive(Debug, Component)]
#[component(provides(dyn Clock), inheritance = "inherited")]
struct SystemClock {
    site: SiteSlot,
}

impl Clock for SystemClock {}

fn main() {
    let clock = SystemClock {
        site: SiteSlot::new(),
    };
    assert!(clock.site().is_none());
    assert_eq!(
        clock.inheritance_level(),
        infrastructure_common::InheritanceLevel::Inherited
    );
}
