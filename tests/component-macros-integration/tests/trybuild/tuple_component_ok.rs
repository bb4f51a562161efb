use component_macros::Component;
use di_abstractions::{Component, SiteSlot};

#[derive(Debug, Component)]
struct Marker(u32, #[site] SiteSlot);

fn main() {
    let marker = Marker(7, SiteSlot::new());
    assert_eq!(marker.0, 7);
    assert!(marker.capabilities().ids().len() == 1);
}
