use std::rc::Rc;

use api::{MapSettings, Property};
use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;
use store::LatLng;

use super::markers::{PropertyMarker, TemporaryMarker};
use super::projection::{Viewport, TILE_SIZE};
use crate::icons::{FaMinus, FaPlus};
use crate::modals::{CreatePropertyModal, DeletePropertyModal, EditPropertyModal};
use crate::query::use_properties;
use crate::Icon;

/// Movement below this many pixels is a click, not a drag.
const DRAG_THRESHOLD: f64 = 3.0;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start_x: f64,
    start_y: f64,
    start: Viewport,
    moved: bool,
}

/// Which dialog is open. Only one at a time.
#[derive(Debug, Clone, PartialEq)]
enum Dialog {
    Create(LatLng),
    Edit(Property),
    Delete(Property),
}

fn is_drag(dx: f64, dy: f64) -> bool {
    dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Wheel up zooms in by one level, wheel down zooms out.
fn wheel_zoom(zoom: u8, delta_y: f64) -> u8 {
    if delta_y < 0.0 {
        zoom.saturating_add(1)
    } else if delta_y > 0.0 {
        zoom.saturating_sub(1)
    } else {
        zoom
    }
}

/// Zoom one level around the container center.
fn zoom_step(mut viewport: Signal<Viewport>, zoom_in: bool) {
    let current = viewport();
    let target = if zoom_in {
        current.zoom.saturating_add(1)
    } else {
        current.zoom.saturating_sub(1)
    };
    viewport.set(current.zoom_at(target, current.width / 2.0, current.height / 2.0));
}

/// Container offset of every property. Off-screen ones are clipped by the container.
fn marker_positions(viewport: &Viewport, properties: &[Property]) -> Vec<(Property, f64, f64)> {
    properties
        .iter()
        .map(|p| {
            let (x, y) = viewport.to_screen(p.position());
            (p.clone(), x, y)
        })
        .collect()
}

/// Pointer position relative to the container's top-left corner.
fn container_offset(origin: (f64, f64), client_x: f64, client_y: f64) -> (f64, f64) {
    (client_x - origin.0, client_y - origin.1)
}

/// Map of the signed-in user's properties. Click to create, hover a marker to
/// edit or delete.
#[component]
pub fn ClickableMap(settings: MapSettings) -> Element {
    let mut viewport = use_signal(|| {
        Viewport::new(settings.center, settings.zoom, FALLBACK_SIZE.0, FALLBACK_SIZE.1)
    });
    let mut drag = use_signal(|| None::<Drag>);
    let mut dialog = use_signal(|| None::<Dialog>);
    let mut container = use_signal(|| None::<Rc<MountedData>>);
    // Client position of the container's top-left corner.
    let mut origin = use_signal(|| (0.0, 0.0));
    let properties = use_properties();

    let measure = move || async move {
        let Some(mounted) = container() else { return };
        if let Ok(rect) = mounted.get_client_rect().await {
            origin.set((rect.origin.x, rect.origin.y));
            let current = viewport();
            viewport.set(current.resize(rect.size.width, rect.size.height));
        }
    };

    let view = viewport();
    let tiles = view.tiles();
    let markers = marker_positions(&view, &properties.read());
    let pending = match dialog() {
        Some(Dialog::Create(position)) => Some(view.to_screen(position)),
        _ => None,
    };
    let container_class = if drag().is_some_and(|d| d.moved) {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            class: "{container_class}",

            onmounted: move |evt: Event<MountedData>| async move {
                container.set(Some(evt.data()));
                measure().await;
            },

            // Layout around the map may have shifted since mount.
            onmouseenter: move |_| async move { measure().await },

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                let current = viewport();
                let target = wheel_zoom(current.zoom, wheel_delta_y(evt.data().delta()));
                // Client-based so the anchor holds when the wheel turns over a marker.
                let client = evt.data().client_coordinates();
                let (x, y) = container_offset(origin(), client.x, client.y);
                viewport.set(current.zoom_at(target, x, y));
            },

            onmousedown: move |evt: Event<MouseData>| {
                // Only track drag/click for left mouse button
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                let client = evt.client_coordinates();
                drag.set(Some(Drag {
                    start_x: client.x,
                    start_y: client.y,
                    start: viewport(),
                    moved: false,
                }));
            },

            onmousemove: move |evt: Event<MouseData>| {
                let Some(mut current) = drag() else { return };
                let client = evt.client_coordinates();
                let dx = client.x - current.start_x;
                let dy = client.y - current.start_y;
                if !current.moved && is_drag(dx, dy) {
                    current.moved = true;
                    drag.set(Some(current));
                }
                if current.moved {
                    viewport.set(current.start.pan(dx, dy));
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let Some(finished) = drag.take() else { return };
                // A mouseup without drag movement = a click
                if !finished.moved {
                    let client = evt.client_coordinates();
                    let (x, y) = container_offset(origin(), client.x, client.y);
                    let position = viewport().to_lat_lng(x, y);
                    dialog.set(Some(Dialog::Create(position)));
                }
            },

            onmouseleave: move |_| drag.set(None),

            div {
                class: "map-tiles",
                for tile in tiles {
                    img {
                        key: "{tile.z}-{tile.x}-{tile.y}-{tile.left}",
                        class: "map-tile",
                        src: settings.tile(tile.z, tile.x, tile.y),
                        width: "{TILE_SIZE}",
                        height: "{TILE_SIZE}",
                        style: "left: {tile.left}px; top: {tile.top}px;",
                        draggable: "false",
                        alt: "",
                    }
                }
            }

            for (property, x, y) in markers {
                PropertyMarker {
                    key: "{property.id}",
                    property: property.clone(),
                    left: x,
                    top: y,
                    on_edit: move |p| dialog.set(Some(Dialog::Edit(p))),
                    on_delete: move |p| dialog.set(Some(Dialog::Delete(p))),
                }
            }

            if let Some((x, y)) = pending {
                TemporaryMarker { left: x, top: y }
            }

            div {
                class: "map-zoom",
                onmousedown: move |evt: Event<MouseData>| evt.stop_propagation(),
                onmouseup: move |evt: Event<MouseData>| evt.stop_propagation(),
                button {
                    class: "map-zoom-button",
                    title: "Zoom in",
                    onclick: move |_| zoom_step(viewport, true),
                    Icon { icon: FaPlus, width: 12, height: 12 }
                }
                button {
                    class: "map-zoom-button",
                    title: "Zoom out",
                    onclick: move |_| zoom_step(viewport, false),
                    Icon { icon: FaMinus, width: 12, height: 12 }
                }
            }
        }

        match dialog() {
            Some(Dialog::Create(position)) => rsx! {
                CreatePropertyModal { position, on_close: move |_| dialog.set(None) }
            },
            Some(Dialog::Edit(property)) => rsx! {
                EditPropertyModal { property, on_close: move |_| dialog.set(None) }
            },
            Some(Dialog::Delete(property)) => rsx! {
                DeletePropertyModal { property, on_close: move |_| dialog.set(None) }
            },
            None => rsx! {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_threshold() {
        assert!(!is_drag(0.0, 0.0));
        assert!(!is_drag(3.0, -3.0));
        assert!(is_drag(3.5, 0.0));
        assert!(is_drag(0.0, -4.0));
    }

    #[test]
    fn test_wheel_delta_units() {
        assert_eq!(wheel_delta_y(WheelDelta::pixels(0.0, -12.0, 0.0)), -12.0);
        assert_eq!(wheel_delta_y(WheelDelta::lines(0.0, 2.0, 0.0)), 80.0);
        assert_eq!(wheel_delta_y(WheelDelta::pages(0.0, 1.0, 0.0)), 400.0);
    }

    #[test]
    fn test_wheel_zoom_direction() {
        assert_eq!(wheel_zoom(12, -100.0), 13);
        assert_eq!(wheel_zoom(12, 100.0), 11);
        assert_eq!(wheel_zoom(12, 0.0), 12);
    }

    fn property(id: &str, lat: f64, lng: f64) -> Property {
        Property {
            id: id.into(),
            user_id: "user-1".into(),
            latitude: lat,
            longitude: lng,
            price: 500000.0,
            image_url: "https://example.com/a.jpg".into(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_every_property_gets_a_marker() {
        let viewport = Viewport::new(LatLng::new(-6.2088, 106.8456), 12, 800.0, 600.0);
        let properties = vec![
            property("near", -6.2088, 106.8456),
            // Several hundred pixels below the visible area.
            property("far", -6.5088, 106.8456),
        ];

        let markers = marker_positions(&viewport, &properties);

        assert_eq!(markers.len(), 2);
        let (_, x, y) = &markers[0];
        assert!((x - 400.0).abs() < 1e-6 && (y - 300.0).abs() < 1e-6);
        let (far, _, y) = &markers[1];
        assert_eq!(far.id, "far");
        assert!(*y > 600.0 + 200.0);
    }

    #[test]
    fn test_container_offset() {
        assert_eq!(container_offset((120.0, 80.0), 520.0, 380.0), (400.0, 300.0));
        assert_eq!(container_offset((0.0, 0.0), 15.0, 25.0), (15.0, 25.0));
    }
}
