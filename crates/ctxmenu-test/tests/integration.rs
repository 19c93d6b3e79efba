//! Behavioral tests for installed context menus, driven by selector.

use ctxmenu_test::Harness;
use ctxmenu_widgets::{MenuItemSpec, WidgetConfig};
use proptest::prelude::*;

fn copy_more() -> WidgetConfig {
    WidgetConfig::new()
        .item(MenuItemSpec::leaf("Copy").icon("fa fa-copy"))
        .item(MenuItemSpec::submenu(
            "More",
            vec![
                MenuItemSpec::leaf("Rename"),
                MenuItemSpec::submenu("Share", vec![MenuItemSpec::leaf("Email")]),
            ],
        ))
}

fn page() -> Harness {
    let mut h = Harness::new();
    let list = h.add("ul", &["files"]);
    for _ in 0..3 {
        h.add_to(list, "li", &["file"]);
    }
    h.add("footer", &["status"]);
    h.install(".file", &copy_more());
    h
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_leaf_selection_closes_and_reports() {
    let mut h = page();
    h.right_click(".file", 300.0, 200.0);
    h.click_text("Copy");
    h.assert_closed().assert_selected(&["Copy"]);

    let selections = h.selections();
    assert_eq!(selections[0].item.icon_class(), Some("fa fa-copy"));
    assert_eq!(selections[0].context_target, h.query(".file"));
}

#[test]
fn test_deep_leaf_selection() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.click_text("More").click_text("Share");
    h.assert_open().assert_selected(&[]);
    h.click_text("Email");
    h.assert_closed().assert_selected(&["Email"]);
    assert_eq!(h.selections()[0].path, vec![1, 1, 0]);
}

#[test]
fn test_outside_click_dismisses() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.click(".status");
    h.assert_closed().assert_selected(&[]);
}

#[test]
fn test_click_on_icon_selects_item() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.click("i.fa-copy");
    h.assert_selected(&["Copy"]);
}

#[test]
fn test_click_on_menu_padding_dismisses() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.click("body > menu.menu");
    h.assert_closed().assert_selected(&[]);
}

// =============================================================================
// Opening + Position
// =============================================================================

#[test]
fn test_right_click_prevents_native_menu() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.assert_open().assert_default_prevented();
}

#[test]
fn test_right_click_on_other_element_ignored() {
    let mut h = page();
    h.right_click(".status", 10.0, 10.0);
    h.assert_closed();
    assert!(!h.last_outcome().expect("dispatched").default_prevented);
}

#[test]
fn test_client_coordinates_with_scroll() {
    let mut h = page();
    h.scroll_to(0.0, 400.0);
    let mut h = h.viewport(1280.0, 2000.0);
    h.right_click_client(".file", 100.0, 100.0);
    let menu = h.menu(0).expect("installed");
    assert_eq!(menu.position().map(|p| (p.x, p.y)), Some((100.0, 500.0)));
}

#[test]
fn test_resize_closes() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.resize(600.0, 400.0);
    h.assert_closed();
}

// =============================================================================
// Long press
// =============================================================================

#[test]
fn test_long_press_threshold() {
    let mut h = page();
    h.touch_hold(".file", 30.0, 30.0, 300);
    h.assert_closed();
    h.touch_hold(".file", 30.0, 30.0, 499);
    h.assert_closed();
    h.touch_hold(".file", 30.0, 30.0, 501);
    h.assert_open().assert_within_viewport();
}

#[test]
fn test_touch_start_closes_open_menu() {
    let mut h = page();
    h.right_click(".file", 10.0, 10.0);
    h.touch_start(".file", 10.0, 10.0);
    h.assert_closed().assert_default_prevented();
    h.tick(500);
    h.assert_open();
}

#[test]
fn test_long_press_then_select() {
    let mut h = page();
    h.touch_start(".file", 5.0, 5.0).tick(600).touch_end(".file");
    h.click_text("Rename");
    h.assert_closed().assert_selected(&["Rename"]);
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_disposed_menu_ignores_events() {
    let mut h = page();
    h.dispose(0);
    h.right_click(".file", 10.0, 10.0).touch_hold(".file", 1.0, 1.0, 1000);
    h.assert_closed();
    // Rendered subtree stays.
    h.assert_count("menu.menu", 3);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_open_menu_within_viewport(
        x in 0.0f32..1280.0,
        y in 0.0f32..720.0,
        w in 320.0f32..1920.0,
        hgt in 240.0f32..1080.0,
    ) {
        let mut h = page().viewport(w, hgt);
        h.right_click(".file", x.min(w), y.min(hgt));
        h.assert_open().assert_within_viewport();
    }

    #[test]
    fn prop_hold_opens_iff_threshold(ms in 0u32..1000) {
        let mut h = page();
        h.touch_hold(".file", 10.0, 10.0, ms);
        prop_assert_eq!(h.is_open(), ms >= 500);
    }
}
