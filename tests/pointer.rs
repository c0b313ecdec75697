use pixel_mask::pointer::MOBILE_MAX_WIDTH;
use pixel_mask::{InputMode, MaskProfile, PointerTracker, Vec2, Viewport};

fn phone() -> Viewport {
    Viewport::new(400.0, 800.0, 1.0)
}

fn laptop() -> Viewport {
    Viewport::new(1280.0, 800.0, 2.0)
}

fn tracker(viewport: Viewport) -> PointerTracker {
    PointerTracker::new(viewport, &MaskProfile::default())
}

#[test]
fn mode_follows_the_width_threshold() {
    assert_eq!(InputMode::from_viewport_width(MOBILE_MAX_WIDTH), InputMode::Mobile);
    assert_eq!(InputMode::from_viewport_width(320.0), InputMode::Mobile);
    assert_eq!(InputMode::from_viewport_width(MOBILE_MAX_WIDTH + 1.0), InputMode::Desktop);
}

#[test]
fn fresh_mobile_session_is_centered_in_device_pixels() {
    let t = tracker(Viewport::new(375.0, 667.0, 2.0));
    assert_eq!(t.mode(), InputMode::Mobile);
    assert_eq!(t.focus(), Vec2::new(375.0, 667.0));
    assert!(!t.has_dragged_once());
}

#[test]
fn touch_far_from_the_mask_is_ignored() {
    let mut t = tracker(phone());
    let before = t.focus();
    assert_eq!(before, Vec2::new(200.0, 400.0));

    assert!(!t.on_touch_start(200.0, 600.0)); // 200 px away, radius 110
    assert_eq!(t.focus(), before);
    assert!(!t.is_dragging());

    t.on_touch_move(10.0, 10.0);
    assert_eq!(t.focus(), before);
}

#[test]
fn touch_inside_the_mask_starts_a_drag() {
    let mut t = tracker(phone());
    assert!(t.on_touch_start(230.0, 440.0)); // 50 px away
    assert_eq!(t.focus(), Vec2::new(230.0, 440.0));
    assert!(t.is_dragging());
    assert!(t.has_dragged_once());

    t.on_touch_move(100.0, 120.0);
    assert_eq!(t.focus(), Vec2::new(100.0, 120.0));

    t.on_touch_end();
    assert!(!t.is_dragging());
    // Dropped masks stay put.
    assert_eq!(t.focus(), Vec2::new(100.0, 120.0));
    t.recenter();
    assert_eq!(t.focus(), Vec2::new(100.0, 120.0));
}

#[test]
fn touch_on_the_rim_counts_as_inside() {
    let mut t = tracker(phone());
    assert!(t.on_touch_start(310.0, 400.0));
}

#[test]
fn grab_radius_scales_with_device_pixel_ratio() {
    let mut t = tracker(Viewport::new(400.0, 800.0, 2.0));
    assert_eq!(t.grab_radius(), 220.0);
    // 100 CSS px from the center is 200 device px: inside 220.
    assert!(t.on_touch_start(300.0, 400.0));
    assert_eq!(t.focus(), Vec2::new(600.0, 800.0));
}

#[test]
fn desktop_follows_the_mouse_in_device_pixels() {
    let mut t = tracker(laptop());
    assert_eq!(t.mode(), InputMode::Desktop);
    t.on_pointer_move(100.0, 50.0);
    assert_eq!(t.focus(), Vec2::new(200.0, 100.0));
    assert_eq!(t.grab_radius(), 250.0);
}

#[test]
fn desktop_ignores_touches_and_mobile_ignores_mouse() {
    let mut desktop = tracker(laptop());
    let before = desktop.focus();
    assert!(!desktop.on_touch_start(640.0, 400.0));
    assert_eq!(desktop.focus(), before);

    let mut mobile = tracker(phone());
    mobile.on_pointer_move(10.0, 10.0);
    assert_eq!(mobile.focus(), Vec2::new(200.0, 400.0));
}

#[test]
fn returning_to_mobile_starts_a_fresh_session() {
    let mut t = tracker(phone());
    assert!(t.on_touch_start(200.0, 400.0));
    t.on_touch_move(50.0, 60.0);
    t.on_touch_end();
    assert!(t.has_dragged_once());

    assert_eq!(t.on_resize(Viewport::new(1024.0, 800.0, 1.0)), Some(InputMode::Desktop));
    t.on_pointer_move(900.0, 700.0);
    assert_eq!(t.focus(), Vec2::new(900.0, 700.0));

    assert_eq!(t.on_resize(Viewport::new(500.0, 900.0, 1.0)), Some(InputMode::Mobile));
    assert!(!t.has_dragged_once());
    assert_eq!(t.focus(), Vec2::new(250.0, 450.0));
}

#[test]
fn resize_within_mobile_keeps_a_dropped_mask() {
    let mut t = tracker(phone());
    assert!(t.on_touch_start(210.0, 410.0));
    t.on_touch_end();
    assert_eq!(t.on_resize(Viewport::new(390.0, 700.0, 1.0)), None);
    assert_eq!(t.focus(), Vec2::new(210.0, 410.0));
}

#[test]
fn resize_within_mobile_recenters_an_untouched_mask() {
    let mut t = tracker(phone());
    assert_eq!(t.on_resize(Viewport::new(360.0, 640.0, 3.0)), None);
    assert_eq!(t.focus(), Vec2::new(540.0, 960.0));
}

#[test]
fn leaving_mobile_mid_drag_ends_the_drag() {
    let mut t = tracker(phone());
    assert!(t.on_touch_start(200.0, 400.0));
    t.on_resize(Viewport::new(1200.0, 800.0, 1.0));
    assert!(!t.is_dragging());
    t.on_touch_move(5.0, 5.0);
    assert_ne!(t.focus(), Vec2::new(5.0, 5.0));
}

#[test]
fn shader_focus_is_bottom_up() {
    let mut t = tracker(laptop());
    t.on_pointer_move(100.0, 50.0);
    // Surface is 2560 x 1600.
    assert_eq!(t.shader_focus(), Vec2::new(200.0, 1500.0));
}
