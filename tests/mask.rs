use pixel_mask::mask::{self, fisheye_pull, fisheye_uv, pixelate_uv, shade, smoothstep, warped_distance};
use pixel_mask::{EffectAdapter, Frame, MaskConfig, MaskGate, MaskUniforms, Resolution, Rgb, Source, Vec2};

const W: usize = 400;
const H: usize = 300;

/// Every pixel distinct enough that a wrong sample shows up.
fn test_frame() -> Frame {
    Frame::from_fn(W, H, |x, y| {
        let r = (x * 7 + y) as u32 & 0xFF;
        let g = (y * 13) as u32 & 0xFF;
        let b = (x + 3 * y) as u32 & 0xFF;
        (r << 16) | (g << 8) | b
    })
}

fn resolution() -> Resolution {
    Resolution::new(W as f32, H as f32)
}

/// Focus on a pixel center so axis-aligned neighbours sit at integer
/// distances.
fn centered_focus() -> Vec2 {
    Vec2::new(200.5, 150.5)
}

fn uniforms(config: MaskConfig, focus: Vec2, hovered: bool) -> MaskUniforms {
    let mut adapter = EffectAdapter::new(config, resolution());
    adapter.set_focus(focus);
    adapter.set_hovered(hovered);
    adapter.uniforms()
}

fn plain_config() -> MaskConfig {
    MaskConfig {
        fisheye_strength: 0.0,
        edge_warp_amplitude: 0.0,
        edge_warp_frequency: 0.0,
        ..MaskConfig::default()
    }
}

fn pixelated_at(u: &MaskUniforms, frame: &Frame, frag: Vec2) -> Rgb {
    let res = resolution();
    frame.sample(pixelate_uv(res.to_uv(frag), u.granularity, res))
}

#[test]
fn smoothstep_hits_its_edges_exactly() {
    for (e0, e1) in [(0.0, 1.0), (105.0, 145.0), (-5.0, 3.0), (90.0, 90.5)] {
        assert_eq!(smoothstep(e0, e1, e0), 0.0);
        assert_eq!(smoothstep(e0, e1, e1), 1.0);
        assert_eq!(smoothstep(e0, e1, e0 - 10.0), 0.0);
        assert_eq!(smoothstep(e0, e1, e1 + 10.0), 1.0);
    }
    assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    assert!((smoothstep(0.0, 1.0, 0.25) - 0.15625).abs() < 1e-6);
}

#[test]
fn smoothstep_with_coincident_edges_is_a_step() {
    assert_eq!(smoothstep(110.0, 110.0, 109.9), 0.0);
    assert_eq!(smoothstep(110.0, 110.0, 110.0), 1.0);
    assert_eq!(smoothstep(110.0, 110.0, 111.0), 1.0);
}

#[test]
fn beyond_the_border_band_is_exactly_pixelated() {
    let frame = test_frame();
    let u = uniforms(MaskConfig::default(), Vec2::new(170.0, 140.0), false);
    let limit = u.outer_edge() + u.border_thickness;
    let mut checked = 0;
    for y in 0..H {
        for x in 0..W {
            let frag = frame.frag_coord(x, y);
            let delta = frag - Vec2::from(u.focus);
            let dist = warped_distance(delta, u.edge_warp_amplitude, u.edge_warp_frequency);
            if dist >= limit {
                assert_eq!(shade(&u, &frame, frag), pixelated_at(&u, &frame, frag), "({x}, {y})");
                checked += 1;
            }
        }
    }
    assert!(checked > W * H / 4);
}

#[test]
fn inside_the_inner_edge_is_the_untouched_source() {
    let frame = test_frame();
    let config = MaskConfig {
        fisheye_strength: 0.0,
        ..MaskConfig::default()
    };
    let u = uniforms(config, centered_focus(), false);
    let mut checked = 0;
    for y in 0..H {
        for x in 0..W {
            let frag = frame.frag_coord(x, y);
            let delta = frag - Vec2::from(u.focus);
            let dist = warped_distance(delta, u.edge_warp_amplitude, u.edge_warp_frequency);
            if dist <= u.inner_edge() {
                assert_eq!(
                    shade(&u, &frame, frag),
                    Rgb::from_packed(frame.get(x, y)),
                    "({x}, {y})"
                );
                checked += 1;
            }
        }
    }
    assert!(checked > 1000);
}

#[test]
fn border_band_sits_just_outside_the_blend() {
    let frame = test_frame();
    let config = MaskConfig {
        border_thickness: 2.0,
        border_color: Rgb::new(0.2, 0.4, 0.6),
        ..MaskConfig::default()
    };
    let u = uniforms(config, centered_focus(), false);
    // Row whose fragment y equals the focus y.
    let y = H - 1 - 150;
    assert_eq!(frame.frag_coord(0, y).y, 150.5);

    // Warp is zero along the +x axis, so these distances are exact.
    let at = |d: usize| frame.frag_coord(200 + d, y);
    assert_eq!(shade(&u, &frame, at(146)), Rgb::new(0.2, 0.4, 0.6));
    assert_eq!(shade(&u, &frame, at(147)), pixelated_at(&u, &frame, at(147)));
    assert_eq!(shade(&u, &frame, at(145)), pixelated_at(&u, &frame, at(145)));
}

#[test]
fn transition_band_blends_between_sharp_and_pixelated() {
    let frame = Frame::from_fn(W, H, |x, _| if x % 10 < 5 { 0x00FFFFFF } else { 0 });
    let u = uniforms(plain_config(), centered_focus(), false);
    // At the nominal radius the mix factor is one half.
    let frag = Vec2::new(200.5 + 125.0, 150.5);
    let sharp = frame.sample(resolution().to_uv(frag));
    let pixelated = pixelated_at(&u, &frame, frag);
    assert_ne!(sharp, pixelated);
    let expected = Rgb::mix(sharp, pixelated, 0.5);
    let got = shade(&u, &frame, frag);
    assert!((got.r - expected.r).abs() < 1e-6);
    assert!((got.g - expected.g).abs() < 1e-6);
}

#[test]
fn fisheye_pull_is_strongest_at_the_focus_and_gone_at_the_rim() {
    let radius = 125.0;
    let strength = 0.4;
    assert_eq!(fisheye_pull(0.0, radius, strength), strength);
    assert_eq!(fisheye_pull(radius, radius, strength), 0.0);
    assert_eq!(fisheye_pull(radius + 1.0, radius, strength), 0.0);
    assert_eq!(fisheye_pull(10.0, radius, 0.0), 0.0);

    let mut previous = f32::MAX;
    for d in [0.0, 25.0, 50.0, 75.0, 100.0, 124.0] {
        let pull = fisheye_pull(d, radius, strength);
        assert!(pull < previous);
        previous = pull;
    }

    let focus_uv = Vec2::new(0.5, 0.5);
    let rim_uv = Vec2::new(0.5 + radius / W as f32, 0.5);
    assert_eq!(fisheye_uv(rim_uv, focus_uv, radius, radius, strength), rim_uv);

    // Halfway out, the sample is pulled in by strength * (1 - 0.25).
    let uv = Vec2::new(0.6, 0.5);
    let pulled = fisheye_uv(uv, focus_uv, radius / 2.0, radius, strength);
    let expected = 0.5 + 0.1 * (1.0 - strength * 0.75);
    assert!((pulled.x - expected).abs() < 1e-6);
    assert_eq!(pulled.y, 0.5);
}

#[test]
fn fisheye_magnifies_inside_the_circle() {
    let frame = test_frame();
    let config = MaskConfig {
        fisheye_strength: 0.5,
        edge_warp_amplitude: 0.0,
        ..MaskConfig::default()
    };
    let u = uniforms(config, centered_focus(), false);
    // 40 px right of the focus samples 40 * (1 - 0.5 * (1 - 0.1024)) px out.
    let frag = Vec2::new(240.5, 150.5);
    let pull = fisheye_pull(40.0, 125.0, 0.5);
    let sample = Vec2::new(200.5 + 40.0 * (1.0 - pull), 150.5);
    assert_eq!(shade(&u, &frame, frag), frame.sample(resolution().to_uv(sample)));
    assert_ne!(shade(&u, &frame, frag), frame.sample(resolution().to_uv(frag)));
}

#[test]
fn zero_warp_amplitude_matches_the_unwarped_path() {
    let frame = test_frame();
    let unwarped = uniforms(plain_config(), centered_focus(), false);
    let zero_amplitude = uniforms(
        MaskConfig {
            edge_warp_frequency: 6.0,
            ..plain_config()
        },
        centered_focus(),
        false,
    );
    assert_eq!(mask::apply(&unwarped, &frame), mask::apply(&zero_amplitude, &frame));

    let delta = Vec2::new(30.0, -40.0);
    assert_eq!(warped_distance(delta, 0.0, 6.0), 50.0);
    assert_eq!(warped_distance(delta, 5.0, 0.0), 50.0);
}

#[test]
fn edge_warp_adds_lobes_around_the_focus() {
    let amplitude = 10.0;
    let lobes = 4.0;
    let quarter = std::f32::consts::FRAC_PI_8; // sin(4 * pi/8) = 1
    let out = Vec2::new(45.0 * quarter.cos(), 45.0 * quarter.sin());
    let inward = Vec2::new(45.0 * quarter.cos(), -45.0 * quarter.sin());
    assert!((warped_distance(out, amplitude, lobes) - 55.0).abs() < 1e-3);
    assert!((warped_distance(inward, amplitude, lobes) - 35.0).abs() < 1e-3);
    // The focus itself has no angle.
    assert_eq!(warped_distance(Vec2::ZERO, amplitude, lobes), 0.0);
}

#[test]
fn hovered_gate_shades_like_the_always_gate() {
    let frame = test_frame();
    let focus = resolution().center();
    let canonical = MaskConfig {
        granularity: 10.0,
        circle_radius: 125.0,
        blur_radius: 20.0,
        border_thickness: 0.0,
        ..plain_config()
    };
    let legacy = MaskConfig {
        blur_radius: 20.0,
        border_thickness: 0.0,
        ..canonical.as_legacy()
    };
    assert_eq!(legacy.gate, MaskGate::Hover);

    let a = mask::apply(&uniforms(canonical, focus, false), &frame);
    let b = mask::apply(&uniforms(legacy, focus, true), &frame);
    assert_eq!(a, b);
}

#[test]
fn hovered_legacy_preset_has_a_hard_edge_and_white_rim() {
    let frame = test_frame();
    let u = uniforms(MaskConfig::legacy_hover(), centered_focus(), true);
    assert!(u.active);
    let y = H - 1 - 150;
    let at = |d: usize| frame.frag_coord(200 + d, y);
    let sharp = |d: usize| Rgb::from_packed(frame.get(200 + d, y));

    for d in [0, 60, 124] {
        assert_eq!(shade(&u, &frame, at(d)), sharp(d), "d = {d}");
    }
    assert_ne!(sharp(124), pixelated_at(&u, &frame, at(124)));
    // The step reaches 1 exactly on the radius, so the rim starts after it.
    assert_eq!(shade(&u, &frame, at(125)), pixelated_at(&u, &frame, at(125)));
    assert_eq!(shade(&u, &frame, at(126)), Rgb::WHITE);
    assert_eq!(shade(&u, &frame, at(127)), Rgb::WHITE);
    for d in [128, 129, 180] {
        assert_eq!(shade(&u, &frame, at(d)), pixelated_at(&u, &frame, at(d)), "d = {d}");
    }
}

#[test]
fn legacy_preset_without_hover_pixelates_everything() {
    let frame = test_frame();
    let u = uniforms(MaskConfig::legacy_hover(), centered_focus(), false);
    assert!(!u.active);
    for (x, y) in [(200, 150), (10, 10), (399, 299), (250, 120)] {
        let frag = frame.frag_coord(x, y);
        assert_eq!(shade(&u, &frame, frag), pixelated_at(&u, &frame, frag));
    }
}

#[test]
fn pixelation_snaps_to_the_lower_left_of_each_cell() {
    let res = resolution();
    let uv = |x: f32, y: f32| res.to_uv(Vec2::new(x, y));
    let a = pixelate_uv(uv(20.5, 30.5), 10.0, res);
    let b = pixelate_uv(uv(29.5, 39.5), 10.0, res);
    let c = pixelate_uv(uv(30.5, 30.5), 10.0, res);
    assert_eq!(a, b);
    assert_ne!(a, c);
    // Lands on the center of texel (20, 30).
    assert!((a.x * W as f32 - 20.5).abs() < 1e-3);
    assert!((a.y * H as f32 - 30.5).abs() < 1e-3);
    // Granularity below one pixel is treated as one pixel.
    assert_eq!(pixelate_uv(uv(7.5, 7.5), 0.0, res), pixelate_uv(uv(7.5, 7.5), 1.0, res));
}

#[test]
fn frame_sampling_clamps_to_the_edge() {
    let frame = test_frame();
    assert_eq!(frame.sample(Vec2::new(-0.5, 2.0)), Rgb::from_packed(frame.get(0, 0)));
    assert_eq!(frame.sample(Vec2::new(1.5, -1.0)), Rgb::from_packed(frame.get(W - 1, H - 1)));
}

#[test]
fn negative_inner_edge_still_renders_the_focus_sharp() {
    let frame = test_frame();
    let config = MaskConfig {
        circle_radius: 10.0,
        blur_radius: 30.0,
        ..plain_config()
    };
    let u = uniforms(config, centered_focus(), false);
    assert!(u.inner_edge() < 0.0);
    let frag = frame.frag_coord(200, H - 1 - 150);
    let got = shade(&u, &frame, frag);
    let sharp = Rgb::from_packed(frame.get(200, H - 1 - 150));
    let pixelated = pixelated_at(&u, &frame, frag);
    // Distance 0 is a third into the band: mostly sharp, not pure.
    let k = smoothstep(-20.0, 40.0, 0.0);
    let expected = Rgb::mix(sharp, pixelated, k);
    assert!((got.r - expected.r).abs() < 1e-6);
    assert!((got.b - expected.b).abs() < 1e-6);
}
