//! Whole-frame scenarios across physics, registry, audio, interaction and spawning.

use glam::{Vec2, Vec3};
use propscape_assets::PropDescriptor;
use propscape_audio::RecordingSink;
use propscape_common::{Category, EntityDescriptor, FocusOverlay, Shape, Transform};
use propscape_input::{Camera, PointerState};
use propscape_interaction::{FocusTarget, InteractionState, RecordingSurface, SurfaceCall};
use propscape_render::HeadlessScene;
use propscape_runtime::{SceneConfig, SceneRuntime};

const DT: f64 = 1.0 / 60.0;

type Runtime = SceneRuntime<HeadlessScene, RecordingSink, RecordingSurface>;

fn runtime(config: SceneConfig) -> Runtime {
    SceneRuntime::new(
        config,
        HeadlessScene::new(),
        RecordingSink::new(),
        RecordingSurface::new(),
    )
    .unwrap()
}

fn quiet_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.spawner.enabled = false;
    config
}

/// A pickable prop sitting on the floor at the origin, with the camera aimed
/// at its center so the center pointer hits it.
fn config_with_prop(prop: PropDescriptor) -> SceneConfig {
    let mut config = SceneConfig::default();
    config.camera = Camera::looking_at(Vec3::new(5.0, 10.0, 5.0), Vec3::new(0.0, 0.5, 0.0));
    config.props.push(prop);
    config
}

fn cube_prop(name: &str) -> PropDescriptor {
    PropDescriptor {
        name: name.into(),
        shape: Shape::cuboid(1.0, 1.0, 1.0),
        transform: Transform::from_position(Vec3::new(0.0, 0.5, 0.0)),
        ..PropDescriptor::default()
    }
}

/// Tick frames at 60 Hz from `*t` until `until`, advancing `*t`.
fn run_until(rt: &mut Runtime, t: &mut f64, until: f64) {
    while *t < until {
        *t += DT;
        rt.tick(*t, &PointerState::default());
    }
}

#[test]
fn dropped_box_is_audible_on_landing() {
    let mut rt = runtime(quiet_config());
    rt.spawn(&EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::new(0.0, 10.0, 0.0)))
        .unwrap();

    let mut t = 0.0;
    rt.tick(t, &PointerState::default());
    run_until(&mut rt, &mut t, 3.0);

    assert!(rt.sink().plays() >= 1, "landing should be audible");
}

#[test]
fn no_audio_after_dispose() {
    let mut rt = runtime(quiet_config());
    let falling = rt
        .spawn(&EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::new(0.0, 10.0, 0.0)))
        .unwrap();

    let mut t = 0.0;
    rt.tick(t, &PointerState::default());
    run_until(&mut rt, &mut t, 0.3);
    assert!(rt.registry_mut().dispose(falling));

    run_until(&mut rt, &mut t, 4.0);
    assert_eq!(rt.sink().plays(), 0);
    assert!(rt.sink().calls.is_empty());
}

#[test]
fn huge_frame_delta_runs_at_most_three_substeps() {
    let mut rt = runtime(quiet_config());
    rt.tick(0.0, &PointerState::default());
    let report = rt.tick(1_000.0, &PointerState::default());
    assert_eq!(report.substeps, 3);
}

#[test]
fn reset_restores_baseline() {
    let mut config = config_with_prop(cube_prop("plinth"));
    config.spawner.enabled = false;
    let mut rt = runtime(config);
    rt.tick(0.0, &PointerState::default());
    let baseline = rt.registry().len();
    assert_eq!(baseline, 2, "floor and plinth");

    let mut t = 0.0;
    for i in 0..6 {
        let x = i as f32 - 3.0;
        rt.spawn(&EntityDescriptor::dynamic_ball(0.3, Vec3::new(x, 4.0, 0.0)))
            .unwrap();
        let until = t + 0.2;
        run_until(&mut rt, &mut t, until);
    }
    assert!(rt.registry().len() > baseline);

    rt.reset();
    assert_eq!(rt.registry().len(), baseline);
    assert_eq!(rt.registry().dynamic_count(), 0);
    assert_eq!(rt.registry().physics().body_count(), 1);
    assert_eq!(rt.registry().scene().len(), baseline);
}

#[test]
fn ambient_spawner_drops_staggered_batches() {
    let mut rt = runtime(SceneConfig::default());
    let mut t = 0.0;
    let first = rt.tick(t, &PointerState::default());
    assert_eq!(first.spawned.len(), 1);

    run_until(&mut rt, &mut t, 1.0);
    assert_eq!(rt.registry().dynamic_count(), 3);

    run_until(&mut rt, &mut t, 11.0);
    assert_eq!(rt.registry().dynamic_count(), 6);
    assert_eq!(rt.spawner().batches_fired(), 2);
}

#[test]
fn spawner_never_spawns_while_focused() {
    let frame = PropDescriptor {
        focus: Some(FocusOverlay::Panel {
            name: "about".into(),
        }),
        ..cube_prop("frame")
    };
    let mut rt = runtime(config_with_prop(frame));

    // Props are placed before picking, so the first frame can already focus.
    let report = rt.tick(0.0, &PointerState::click_at(Vec2::ZERO));
    assert_eq!(
        report.state,
        InteractionState::Focused(FocusTarget::Panel("about".into()))
    );

    let mut t = 0.0;
    while t < 35.0 {
        t += DT;
        let report = rt.tick(t, &PointerState::at(Vec2::ZERO));
        assert!(report.spawned.is_empty(), "spawned while focused at t={t}");
    }
    assert_eq!(rt.registry().dynamic_count(), 0);
    assert_eq!(rt.spawner().batches_fired(), 0);

    // Leaving focus lets the next period's edge through.
    rt.tick(t + DT, &PointerState::click_at(Vec2::ZERO));
    assert!(!rt.controller().is_focused());
    run_until(&mut rt, &mut t, 41.0);
    assert_eq!(rt.spawner().batches_fired(), 1);
    assert_eq!(
        rt.surface().calls,
        vec![
            SurfaceCall::ShowPanel("about".into()),
            SurfaceCall::HidePanel("about".into()),
        ]
    );
}

#[test]
fn focus_clears_dropped_clutter() {
    let frame = PropDescriptor {
        focus: Some(FocusOverlay::Enlarge {
            position: Vec3::new(0.0, 4.0, 0.0),
            scale: 2.0,
        }),
        ..cube_prop("bust")
    };
    let mut config = config_with_prop(frame);
    config.spawner.enabled = false;
    let mut rt = runtime(config);
    rt.tick(0.0, &PointerState::default());
    let baseline = rt.registry().len();
    rt.spawn(&EntityDescriptor::dynamic_ball(0.3, Vec3::new(5.0, 4.0, 0.0)))
        .unwrap();

    let report = rt.tick(DT, &PointerState::click_at(Vec2::ZERO));
    let InteractionState::Focused(FocusTarget::Entity(proxy)) = report.state else {
        panic!("expected enlarge focus, got {:?}", report.state);
    };
    assert_eq!(rt.registry().len(), baseline + 1);
    assert_eq!(rt.registry().dynamic_count(), 0);

    rt.reset();
    assert!(!rt.registry().contains(proxy));
    assert!(!rt.controller().is_focused());
    assert_eq!(rt.registry().len(), baseline);
}

#[test]
fn navigational_click_opens_link_exactly_once() {
    let sign = PropDescriptor {
        category: Category::Navigational,
        link: Some("https://github.com".into()),
        ..cube_prop("github")
    };
    let mut config = config_with_prop(sign);
    config.spawner.enabled = false;
    let mut rt = runtime(config);

    let report = rt.tick(0.0, &PointerState::click_at(Vec2::ZERO));
    assert!(matches!(report.state, InteractionState::Hovering(_)));
    rt.tick(DT, &PointerState::at(Vec2::ZERO));

    assert_eq!(rt.surface().links_opened(), 1);
    assert!(rt.controller().focused().is_none());
}

#[test]
fn props_wait_for_their_asset() {
    let prop = PropDescriptor {
        asset: Some("models/bust.glb".into()),
        ..cube_prop("bust")
    };
    let mut config = config_with_prop(prop);
    config.spawner.enabled = false;
    let mut rt = runtime(config);

    rt.tick(0.0, &PointerState::default());
    assert_eq!(rt.registry().len(), 1, "only the floor");
    assert_eq!(rt.props().waiting(), 1);

    rt.assets_mut().complete("models/bust.glb", b"glb").unwrap();
    let report = rt.tick(DT, &PointerState::at(Vec2::ZERO));
    assert_eq!(report.spawned.len(), 1);
    assert_eq!(report.state, InteractionState::Hovering(report.spawned[0]));
}

#[test]
fn assets_load_from_config_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("models")).unwrap();
    std::fs::write(dir.path().join("models/bust.glb"), b"glb").unwrap();
    let yaml = r#"
spawner: { enabled: false }
asset_root: .
props:
  - name: bust
    asset: models/bust.glb
  - name: lost
    asset: models/lost.glb
"#;
    let path = dir.path().join("scene.yaml");
    std::fs::write(&path, yaml).unwrap();

    let mut rt = runtime(SceneConfig::load(&path).unwrap());
    let report = rt.tick(0.0, &PointerState::default());
    assert_eq!(report.spawned.len(), 1);
    assert_eq!(rt.props().dropped(), ["lost".to_string()]);
}

#[test]
fn gallery_scene_loads_and_focuses_the_easel() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenes/gallery.yaml");
    let mut config = SceneConfig::load(&path).unwrap();
    config.spawner.enabled = false;
    let mut rt = runtime(config);

    let report = rt.tick(0.0, &PointerState::click_at(Vec2::ZERO));
    assert_eq!(rt.props().placed().len(), 4);
    assert_eq!(
        report.state,
        InteractionState::Focused(FocusTarget::Panel("about".into()))
    );
}
