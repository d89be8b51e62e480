//! End-to-end pass over a synthetic caption project: pop animation,
//! tracking transfer, and clear, against one in-memory snapshot.

use keyforge_animation_core::pop::{self, PopCurveSpec};
use keyforge_animation_core::transfer;
use keyforge_common::{CancelToken, NoopProgress};
use keyforge_project_model::{
    AnimatedVec2, Clip, Effect, Generator, NameClassifier, ParamValue, Parameter, Project,
    Timecode, Track, TrackKind, Vec2,
};

fn pip_effect() -> Effect {
    Effect {
        plugin_uid: "{Svfx:com.vegascreativesoftware:pictureinpicture}".into(),
        plugin_name: "Picture in Picture".into(),
        params: vec![
            Parameter::scalar("Scale", 1.0),
            Parameter::choice(
                "KeepProportions",
                vec!["On".into(), "Fill".into(), "Free Form".into()],
                0,
            ),
            Parameter::vector2("CornerTL", Vec2::default()),
            Parameter::vector2("CornerTR", Vec2::default()),
            Parameter::vector2("CornerBL", Vec2::default()),
            Parameter::vector2("CornerBR", Vec2::default()),
        ],
    }
}

fn tracking_effect() -> Effect {
    // 1920x1080 surface; every corner tracked over three local frames.
    let surface = Vec2::new(1920.0, 1080.0);
    let mut params = vec![];
    for name in [
        "surfaceTopLeft",
        "surfaceTopRight",
        "surfaceBottomLeft",
        "surfaceBottomRight",
    ] {
        let mut curve = AnimatedVec2::with_value(surface);
        curve.set_animated(true);
        curve.set_at_frame(0, surface);
        curve.set_at_frame(10, Vec2::new(960.0, 540.0));
        curve.set_at_frame(20, Vec2::new(480.0, 270.0));
        params.push(Parameter {
            name: name.into(),
            value: ParamValue::Vector2(curve),
        });
    }
    Effect {
        plugin_uid: "{Svfx:mocha.vegas}".into(),
        plugin_name: "Mocha VEGAS".into(),
        params,
    }
}

fn caption_clip(start_secs: f64, len_secs: f64, text: &str) -> Clip {
    Clip {
        start: Timecode::from_secs(start_secs),
        length: Timecode::from_secs(len_secs),
        selected: true,
        generator: Some(Generator {
            plugin_uid: "{com.host:titlesandtext}".into(),
            plugin_name: "VEGAS Titles & Text".into(),
            params: vec![Parameter::text("Text", text)],
        }),
        effects: vec![tracking_effect(), pip_effect()],
    }
}

fn build_project() -> Project {
    let mut project = Project::new("Caption Pipeline", 30.0);
    project.tracks.push(Track {
        kind: TrackKind::Video,
        name: "Captions".into(),
        clips: vec![
            caption_clip(0.0, 2.0, "First caption line"),
            caption_clip(2.0, 2.0, "Second caption,\na bit longer this time"),
        ],
    });
    project
}

#[test]
fn animate_then_transfer_then_clear() {
    let classifier = NameClassifier::default();
    let mut project = build_project();

    // Pop pass: first clip abuts the second, so only the second pops out.
    let summary = pop::animate_captions(
        &mut project,
        &PopCurveSpec::default(),
        None,
        &classifier,
        &mut NoopProgress,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(summary.animated, 2);
    assert_eq!(summary.suppressed, 1);

    let scale = |clip: usize| {
        project.tracks[0].clips[clip]
            .effects
            .iter()
            .find(|fx| fx.plugin_name == "Picture in Picture")
            .and_then(|fx| fx.scalar("Scale"))
            .unwrap()
            .keyframes()
            .collect::<Vec<_>>()
    };
    assert_eq!(scale(0), vec![(0, 0.5), (4, 1.5), (10, 1.0)]);
    assert_eq!(
        scale(1),
        vec![(0, 0.5), (4, 1.5), (10, 1.0), (53, 1.0), (57, 1.5), (60, 0.5)]
    );

    // Transfer pass: both clips carry a source and a destination.
    let report = transfer::apply_tracking(
        &mut project,
        &classifier,
        &mut NoopProgress,
        &CancelToken::new(),
    )
    .unwrap();
    assert_eq!(report.sources, 2);
    assert_eq!(report.targets, 2);
    // 2 sources x 4 corners x 3 keyframes x 2 destinations.
    assert_eq!(report.steps, 48);

    // First clip's window is 0..=60; its own keyframes at abs 0/10/20 all
    // land, plus the second source's abs 60/70/80 contributes only 60.
    let tl = project.tracks[0].clips[0]
        .effects
        .iter()
        .find(|fx| fx.plugin_name == "Picture in Picture")
        .and_then(|fx| fx.vector2("CornerTL"))
        .unwrap();
    let frames: Vec<i64> = tl.keyframes().map(|(f, _)| f).collect();
    assert_eq!(frames, vec![0, 10, 20, 60]);

    // Normalized against the 1920x1080 reference.
    let v = tl.value_at_frame(10);
    assert!((v.x - 0.5).abs() < 1e-9);
    assert!((v.y - 0.5).abs() < 1e-9);

    // Clear pass: back to a single static unit scale.
    let cleared = pop::clear_caption_animation(&mut project, &classifier).unwrap();
    assert_eq!(cleared, 2);
    let first_scale = project.tracks[0].clips[0]
        .effects
        .iter()
        .find(|fx| fx.plugin_name == "Picture in Picture")
        .and_then(|fx| fx.scalar("Scale"))
        .unwrap();
    assert!(!first_scale.is_animated());
    assert_eq!(first_scale.value_at_frame(0), 1.0);
}

#[test]
fn snapshot_survives_disk_roundtrip_with_curves() {
    let classifier = NameClassifier::default();
    let mut project = build_project();
    pop::animate_captions(
        &mut project,
        &PopCurveSpec::default(),
        None,
        &classifier,
        &mut NoopProgress,
        &CancelToken::new(),
    )
    .unwrap();

    let dir = std::env::temp_dir().join("keyforge_pipeline_roundtrip");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("project.json");

    project.save(&path).unwrap();
    let loaded = Project::load(&path).unwrap();

    let original = project.tracks[0].clips[1].effects[1].scalar("Scale").unwrap();
    let reloaded = loaded.tracks[0].clips[1].effects[1].scalar("Scale").unwrap();
    assert_eq!(
        original.keyframes().collect::<Vec<_>>(),
        reloaded.keyframes().collect::<Vec<_>>()
    );

    std::fs::remove_dir_all(&dir).ok();
}
