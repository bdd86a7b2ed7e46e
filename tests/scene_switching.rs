//! Headless run of the demo scenes with the effect overlay, no window or GPU.

use scene_change::{
    DrawList, EffectContext, EffectKind, EffectSet, FrameId, Input, KeyCode, SceneError,
    SceneManager, ScreenCapture, Shape, Vec2, demo,
};

const SCREEN: Vec2 = Vec2::new(800.0, 600.0);
const DT: f32 = 1.0 / 60.0;

/// Capture provider that has a frame ready one frame after it is asked.
#[derive(Default)]
struct NextFrameCapture {
    requested: bool,
    ready: Option<FrameId>,
    taken: u32,
}

impl NextFrameCapture {
    fn end_frame(&mut self) {
        if std::mem::take(&mut self.requested) {
            self.ready = Some(FrameId(self.taken));
        }
    }
}

impl ScreenCapture for NextFrameCapture {
    fn has_new_frame(&self) -> bool {
        self.ready.is_some()
    }

    fn get_frame(&mut self) -> Option<FrameId> {
        let frame = self.ready.take();
        if frame.is_some() {
            self.taken += 1;
        }
        frame
    }

    fn request_current_frame(&mut self) {
        self.requested = true;
    }
}

struct Harness {
    scenes: SceneManager,
    effects: EffectSet,
    capture: NextFrameCapture,
    input: Input,
    draw: DrawList,
}

impl Harness {
    fn new() -> Self {
        let mut scenes = SceneManager::new();
        demo::register(&mut scenes);
        scenes.change_scene(demo::SQUARES, 0.0).unwrap();
        Self {
            scenes,
            effects: EffectSet::with_seed(7),
            capture: NextFrameCapture::default(),
            input: Input::new(),
            draw: DrawList::new(),
        }
    }

    /// One frame in the same order as the app loop: update, draw, overlay.
    fn frame(&mut self) {
        self.draw.clear();
        assert!(self.scenes.update(&self.input, &mut self.effects, SCREEN, DT));
        self.scenes.draw(&mut self.draw, SCREEN);
        self.effects.advance_all(
            DT,
            &mut EffectContext {
                screen: SCREEN,
                draw: &mut self.draw,
                capture: &mut self.capture,
            },
        );
        self.capture.end_frame();
        self.input.begin_frame();
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            self.frame();
        }
    }

    fn press(&mut self, key: KeyCode) {
        self.input.press(key);
        self.frame();
        self.input.release(key);
    }
}

#[test]
fn each_binding_switches_scene_under_its_effect() {
    let keys = [
        (KeyCode::Digit1, EffectKind::Box),
        (KeyCode::Digit2, EffectKind::Circle),
        (KeyCode::Digit3, EffectKind::Line),
        (KeyCode::Digit4, EffectKind::Cut),
    ];

    for (key, kind) in keys {
        let mut h = Harness::new();
        assert_eq!(h.scenes.active_scene().unwrap(), demo::SQUARES);

        h.press(key);
        let pending = h.scenes.pending().expect("change scheduled");
        assert_eq!(pending.target, demo::CIRCLES);
        assert_eq!(pending.duration, demo::TRANSITION_SECONDS);
        assert_eq!(h.effects.kinds().collect::<Vec<_>>(), vec![kind]);

        // Two seconds of frames, with a little slack for float accumulation
        h.frames(125);
        assert_eq!(h.scenes.active_scene().unwrap(), demo::CIRCLES);
        assert!(!h.scenes.is_transitioning());
        assert!(h.effects.is_empty(), "{kind} outlived the transition");
    }
}

#[test]
fn scene_swaps_while_covered() {
    let mut h = Harness::new();
    h.press(KeyCode::Digit2);

    h.frames(55);
    assert_eq!(h.scenes.active_scene().unwrap(), demo::SQUARES);
    h.frames(10);
    assert_eq!(h.scenes.active_scene().unwrap(), demo::CIRCLES);

    // Circle effect is still drawn on top of the new scene
    let last = h.draw.shapes().last().unwrap();
    assert!(matches!(last, Shape::Circle { .. }));
}

#[test]
fn cut_takes_one_capture_and_cuts_it_up() {
    let mut h = Harness::new();
    h.press(KeyCode::Digit4);
    h.frames(80);

    assert_eq!(h.capture.taken, 1);
    let images = h.draw.frames().count();
    assert_eq!(images, 16);
}

#[test]
fn change_during_transition_is_rejected() {
    let mut h = Harness::new();
    h.press(KeyCode::Digit1);

    let err = h.scenes.change_scene(demo::SQUARES, 2.0).unwrap_err();
    assert!(matches!(err, SceneError::TransitionInProgress { .. }));
    assert_eq!(h.scenes.pending().unwrap().target, demo::CIRCLES);
}

#[test]
fn unknown_scene_is_an_error() {
    let mut h = Harness::new();
    let err = h.scenes.change_scene("Scene03", 2.0).unwrap_err();
    assert!(matches!(err, SceneError::UnknownScene(_)));
    assert_eq!(h.scenes.active_scene().unwrap(), demo::SQUARES);
}

#[test]
fn only_first_binding_counts() {
    let mut h = Harness::new();
    h.input.press(KeyCode::Digit3);
    h.input.press(KeyCode::Digit1);
    h.frame();

    assert_eq!(h.effects.kinds().collect::<Vec<_>>(), vec![EffectKind::Box]);
}

#[test]
fn scenes_alternate() {
    let mut h = Harness::new();
    h.press(KeyCode::Digit1);
    h.frames(125);
    h.press(KeyCode::Digit3);
    h.frames(125);
    assert_eq!(h.scenes.active_scene().unwrap(), demo::SQUARES);
}
