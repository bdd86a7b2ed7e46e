use winit::keyboard::KeyCode;

use super::{SceneContext, SceneId};
use crate::effect::EffectKind;
use crate::input::Input;

/// Keys that each start a transition effect and a scene change together.
///
/// Bindings are checked in order and only the first key pressed this frame
/// counts.
#[derive(Clone, Debug)]
pub struct TransitionBindings {
    bindings: Vec<(KeyCode, EffectKind)>,
}

impl TransitionBindings {
    pub fn new(bindings: impl IntoIterator<Item = (KeyCode, EffectKind)>) -> Self {
        Self {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// Digits 1 to 4 for box, circle, line and cut.
    pub fn digits() -> Self {
        let keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
        Self::new(keys.into_iter().zip(EffectKind::ALL))
    }

    /// The effect bound to the first key pressed this frame.
    pub fn triggered(&self, input: &Input) -> Option<EffectKind> {
        self.bindings
            .iter()
            .find(|(key, _)| input.key_pressed(*key))
            .map(|&(_, kind)| kind)
    }

    /// On a bound key press, start its effect and switch to `target`, both
    /// lasting `duration` seconds.
    pub fn poll(
        &self,
        ctx: &mut SceneContext<'_>,
        target: &SceneId,
        duration: f32,
    ) -> Option<EffectKind> {
        let kind = self.triggered(ctx.input)?;
        ctx.add_effect(kind, duration);
        ctx.change_scene(target.clone(), duration);
        Some(kind)
    }
}

impl Default for TransitionBindings {
    fn default() -> Self {
        Self::digits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_follow_catalog_order() {
        let bindings = TransitionBindings::digits();
        let keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
        for (key, kind) in keys.into_iter().zip(EffectKind::ALL) {
            let mut input = Input::new();
            input.press(key);
            assert_eq!(bindings.triggered(&input), Some(kind));
        }
    }

    #[test]
    fn first_pressed_binding_wins() {
        let bindings = TransitionBindings::digits();
        let mut input = Input::new();
        assert_eq!(bindings.triggered(&input), None);

        input.press(KeyCode::Digit4);
        input.press(KeyCode::Digit2);
        assert_eq!(bindings.triggered(&input), Some(EffectKind::Circle));

        // Held keys are not new presses
        input.begin_frame();
        assert_eq!(bindings.triggered(&input), None);
    }
}
