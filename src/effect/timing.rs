//! Shared timing convention and easing for transition effects.

use std::f32::consts::FRAC_PI_2;

/// Coverage ramp: eases linear phase progress (0 to 1) into visual extent.
///
/// Input is clamped, so callers may pass raw ratios.
pub fn coverage(progress: f32) -> f32 {
    (progress.clamp(0.0, 1.0) * FRAC_PI_2).sin()
}

/// Which half of an effect's duration a moment falls into, with the linear
/// progress through that half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// `[0, half]`: the effect is covering the screen.
    FadeIn(f32),
    /// `(half, duration)`: the effect is uncovering the screen.
    FadeOut(f32),
}

/// Total duration of an effect, split into a fade-in and a fade-out half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    duration: f32,
}

impl Timing {
    pub fn new(duration: f32) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn half(&self) -> f32 {
        self.duration / 2.0
    }

    /// Phase at elapsed time `t`, or `None` once the effect has run out.
    ///
    /// A non-positive (or NaN) duration is never active.
    pub fn phase(&self, t: f32) -> Option<Phase> {
        if self.duration.is_nan() || self.duration <= 0.0 || t >= self.duration {
            return None;
        }
        let half = self.half();
        let t = t.max(0.0);
        if t <= half {
            Some(Phase::FadeIn(t / half))
        } else {
            Some(Phase::FadeOut((t - half) / half))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_endpoints() {
        assert_eq!(coverage(0.0), 0.0);
        assert!((coverage(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(coverage(-3.0), 0.0);
        assert!((coverage(7.0) - 1.0).abs() < 1e-6);
        assert!(coverage(0.5) > 0.5);
    }

    #[test]
    fn phases_split_at_half() {
        let timing = Timing::new(2.0);
        assert_eq!(timing.phase(0.0), Some(Phase::FadeIn(0.0)));
        assert_eq!(timing.phase(1.0), Some(Phase::FadeIn(1.0)));
        assert_eq!(timing.phase(1.5), Some(Phase::FadeOut(0.5)));
        assert_eq!(timing.phase(2.0), None);
        assert_eq!(timing.phase(9.0), None);
    }

    #[test]
    fn degenerate_duration_is_inactive() {
        assert_eq!(Timing::new(0.0).phase(0.0), None);
        assert_eq!(Timing::new(-1.0).phase(0.0), None);
        assert_eq!(Timing::new(f32::NAN).phase(0.0), None);
    }
}
