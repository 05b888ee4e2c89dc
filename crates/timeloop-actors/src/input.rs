//! Per-tick sample of the external controls.

/// Control state sampled once per fixed tick.
///
/// Polling devices is the host's job; the time loop only sees this
/// already-sampled value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickInput {
    /// Horizontal axis in `[-1, 1]`. Out-of-range values are clamped
    /// and non-finite values read as zero.
    pub horizontal: f32,
    /// Jump was pressed this tick.
    pub jump: bool,
    /// The rewind control is currently held.
    pub rewind_held: bool,
}

impl TickInput {
    /// No input at all: play, stand still.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Rewind held, nothing else.
    pub fn rewind() -> Self {
        Self {
            rewind_held: true,
            ..Self::default()
        }
    }

    /// Play with the given horizontal axis.
    pub fn moving(horizontal: f32) -> Self {
        Self {
            horizontal,
            ..Self::default()
        }
    }

    /// Same input with the jump button pressed.
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Horizontal axis clamped to `[-1, 1]`, with NaN/inf mapped to 0.
    pub fn axis(&self) -> f32 {
        if self.horizontal.is_finite() {
            self.horizontal.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }
}
