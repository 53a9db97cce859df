use glam::Vec2;

/// Per-frame input queries, refreshed by the adapter before logic runs.
pub trait InputController {
    /// Left movement is held.
    fn left_pressed(&self) -> bool;
    /// Right movement is held.
    fn right_pressed(&self) -> bool;
    /// Upward movement is held.
    fn up_pressed(&self) -> bool;
    /// Downward movement is held.
    fn down_pressed(&self) -> bool;
    /// Primary action is held.
    fn x_pressed(&self) -> bool;
    /// Secondary action is held.
    fn z_pressed(&self) -> bool;
    /// Tertiary action is held.
    fn c_pressed(&self) -> bool;
    /// Menu toggle was pressed this frame.
    fn escape_pressed(&self) -> bool;
    /// The window has input focus.
    fn is_focused(&self) -> bool;
}

/// Plain input state, filled by scripted or headless adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputSnapshot {
    /// Left movement is held.
    pub left: bool,
    /// Right movement is held.
    pub right: bool,
    /// Upward movement is held.
    pub up: bool,
    /// Downward movement is held.
    pub down: bool,
    /// Primary action is held.
    pub x: bool,
    /// Secondary action is held.
    pub z: bool,
    /// Tertiary action is held.
    pub c: bool,
    /// Menu toggle was pressed this frame.
    pub escape: bool,
    /// The window has input focus.
    pub focused: bool,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            left: false,
            right: false,
            up: false,
            down: false,
            x: false,
            z: false,
            c: false,
            escape: false,
            focused: true,
        }
    }
}

impl InputController for InputSnapshot {
    fn left_pressed(&self) -> bool {
        self.left
    }

    fn right_pressed(&self) -> bool {
        self.right
    }

    fn up_pressed(&self) -> bool {
        self.up
    }

    fn down_pressed(&self) -> bool {
        self.down
    }

    fn x_pressed(&self) -> bool {
        self.x
    }

    fn z_pressed(&self) -> bool {
        self.z
    }

    fn c_pressed(&self) -> bool {
        self.c
    }

    fn escape_pressed(&self) -> bool {
        self.escape
    }

    fn is_focused(&self) -> bool {
        self.focused
    }
}

/// Movement direction implied by the directional keys, in screen axes.
///
/// Opposing keys cancel out. The result is not normalised.
#[must_use]
pub fn heading(input: &dyn InputController) -> Vec2 {
    let axis = |negative: bool, positive: bool| f32::from(u8::from(positive)) - f32::from(u8::from(negative));
    Vec2::new(
        axis(input.left_pressed(), input.right_pressed()),
        axis(input.up_pressed(), input.down_pressed()),
    )
}
