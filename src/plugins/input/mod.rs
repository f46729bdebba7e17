//! Input plugin: one intent snapshot per frame.
//!
//! Keyboard and on-screen (touch/mouse) controls are merged here so the rest of
//! the frame only ever reads [`InputIntent`].
//!
//! - Left / right / jump are hold states, keyboard OR touch.
//! - Shoot is an edge: a key press-edge or a queued touch press produces exactly
//!   one `shoot_edge`, and the queue is cleared the moment it is read.
//!
//! On-screen controls are optional. A control that was never installed is
//! `None` and simply never contributes.

use bevy::prelude::*;

use crate::common::sets::FrameSet;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputIntent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub shoot_edge: bool,
}

/// A hold button (left, right, jump).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoldControl {
    held: bool,
}

impl HoldControl {
    #[inline]
    pub fn set_held(&mut self, held: bool) {
        self.held = held;
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.held
    }
}

/// A press button (shoot): each press queues one shot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PressControl {
    queued: bool,
    active: bool,
}

impl PressControl {
    pub fn press(&mut self) {
        self.queued = true;
        self.active = true;
    }

    pub fn release(&mut self) {
        self.active = false;
    }

    /// Whether the button is currently shown as pressed. Cosmetic only.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Read and clear the queued press.
    #[inline]
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.queued)
    }
}

#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct TouchControls {
    pub left: Option<HoldControl>,
    pub right: Option<HoldControl>,
    pub jump: Option<HoldControl>,
    pub shoot: Option<PressControl>,
}

impl TouchControls {
    /// All four on-screen controls present and idle.
    pub fn installed() -> Self {
        Self {
            left: Some(HoldControl::default()),
            right: Some(HoldControl::default()),
            jump: Some(HoldControl::default()),
            shoot: Some(PressControl::default()),
        }
    }

    #[inline]
    fn held(control: &Option<HoldControl>) -> bool {
        control.as_ref().is_some_and(HoldControl::is_held)
    }

    fn take_shoot(&mut self) -> bool {
        self.shoot.as_mut().is_some_and(PressControl::take)
    }
}

/// Keyboard state sampled for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub shoot_pressed: bool,
}

impl KeyState {
    pub fn sample(keys: &ButtonInput<KeyCode>) -> Self {
        Self {
            left: keys.pressed(KeyCode::ArrowLeft),
            right: keys.pressed(KeyCode::ArrowRight),
            up: keys.pressed(KeyCode::ArrowUp),
            shoot_pressed: keys.just_pressed(KeyCode::Space),
        }
    }
}

/// Merge keyboard and touch into one intent.
///
/// A keyboard shot leaves a queued touch shot in place for the next frame, so
/// two separate actions still give two shots.
pub fn merge(keys: KeyState, touch: &mut TouchControls) -> InputIntent {
    InputIntent {
        move_left: keys.left || TouchControls::held(&touch.left),
        move_right: keys.right || TouchControls::held(&touch.right),
        jump: keys.up || TouchControls::held(&touch.jump),
        shoot_edge: keys.shoot_pressed || touch.take_shoot(),
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<InputIntent>()
        .init_resource::<TouchControls>()
        .add_systems(Update, gather_intent.in_set(FrameSet::Input));
}

/// Keyboard input is optional so headless apps run without `InputPlugin`.
pub fn gather_intent(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut touch: ResMut<TouchControls>,
    mut intent: ResMut<InputIntent>,
) {
    let keys = keys.map(|k| KeyState::sample(&k)).unwrap_or_default();
    *intent = merge(keys, &mut touch);
}
