//! HUD plugin (render-only): score/combo labels, floating text glyphs and the
//! on-screen control buttons.
//!
//! ```text
//! Scoreboard ─► Display ─► HudSink ─► apply_hud_text ─► Text2d labels
//! mouse/touch ─► pointer_controls ─► TouchControls ─► gather_intent
//! ```

use std::sync::{Arc, Mutex};

use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::window::PrimaryWindow;

use crate::common::sets::FrameSet;
use crate::common::state::GameState;
use crate::plugins::camera::MainCamera;
use crate::plugins::feedback::{Display, DisplaySink, FloatingText, refresh_display};
use crate::plugins::input::{TouchControls, gather_intent};

const BUTTON_SIZE: Vec2 = Vec2::splat(64.0);
const BUTTON_IDLE: Color = Color::srgba(1.0, 1.0, 1.0, 0.15);
const BUTTON_ACTIVE: Color = Color::srgba(1.0, 1.0, 1.0, 0.45);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudLabel {
    Score,
    Combo,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlButton {
    Left,
    Right,
    Jump,
    Shoot,
}

impl ControlButton {
    const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Jump, Self::Shoot];

    /// Centre in render space.
    fn center(self) -> Vec2 {
        match self {
            Self::Left => Vec2::new(-340.0, -250.0),
            Self::Right => Vec2::new(-260.0, -250.0),
            Self::Jump => Vec2::new(260.0, -250.0),
            Self::Shoot => Vec2::new(340.0, -250.0),
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Self::Left => "<",
            Self::Right => ">",
            Self::Jump => "^",
            Self::Shoot => "o",
        }
    }

    fn contains(self, p: Vec2) -> bool {
        let d = (p - self.center()).abs();
        d.x <= BUTTON_SIZE.x * 0.5 && d.y <= BUTTON_SIZE.y * 0.5
    }
}

#[derive(Default)]
struct HudLines {
    score: Option<String>,
    combo: Option<String>,
}

/// Display sink that hands label text to the HUD entities.
#[derive(Clone, Default)]
pub struct HudSink(Arc<Mutex<HudLines>>);

impl DisplaySink for HudSink {
    fn set_score_text(&mut self, text: &str) {
        if let Ok(mut lines) = self.0.lock() {
            lines.score = Some(text.to_owned());
        }
    }

    fn set_combo_text(&mut self, text: &str) {
        if let Ok(mut lines) = self.0.lock() {
            lines.combo = Some(text.to_owned());
        }
    }
}

#[derive(Resource, Clone)]
struct HudFeed(HudSink);

pub fn plugin(app: &mut App) {
    let sink = HudSink::default();
    app.world_mut()
        .get_resource_or_init::<Display>()
        .add_sink(sink.clone());

    app.insert_resource(HudFeed(sink))
        .insert_resource(TouchControls::installed())
        .add_systems(OnEnter(GameState::InGame), (spawn_labels, spawn_buttons))
        .add_systems(
            Update,
            pointer_controls
                .in_set(FrameSet::Input)
                .before(gather_intent),
        )
        .add_systems(
            Update,
            (
                apply_hud_text.after(refresh_display),
                label_floating_text,
                fade_floating_text,
                highlight_buttons,
            )
                .in_set(FrameSet::Present),
        );
}

fn spawn_labels(mut commands: Commands) {
    for (label, y) in [(HudLabel::Score, 280.0), (HudLabel::Combo, 256.0)] {
        commands.spawn((
            Name::new(format!("{label:?}Label")),
            label,
            Text2d::default(),
            TextFont {
                font_size: 20.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Transform::from_xyz(-320.0, y, 10.0),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn spawn_buttons(mut commands: Commands) {
    for button in ControlButton::ALL {
        commands
            .spawn((
                Name::new(format!("{button:?}Button")),
                button,
                Sprite::from_color(BUTTON_IDLE, BUTTON_SIZE),
                Transform::from_translation(button.center().extend(20.0)),
                DespawnOnExit(GameState::InGame),
            ))
            .with_child((
                Text2d::new(button.glyph()),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                Transform::from_xyz(0.0, 0.0, 1.0),
            ));
    }
}

fn apply_hud_text(feed: Res<HudFeed>, mut q: Query<(&HudLabel, &mut Text2d)>) {
    let Ok(mut lines) = feed.0.0.lock() else {
        return;
    };
    let score = lines.score.take();
    let combo = lines.combo.take();
    for (label, mut text) in &mut q {
        let next = match label {
            HudLabel::Score => score.as_ref(),
            HudLabel::Combo => combo.as_ref(),
        };
        if let Some(next) = next {
            text.0.clone_from(next);
        }
    }
}

fn label_floating_text(mut commands: Commands, q: Query<(Entity, &FloatingText), Added<FloatingText>>) {
    for (e, floating) in &q {
        commands.entity(e).insert((
            Text2d::new(floating.text.clone()),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    }
}

fn fade_floating_text(mut q: Query<(&FloatingText, &mut TextColor)>) {
    for (floating, mut color) in &mut q {
        color.0 = Color::WHITE.with_alpha(floating.alpha);
    }
}

/// Map mouse and touch pointers onto the on-screen buttons.
pub fn pointer_controls(
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    touches: Option<Res<Touches>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut controls: ResMut<TouchControls>,
) {
    let Ok((camera, camera_tf)) = q_camera.single() else {
        return;
    };
    let to_world = |p: Vec2| camera.viewport_to_world_2d(camera_tf, p).ok();

    // (position, newly pressed)
    let mut pointers: Vec<(Vec2, bool)> = Vec::new();
    if let (Some(mouse), Ok(window)) = (mouse.as_deref(), windows.single()) {
        let cursor = window.cursor_position().and_then(to_world);
        if let Some(p) = cursor.filter(|_| mouse.pressed(MouseButton::Left)) {
            pointers.push((p, mouse.just_pressed(MouseButton::Left)));
        }
    }
    if let Some(touches) = touches.as_deref() {
        for touch in touches.iter() {
            if let Some(p) = to_world(touch.position()) {
                pointers.push((p, touches.just_pressed(touch.id())));
            }
        }
    }

    let held = |button: ControlButton| pointers.iter().any(|(p, _)| button.contains(*p));

    if let Some(left) = controls.left.as_mut() {
        left.set_held(held(ControlButton::Left));
    }
    if let Some(right) = controls.right.as_mut() {
        right.set_held(held(ControlButton::Right));
    }
    if let Some(jump) = controls.jump.as_mut() {
        jump.set_held(held(ControlButton::Jump));
    }
    if let Some(shoot) = controls.shoot.as_mut() {
        let pressed = pointers
            .iter()
            .any(|(p, fresh)| *fresh && ControlButton::Shoot.contains(*p));
        if pressed {
            shoot.press();
        } else if !held(ControlButton::Shoot) {
            shoot.release();
        }
    }
}

fn highlight_buttons(controls: Res<TouchControls>, mut q: Query<(&ControlButton, &mut Sprite)>) {
    for (button, mut sprite) in &mut q {
        let active = match button {
            ControlButton::Left => controls.left.is_some_and(|c| c.is_held()),
            ControlButton::Right => controls.right.is_some_and(|c| c.is_held()),
            ControlButton::Jump => controls.jump.is_some_and(|c| c.is_held()),
            ControlButton::Shoot => controls.shoot.is_some_and(|c| c.is_active()),
        };
        sprite.color = if active { BUTTON_ACTIVE } else { BUTTON_IDLE };
    }
}
