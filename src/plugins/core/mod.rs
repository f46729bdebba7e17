//! Core plugin: shared resources, frame ordering, the session clock and the
//! level-space to render-space mapping.

use bevy::prelude::*;

use crate::common::clock::{SessionClock, advance_clock};
use crate::common::geometry::{Position, to_render};
use crate::common::sets::{self, FrameSet};
use crate::common::tunables::Tunables;

pub const BACKGROUND: Color = Color::srgb(0.043, 0.063, 0.125);

pub fn plugin(app: &mut App) {
    // Keep values inserted by the launcher.
    app.init_resource::<Tunables>()
        .init_resource::<SessionClock>()
        .insert_resource(ClearColor(BACKGROUND));

    sets::configure(app);

    app.add_systems(Update, advance_clock.in_set(FrameSet::Clock))
        .add_systems(Update, sync_transforms.in_set(FrameSet::Present));
}

/// Copy level positions onto render transforms, keeping each entity's depth.
pub fn sync_transforms(tunables: Res<Tunables>, mut q: Query<(&Position, &mut Transform)>) {
    let world = tunables.world_size();
    for (pos, mut tf) in &mut q {
        let p = to_render(pos.0, world);
        tf.translation.x = p.x;
        tf.translation.y = p.y;
    }
}
