use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCameraSystemSet;


/// Per-frame ordering inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkullPointsSet {
    /// Asset polling and one-shot cloud construction.
    Load,
    /// Camera intro tween.
    Tween,
    /// Orbit configuration and auto-rotation, ahead of the orbit camera's own update.
    Controls,
    /// Cursor, viewport and time uniforms.
    Uniforms,
}

pub fn configure_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            SkullPointsSet::Load,
            SkullPointsSet::Tween,
            SkullPointsSet::Controls,
            SkullPointsSet::Uniforms,
        ).chain(),
    );

    app.configure_sets(
        Update,
        SkullPointsSet::Controls.before(PanOrbitCameraSystemSet),
    );
}
