use bevy::{
    prelude::*,
    window::{
        CursorMoved,
        PrimaryWindow,
    },
};

use crate::material::PointCloudMaterial;


/// Latest pointer position, normalized to [-0.5, 0.5] on both axes.
///
/// `y` grows downwards, as window coordinates do.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Reflect,
    Resource,
)]
#[reflect(Resource)]
pub struct CursorState {
    pub x: f32,
    pub y: f32,
}

impl CursorState {
    /// `None` for a zero-sized window.
    pub fn from_window_position(position: Vec2, window_size: Vec2) -> Option<Self> {
        if window_size.x <= 0.0 || window_size.y <= 0.0 || !position.is_finite() {
            return None;
        }

        let normalized = (position / window_size - 0.5).clamp(Vec2::splat(-0.5), Vec2::splat(0.5));

        Some(Self {
            x: normalized.x,
            y: normalized.y,
        })
    }

    /// Repulsion center in mesh space; the cursor is placed on the z = 0 plane as is.
    pub fn repulsion_center(&self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }
}


pub fn track_cursor(
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut cursor: ResMut<CursorState>,
) {
    let Ok((primary, window)) = windows.single() else {
        cursor_moved.clear();
        return;
    };

    let Some(latest) = cursor_moved
        .read()
        .filter(|event| event.window == primary)
        .last()
    else {
        return;
    };

    if let Some(state) = CursorState::from_window_position(latest.position, window.size()) {
        *cursor = state;
    }
}

pub fn apply_cursor_uniform(
    cursor: Res<CursorState>,
    clouds: Query<&MeshMaterial3d<PointCloudMaterial>>,
    spawned: Query<(), Added<MeshMaterial3d<PointCloudMaterial>>>,
    mut materials: ResMut<Assets<PointCloudMaterial>>,
) {
    if !cursor.is_changed() && spawned.is_empty() {
        return;
    }

    let center = cursor.repulsion_center();
    for handle in &clouds {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.set_repulsion_center(center);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_center_maps_to_origin() {
        let state = CursorState::from_window_position(Vec2::new(400.0, 300.0), Vec2::new(800.0, 600.0)).unwrap();
        assert_eq!(state, CursorState::default());
    }

    #[test]
    fn corners_and_outside_positions_clamp() {
        let size = Vec2::new(800.0, 600.0);

        let top_left = CursorState::from_window_position(Vec2::ZERO, size).unwrap();
        assert_eq!((top_left.x, top_left.y), (-0.5, -0.5));

        let outside = CursorState::from_window_position(Vec2::new(5000.0, -20.0), size).unwrap();
        assert_eq!((outside.x, outside.y), (0.5, -0.5));
    }

    #[test]
    fn zero_sized_window_is_ignored() {
        assert!(CursorState::from_window_position(Vec2::ONE, Vec2::ZERO).is_none());
    }
}
