use bevy::prelude::*;


pub const FORCE_RADIUS: f32 = 1.5;
pub const MAX_FORCE: f32 = 0.5;
/// Lower clamp bound. Forces are `1 / dist²` and never negative, so this never bites.
pub const MIN_FORCE: f32 = 0.0;


/// Repulsion field pushing points away from the cursor.
///
/// CPU mirror of the displacement in `point_cloud.wgsl`; the shader receives the same
/// values through `PointCloudUniform`.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct ForceField {
    pub center: Vec3,
    pub radius: f32,
    pub min_force: f32,
    pub max_force: f32,
}

impl Default for ForceField {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: FORCE_RADIUS,
            min_force: MIN_FORCE,
            max_force: MAX_FORCE,
        }
    }
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Displacement {
    pub position: Vec3,
    /// `force / max_force`, zero outside the radius.
    pub intensity: f32,
}

impl ForceField {
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    pub fn force(&self, dist: f32) -> f32 {
        (1.0 / (dist * dist)).clamp(self.min_force, self.max_force)
    }

    pub fn displace(&self, position: Vec3) -> Displacement {
        let seg = position - self.center;
        let dist = seg.length();

        if dist >= self.radius {
            return Displacement {
                position,
                intensity: 0.0,
            };
        }

        let force = self.force(dist);
        let intensity = force / self.max_force;

        // no direction at the center itself
        if dist == 0.0 {
            return Displacement {
                position,
                intensity,
            };
        }

        Displacement {
            position: position + seg / dist * force,
            intensity,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_saturates_near_the_center() {
        let field = ForceField::default();

        assert_eq!(field.force(0.0), MAX_FORCE);
        assert_eq!(field.force(0.01), MAX_FORCE);
        assert_eq!(field.force(1.0), 0.5);
        assert_eq!(field.force(1.25), MAX_FORCE);
        assert!((field.force(1.49) - 1.0 / (1.49 * 1.49)).abs() < 1e-6);
    }

    #[test]
    fn displacement_points_away_from_center() {
        let field = ForceField::default().with_center(Vec3::new(0.1, -0.2, 0.0));
        let point = Vec3::new(0.1, -0.2, 1.45);

        let displaced = field.displace(point);
        let pushed = displaced.position - point;

        assert!(pushed.z > 0.0);
        assert!(pushed.x.abs() < 1e-6 && pushed.y.abs() < 1e-6);
        assert!((displaced.intensity - (1.0 / (1.45 * 1.45)) / 0.5).abs() < 1e-5);
    }
}
