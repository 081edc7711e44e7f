use bevy::prelude::*;
use rand::Rng;

use crate::cloud::PointCloud;


/// Uniform points inside a cube of half-extent `extent`, for benches and render smoke tests.
pub fn random_point_cloud(n: usize, extent: f32) -> PointCloud {
    let mut rng = rand::thread_rng();

    PointCloud::from_points((0..n).map(|_| {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }))
}
