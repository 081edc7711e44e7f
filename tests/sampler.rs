use bevy::prelude::*;
use rand::{
    rngs::StdRng,
    SeedableRng,
};

use bevy_skull_points::{
    MeshSurfaceSampler,
    SkullPointsError,
    TriangleSoup,
};


fn tilted_soup() -> TriangleSoup {
    TriangleSoup::new(
        vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(1.0, 1.0, 3.0),
        ],
        vec![[0, 1, 2], [1, 3, 4]],
    )
}


#[test]
fn test_samples_lie_in_their_triangle() {
    let soup = tilted_soup();
    let sampler = MeshSurfaceSampler::new(soup.clone()).unwrap();
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..2_000 {
        let sample = sampler.sample_with_barycentric(&mut rng);
        let [a, b, c] = soup.triangle(sample.triangle);
        let w = sample.barycentric;

        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-5);
        assert!(w.min_element() >= -1e-6 && w.max_element() <= 1.0 + 1e-6);

        let expected = a * w.x + b * w.y + c * w.z;
        assert!(sample.position.distance(expected) < 1e-5);

        let normal = (b - a).cross(c - a).normalize();
        assert!(normal.dot(sample.position - a).abs() < 1e-5);
    }
}

#[test]
fn test_frequencies_follow_area() {
    // the second triangle has three times the area of the first
    let soup = TriangleSoup::new(
        vec![
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(3.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
        vec![[0, 1, 2], [3, 4, 5]],
    );
    let sampler = MeshSurfaceSampler::new(soup).unwrap();

    assert!((sampler.area_fraction(0) - 0.25).abs() < 1e-6);
    assert!((sampler.total_area() - 2.0).abs() < 1e-6);

    let draws = 40_000;
    let mut rng = StdRng::seed_from_u64(2024);
    let hits = (0..draws)
        .filter(|_| sampler.sample_with_barycentric(&mut rng).triangle == 0)
        .count();

    let frequency = hits as f32 / draws as f32;
    assert!((frequency - 0.25).abs() < 0.01, "frequency {frequency}");
}

#[test]
fn test_empty_and_malformed_meshes() {
    assert_eq!(
        MeshSurfaceSampler::new(TriangleSoup::default()).unwrap_err(),
        SkullPointsError::EmptyMesh,
    );

    let nan = TriangleSoup::new(vec![Vec3::ZERO, Vec3::X, Vec3::NAN], vec![[0, 1, 2]]);
    assert!(matches!(
        MeshSurfaceSampler::new(nan),
        Err(SkullPointsError::InvalidMesh(_)),
    ));
}
