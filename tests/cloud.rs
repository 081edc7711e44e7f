use bevy::prelude::*;

use bevy_skull_points::{
    MeshSurfaceSampler,
    PointCloudBuilder,
    SkullPointsError,
    TriangleSoup,
    Variant,
    cloud::{
        CLASSIC_POINT_COUNT,
        POST_PROCESSED_POINT_COUNT,
    },
};


fn unit_square() -> MeshSurfaceSampler {
    let soup = TriangleSoup::new(
        vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
        vec![[0, 1, 2], [0, 2, 3]],
    );
    MeshSurfaceSampler::new(soup).unwrap()
}


#[test]
fn test_variant_counts_are_exact() {
    let sampler = unit_square();

    for (variant, count) in [
        (Variant::Classic, CLASSIC_POINT_COUNT),
        (Variant::PostProcessed, POST_PROCESSED_POINT_COUNT),
    ] {
        assert_eq!(variant.point_count(), count);

        let cloud = PointCloudBuilder::new(variant.point_count())
            .with_seed(9)
            .build(&sampler)
            .unwrap();

        assert_eq!(cloud.len(), count);
        assert_eq!(cloud.positions().len(), 3 * count);
    }
}

#[test]
fn test_points_stay_on_the_surface() {
    let cloud = PointCloudBuilder::new(5_000)
        .with_seed(3)
        .build(&unit_square())
        .unwrap();

    for point in cloud.iter() {
        assert_eq!(point.z, 0.0);
        assert!((0.0..=1.0).contains(&point.x));
        assert!((0.0..=1.0).contains(&point.y));
    }
}

#[test]
fn test_seed_reproducibility() {
    let sampler = unit_square();

    let a = PointCloudBuilder::new(256).with_seed(11).build(&sampler).unwrap();
    let b = PointCloudBuilder::new(256).with_seed(11).build(&sampler).unwrap();
    let c = PointCloudBuilder::new(256).with_seed(12).build(&sampler).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_zero_points_is_rejected() {
    assert_eq!(
        PointCloudBuilder::new(0).build(&unit_square()).unwrap_err(),
        SkullPointsError::InvalidPointCount,
    );
}

#[test]
fn test_render_mesh_matches_cloud() {
    let cloud = PointCloudBuilder::new(100).with_seed(5).build(&unit_square()).unwrap();
    let mesh = cloud.to_render_mesh();

    assert_eq!(mesh.count_vertices(), 400);
    assert_eq!(mesh.indices().map(|indices| indices.len()), Some(600));
}
