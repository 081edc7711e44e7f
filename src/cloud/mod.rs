use bevy::{
    prelude::*,
    render::{
        mesh::{
            Indices,
            PrimitiveTopology,
        },
        render_asset::RenderAssetUsages,
    },
};
use static_assertions::assert_eq_size;
use ::rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};

use crate::{
    error::SkullPointsError,
    mesh::MeshSurfaceSampler,
};

pub mod rand;


pub const CLASSIC_POINT_COUNT: usize = 9_000;
pub const POST_PROCESSED_POINT_COUNT: usize = 99_000;

const QUAD_CORNERS: [[f32; 2]; 4] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

assert_eq_size!(Vec3, [f32; 3]);


/// Points sampled from a mesh surface, stored as a flat `xyz` buffer.
///
/// The count is fixed when the cloud is built; there is no way to add or remove points.
#[derive(
    Asset,
    Clone,
    Debug,
    Default,
    PartialEq,
    Reflect,
)]
pub struct PointCloud {
    positions: Vec<f32>,
}

impl PointCloud {
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let positions = points
            .into_iter()
            .flat_map(|point| point.to_array())
            .collect();

        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// The flat buffer viewed as points; its length is always a multiple of three.
    pub fn points(&self) -> &[Vec3] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn point(&self, index: usize) -> Vec3 {
        self.points()[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.points().iter().copied()
    }

    /// Expands every point into a quad whose four vertices share the point position.
    ///
    /// `ATTRIBUTE_UV_0` carries the corner in [-1, 1]; the point material offsets the
    /// corners in clip space so each quad faces the camera.
    pub fn to_render_mesh(&self) -> Mesh {
        let count = self.len();

        let mut positions: Vec<[f32; 3]> = Vec::with_capacity(count * 4);
        let mut corners: Vec<[f32; 2]> = Vec::with_capacity(count * 4);
        let mut indices: Vec<u32> = Vec::with_capacity(count * 6);

        for (i, point) in self.iter().enumerate() {
            let base = (i * 4) as u32;

            positions.extend([point.to_array(); 4]);
            corners.extend(QUAD_CORNERS);
            indices.extend(QUAD_INDICES.iter().map(|index| base + index));
        }

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, corners);
        mesh.insert_indices(Indices::U32(indices));
        mesh
    }
}


/// Keeps the sampled positions alongside the render mesh built from them.
#[derive(Component, Clone, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PointCloudHandle(pub Handle<PointCloud>);


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointCloudBuilder {
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for PointCloudBuilder {
    fn default() -> Self {
        Self {
            count: CLASSIC_POINT_COUNT,
            seed: None,
        }
    }
}

impl PointCloudBuilder {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Calls the sampler exactly `count` times.
    pub fn build(&self, sampler: &MeshSurfaceSampler) -> Result<PointCloud, SkullPointsError> {
        if self.count == 0 {
            return Err(SkullPointsError::InvalidPointCount);
        }

        let cloud = match self.seed {
            Some(seed) => self.sample_with(sampler, &mut StdRng::seed_from_u64(seed)),
            None => self.sample_with(sampler, &mut ::rand::thread_rng()),
        };

        Ok(cloud)
    }

    fn sample_with<R: Rng + ?Sized>(&self, sampler: &MeshSurfaceSampler, rng: &mut R) -> PointCloud {
        PointCloud::from_points((0..self.count).map(|_| sampler.sample(rng)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_mesh_has_four_vertices_per_point() {
        let cloud = PointCloud::from_points([Vec3::ZERO, Vec3::ONE]);
        let mesh = cloud.to_render_mesh();

        assert_eq!(mesh.count_vertices(), 8);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(12));

        let last: Vec<usize> = mesh.indices().unwrap().iter().skip(6).collect();
        assert_eq!(last, vec![4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn points_round_trip_through_the_flat_buffer() {
        let cloud = PointCloud::from_points([Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);

        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(cloud.point(1), Vec3::new(4.0, 5.0, 6.0));
    }
}
