use bevy::{
    prelude::*,
    render::{
        mesh::{
            PrimitiveTopology,
            VertexAttributeValues,
        },
        render_resource::VertexFormat,
    },
};

use crate::error::SkullPointsError;


/// Flat triangle geometry pulled out of one or more bevy meshes.
///
/// Positions stay in mesh-local space; node transforms of the source scene are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleSoup {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleSoup {
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Reads positions and triangles from a mesh.
    ///
    /// Point and line topologies carry no surface and yield an empty soup.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, SkullPointsError> {
        let topology = mesh.primitive_topology();
        if !matches!(topology, PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip) {
            debug!("skipping mesh with {:?} topology", topology);
            return Ok(Self::default());
        }

        let positions = read_vertex_positions(mesh)?;

        let indices: Vec<u32> = match mesh.indices() {
            Some(indices) => indices.iter().map(|i| i as u32).collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let triangles = match topology {
            PrimitiveTopology::TriangleStrip => strip_to_list(&indices),
            _ => indices
                .chunks_exact(3)
                .map(|chunk| [chunk[0], chunk[1], chunk[2]])
                .collect(),
        };

        let soup = Self::new(positions, triangles);
        soup.validate()?;

        Ok(soup)
    }

    /// Appends another soup, re-basing its indices.
    pub fn append(&mut self, other: TriangleSoup) {
        let offset = self.positions.len() as u32;

        self.positions.extend(other.positions);
        self.triangles.extend(
            other.triangles
                .into_iter()
                .map(|[a, b, c]| [a + offset, b + offset, c + offset]),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangle(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    pub fn triangle_area(&self, index: usize) -> f32 {
        let [a, b, c] = self.triangle(index);
        (b - a).cross(c - a).length() * 0.5
    }

    pub fn validate(&self) -> Result<(), SkullPointsError> {
        if let Some(position) = self.positions.iter().find(|p| !p.is_finite()) {
            return Err(SkullPointsError::InvalidMesh(format!("non-finite vertex position {position}")));
        }

        let vertex_count = self.positions.len() as u32;
        for (i, triangle) in self.triangles.iter().enumerate() {
            if let Some(index) = triangle.iter().find(|&&index| index >= vertex_count) {
                return Err(SkullPointsError::InvalidMesh(format!(
                    "triangle {i} references vertex {index}, mesh has {vertex_count}",
                )));
            }
        }

        Ok(())
    }
}


fn read_vertex_positions(mesh: &Mesh) -> Result<Vec<Vec3>, SkullPointsError> {
    match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
        Some(VertexAttributeValues::Float32x3(positions)) => {
            Ok(positions.iter().map(|&pos| Vec3::from(pos)).collect())
        }
        Some(VertexAttributeValues::Float32x4(positions)) => {
            Ok(positions.iter().map(|&pos| Vec3::new(pos[0], pos[1], pos[2])).collect())
        }
        Some(other) => Err(SkullPointsError::InvalidMesh(format!(
            "unsupported position format {:?}",
            VertexFormat::from(other),
        ))),
        None => Err(SkullPointsError::InvalidMesh("mesh has no position attribute".to_string())),
    }
}

// odd triangles flip winding to keep a consistent orientation
fn strip_to_list(indices: &[u32]) -> Vec<[u32; 3]> {
    indices
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[0] != w[1] && w[1] != w[2] && w[0] != w[2])
        .map(|(i, w)| if i % 2 == 0 { [w[0], w[1], w[2]] } else { [w[1], w[0], w[2]] })
        .collect()
}


#[cfg(test)]
mod tests {
    use bevy::render::{
        mesh::Indices,
        render_asset::RenderAssetUsages,
    };

    use super::*;

    fn quad_mesh(indexed: bool) -> Mesh {
        let positions = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        if indexed {
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
            mesh.insert_indices(Indices::U16(vec![0, 1, 2, 0, 2, 3]));
        } else {
            let [a, b, c, d] = [positions[0], positions[1], positions[2], positions[3]];
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vec![a, b, c, a, c, d]);
        }
        mesh
    }

    #[test]
    fn reads_indexed_and_unindexed_meshes() {
        let indexed = TriangleSoup::from_mesh(&quad_mesh(true)).unwrap();
        assert_eq!(indexed.triangle_count(), 2);
        assert_eq!(indexed.positions.len(), 4);

        let unindexed = TriangleSoup::from_mesh(&quad_mesh(false)).unwrap();
        assert_eq!(unindexed.triangle_count(), 2);
        assert_eq!(unindexed.positions.len(), 6);

        let total: f32 = (0..2).map(|i| indexed.triangle_area(i)).sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn point_meshes_have_no_surface() {
        let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vec![[0.0f32, 0.0, 0.0]]);

        assert!(TriangleSoup::from_mesh(&mesh).unwrap().is_empty());
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let soup = TriangleSoup::new(vec![Vec3::ZERO, Vec3::X], vec![[0, 1, 2]]);
        assert!(matches!(soup.validate(), Err(SkullPointsError::InvalidMesh(_))));
    }

    #[test]
    fn append_rebases_indices() {
        let mut soup = TriangleSoup::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]]);
        soup.append(TriangleSoup::new(vec![Vec3::ZERO, Vec3::Z, Vec3::Y], vec![[0, 1, 2]]));

        assert_eq!(soup.triangles, vec![[0, 1, 2], [3, 4, 5]]);
        assert_eq!(soup.triangle(1), [Vec3::ZERO, Vec3::Z, Vec3::Y]);
    }

    #[test]
    fn strips_alternate_winding() {
        assert_eq!(strip_to_list(&[0, 1, 2, 3]), vec![[0, 1, 2], [2, 1, 3]]);
    }
}
