use bevy::prelude::*;
use rand::{
    distributions::{
        Distribution,
        WeightedError,
        WeightedIndex,
    },
    Rng,
};

use crate::{
    error::SkullPointsError,
    mesh::triangles::TriangleSoup,
};


/// One point drawn from a mesh surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSample {
    pub triangle: usize,
    /// Weights of the triangle's three vertices, summing to one.
    pub barycentric: Vec3,
    pub position: Vec3,
}


/// Draws points uniformly over the surface area of a triangle mesh.
///
/// Triangles are chosen with probability proportional to their area, then a point is
/// picked uniformly inside the chosen triangle.
#[derive(Clone, Debug)]
pub struct MeshSurfaceSampler {
    soup: TriangleSoup,
    areas: Vec<f32>,
    total_area: f32,
    distribution: WeightedIndex<f32>,
}

impl MeshSurfaceSampler {
    pub fn new(soup: TriangleSoup) -> Result<Self, SkullPointsError> {
        soup.validate()?;

        if soup.is_empty() {
            return Err(SkullPointsError::EmptyMesh);
        }

        let areas: Vec<f32> = (0..soup.triangle_count())
            .map(|i| soup.triangle_area(i))
            .collect();
        let total_area = areas.iter().sum::<f32>();

        let distribution = WeightedIndex::new(&areas).map_err(|err| match err {
            WeightedError::NoItem | WeightedError::AllWeightsZero => SkullPointsError::EmptyMesh,
            other => SkullPointsError::InvalidMesh(other.to_string()),
        })?;

        Ok(Self {
            soup,
            areas,
            total_area,
            distribution,
        })
    }

    pub fn total_area(&self) -> f32 {
        self.total_area
    }

    pub fn triangle_count(&self) -> usize {
        self.areas.len()
    }

    pub fn area_fraction(&self, triangle: usize) -> f32 {
        self.areas[triangle] / self.total_area
    }

    pub fn soup(&self) -> &TriangleSoup {
        &self.soup
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        self.sample_with_barycentric(rng).position
    }

    pub fn sample_with_barycentric<R: Rng + ?Sized>(&self, rng: &mut R) -> SurfaceSample {
        let triangle = self.distribution.sample(rng);
        let [a, b, c] = self.soup.triangle(triangle);

        let mut u: f32 = rng.r#gen();
        let mut v: f32 = rng.r#gen();

        // reflect back into the lower half of the unit square
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }

        SurfaceSample {
            triangle,
            barycentric: Vec3::new(1.0 - u - v, u, v),
            position: a + (b - a) * u + (c - a) * v,
        }
    }
}

impl Distribution<SurfaceSample> for MeshSurfaceSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SurfaceSample {
        self.sample_with_barycentric(rng)
    }
}


#[cfg(test)]
mod tests {
    use rand::{
        rngs::StdRng,
        SeedableRng,
    };

    use super::*;

    #[test]
    fn degenerate_triangles_are_never_chosen() {
        let soup = TriangleSoup::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(2.0, 0.0, 0.0)],
            vec![[0, 1, 3], [0, 1, 2]],
        );
        let sampler = MeshSurfaceSampler::new(soup).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(sampler.area_fraction(0), 0.0);
        for _ in 0..1000 {
            assert_eq!(sampler.sample_with_barycentric(&mut rng).triangle, 1);
        }
    }

    #[test]
    fn zero_area_mesh_is_empty() {
        let soup = TriangleSoup::new(vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0], vec![[0, 1, 2]]);
        assert_eq!(MeshSurfaceSampler::new(soup).unwrap_err(), SkullPointsError::EmptyMesh);
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let soup = TriangleSoup::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 2]]);
        let sampler = MeshSurfaceSampler::new(soup).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        let a: Vec<Vec3> = (0..16).map(|_| sampler.sample(&mut rng)).collect();
        let b: Vec<Vec3> = StdRng::seed_from_u64(42)
            .sample_iter(&sampler)
            .take(16)
            .map(|s| s.position)
            .collect();

        assert_eq!(a, b);
    }
}
