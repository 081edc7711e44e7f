pub mod sampler;
pub mod triangles;

pub use sampler::{
    MeshSurfaceSampler,
    SurfaceSample,
};
pub use triangles::TriangleSoup;
