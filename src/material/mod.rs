pub mod force_field;
pub mod point;

pub use force_field::{
    Displacement,
    ForceField,
};
pub use point::{
    PointCloudMaterial,
    PointCloudMaterialPlugin,
    PointStyle,
};


