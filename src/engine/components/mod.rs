pub mod mesh;
pub mod mesh_data;
pub mod shapes;
pub mod transform;

pub use mesh::Mesh;
pub use mesh_data::MeshData;
pub use shapes::Shape;
pub use transform::Transform;
