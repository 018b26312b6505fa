pub mod error;
pub mod indexer;
pub mod mesh;
pub mod model;
pub mod normals;
pub mod obj;
pub mod packed;
pub mod vertex_data;

pub use error::MeshError;
pub use indexer::{IndexFor, IndexerError, VertexIndexer};
pub use mesh::{Face, SparseMesh};
pub use packed::{PackedMesh, Vertex};
