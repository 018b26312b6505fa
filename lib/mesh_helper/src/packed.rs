use bytemuck::{Pod, Zeroable};
use log::debug;
use serde::Serialize;

use crate::error::MeshError;
use crate::indexer::{IndexFor, VertexIndexer};
use crate::mesh::{index_u32, SparseMesh};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable, Serialize)]
pub struct Vertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
}

///
/// Interleaved vertex buffer plus triangle-list index buffer, one vertex per
/// distinct (position, normal) pair of the source mesh.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PackedMesh {
  pub vertices: Vec<Vertex>,
  pub indices: Vec<u32>,
  /// Vertices that share a position with an earlier vertex but not its normal.
  pub collision_count: u32,
}

impl PackedMesh {
  ///
  /// Packs `mesh` in face-then-corner order. Vertex data is written only the
  /// first time a pair is seen; every corner writes its packed index.
  ///
  pub fn build(mesh: &SparseMesh) -> Result<Self, MeshError> {
    mesh.validate()?;

    let sparse_count = index_u32("positions", mesh.positions.len())?;
    let face_count = index_u32("faces", mesh.faces.len())?;
    let mut indexer = VertexIndexer::for_mesh(sparse_count, face_count)?;

    let mut vertices = Vec::with_capacity(mesh.positions.len());
    let mut indices = Vec::with_capacity(mesh.corner_count());

    for face in &mesh.faces {
      for (&p, &n) in face.position.iter().zip(&face.normal) {
        let normal = mesh.normals[n as usize];
        let IndexFor { index, new_vertex } = indexer.index_for(p, normal);

        if new_vertex {
          debug_assert_eq!(index as usize, vertices.len());
          vertices.push(Vertex {
            position: mesh.positions[p as usize],
            normal,
          });
        }
        indices.push(index);
      }
    }

    debug!(
      "Packed {} corners into {} vertices ({} positions, {} collisions)",
      indices.len(),
      indexer.vertex_count(),
      sparse_count,
      indexer.collision_count()
    );

    Ok(Self {
      vertices,
      indices,
      collision_count: indexer.collision_count(),
    })
  }

  pub fn vertex_count(&self) -> usize {
    self.vertices.len()
  }

  pub fn index_count(&self) -> usize {
    self.indices.len()
  }

  /// Vertex buffer contents, ready for upload.
  pub fn vertex_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.vertices)
  }

  /// Index buffer contents as `Uint32`.
  pub fn index_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.indices)
  }

  /// Narrows the index buffer to `Uint16`, if every vertex is addressable.
  pub fn indices_u16(&self) -> Result<Vec<u16>, MeshError> {
    if self.vertices.len() > usize::from(u16::MAX) + 1 {
      return Err(MeshError::TooManyVerticesForU16(self.vertices.len()));
    }
    Ok(self.indices.iter().map(|&i| i as u16).collect())
  }
}
