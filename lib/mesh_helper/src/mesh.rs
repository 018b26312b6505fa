use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::normals::flat_normal;

/// Triangle with separate position and normal indices per corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Face {
  pub position: [u32; 3],
  pub normal: [u32; 3],
}

/// Triangle as written in a model file, where normal indices may be missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct FaceIndices {
  pub position: [u32; 3],
  #[serde(default)]
  pub normal: Option<[u32; 3]>,
}

///
/// A triangle mesh whose faces index positions and normals independently.
///
/// Positions form the sparse index space fed to
/// [`VertexIndexer`](crate::indexer::VertexIndexer).
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseMesh {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub faces: Vec<Face>,
}

impl SparseMesh {
  ///
  /// Builds a mesh from loaded parts. Faces without normal indices get a
  /// flat normal appended to `normals`.
  ///
  pub fn from_parts(
    positions: Vec<[f32; 3]>,
    mut normals: Vec<[f32; 3]>,
    faces: &[FaceIndices],
  ) -> Result<Self, MeshError> {
    let mut resolved = Vec::with_capacity(faces.len());

    for (i, face) in faces.iter().enumerate() {
      check_positions(i, &face.position, positions.len())?;

      let normal = match face.normal {
        Some(normal) => normal,
        None => {
          let [a, b, c] = face.position.map(|p| positions[p as usize]);
          let index = index_u32("normals", normals.len())?;
          normals.push(flat_normal(a, b, c));
          [index; 3]
        }
      };
      check_normals(i, &normal, normals.len())?;

      resolved.push(Face {
        position: face.position,
        normal,
      });
    }

    Ok(Self {
      positions,
      normals,
      faces: resolved,
    })
  }

  /// Checks that every face index is in range.
  pub fn validate(&self) -> Result<(), MeshError> {
    index_u32("positions", self.positions.len())?;
    index_u32("faces", self.faces.len())?;

    for (i, face) in self.faces.iter().enumerate() {
      check_positions(i, &face.position, self.positions.len())?;
      check_normals(i, &face.normal, self.normals.len())?;
    }
    Ok(())
  }

  pub fn corner_count(&self) -> usize {
    self.faces.len() * 3
  }
}

pub(crate) fn index_u32(name: &'static str, len: usize) -> Result<u32, MeshError> {
  u32::try_from(len).map_err(|_| MeshError::TooLarge { name, len })
}

fn check_positions(
  face: usize,
  indices: &[u32; 3],
  count: usize,
) -> Result<(), MeshError> {
  match indices.iter().find(|&&i| i as usize >= count) {
    Some(&index) => Err(MeshError::PositionOutOfRange { face, index, count }),
    None => Ok(()),
  }
}

fn check_normals(
  face: usize,
  indices: &[u32; 3],
  count: usize,
) -> Result<(), MeshError> {
  match indices.iter().find(|&&i| i as usize >= count) {
    Some(&index) => Err(MeshError::NormalOutOfRange { face, index, count }),
    None => Ok(()),
  }
}
