//! Loader for the triangle-mesh subset of Wavefront OBJ.
//!
//! Supports `v`, `vn` and `f` statements. Polygons are split into a triangle
//! fan, and corners without a normal reference get a flat normal.

use std::{fs, path::Path};

use log::{debug, warn};

use crate::error::MeshError;
use crate::mesh::{FaceIndices, SparseMesh};

const IGNORED_STATEMENTS: &[&str] =
  &["vt", "vp", "o", "g", "s", "usemtl", "mtllib", "l"];

pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<SparseMesh, MeshError> {
  let source = fs::read_to_string(path)?;
  parse_obj(&source)
}

pub fn parse_obj(source: &str) -> Result<SparseMesh, MeshError> {
  let mut positions: Vec<[f32; 3]> = vec![];
  let mut normals: Vec<[f32; 3]> = vec![];
  let mut faces: Vec<FaceIndices> = vec![];

  for (i, line) in source.lines().enumerate() {
    let line_number = i + 1;
    let line = line.split('#').next().unwrap_or_default().trim();
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
      continue;
    };

    match keyword {
      "v" => positions.push(parse_vector(tokens, line_number)?),
      "vn" => normals.push(parse_vector(tokens, line_number)?),
      "f" => {
        let corners = tokens
          .map(|token| {
            parse_corner(token, positions.len(), normals.len())
              .map_err(|message| MeshError::Obj {
                line: line_number,
                message,
              })
          })
          .collect::<Result<Vec<_>, _>>()?;

        if corners.len() < 3 {
          return Err(MeshError::Obj {
            line: line_number,
            message: format!("face has {} corners, need 3", corners.len()),
          });
        }

        let has_normals = corners.iter().all(|(_, n)| n.is_some());
        for k in 1..corners.len() - 1 {
          let fan = [corners[0], corners[k], corners[k + 1]];
          faces.push(FaceIndices {
            position: fan.map(|(p, _)| p),
            normal: has_normals.then(|| fan.map(|(_, n)| n.unwrap_or_default())),
          });
        }
      }
      other if IGNORED_STATEMENTS.contains(&other) => (),
      other => warn!("line {line_number}: skipping unsupported statement {other:?}"),
    }
  }

  debug!(
    "Parsed OBJ: {} positions, {} normals, {} triangles",
    positions.len(),
    normals.len(),
    faces.len()
  );

  SparseMesh::from_parts(positions, normals, &faces)
}

fn parse_vector<'a>(
  mut tokens: impl Iterator<Item = &'a str>,
  line: usize,
) -> Result<[f32; 3], MeshError> {
  let mut component = || -> Result<f32, MeshError> {
    let token = tokens.next().ok_or_else(|| MeshError::Obj {
      line,
      message: "expected 3 components".to_string(),
    })?;
    token.parse().map_err(|e| MeshError::Obj {
      line,
      message: format!("bad component {token:?}: {e}"),
    })
  };

  Ok([component()?, component()?, component()?])
}

/// Parses `p`, `p/t`, `p//n` or `p/t/n` into zero-based indices.
fn parse_corner(
  token: &str,
  position_count: usize,
  normal_count: usize,
) -> Result<(u32, Option<u32>), String> {
  let mut parts = token.split('/');
  let position = parts.next().unwrap_or_default();
  let _texcoord = parts.next();
  let normal = parts.next().filter(|s| !s.is_empty());

  let position = resolve_index(position, position_count)?;
  let normal = normal.map(|n| resolve_index(n, normal_count)).transpose()?;

  Ok((position, normal))
}

/// OBJ indices are 1-based; negative ones count back from the last element
/// defined so far.
fn resolve_index(token: &str, count: usize) -> Result<u32, String> {
  let raw: i64 = token
    .parse()
    .map_err(|e| format!("bad index {token:?}: {e}"))?;

  let resolved = match raw {
    0 => return Err("index 0 is not valid in OBJ".to_string()),
    r if r > 0 => r - 1,
    r => count as i64 + r,
  };

  u32::try_from(resolved)
    .map_err(|_| format!("index {raw} is out of range"))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::mesh::Face;

  const QUAD: &str = "\
# unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
vt 0 0
f 1//1 2//1 3//1 4//1
";

  #[test]
  fn test_quad_is_fan_triangulated() {
    let mesh = parse_obj(QUAD).unwrap();

    assert_eq!(mesh.positions.len(), 4);
    assert_eq!(
      mesh.faces,
      vec![
        Face {
          position: [0, 1, 2],
          normal: [0, 0, 0]
        },
        Face {
          position: [0, 2, 3],
          normal: [0, 0, 0]
        },
      ]
    );
  }

  #[test]
  fn test_corner_forms() {
    assert_eq!(parse_corner("3", 5, 0), Ok((2, None)));
    assert_eq!(parse_corner("3/7", 5, 0), Ok((2, None)));
    assert_eq!(parse_corner("3//2", 5, 2), Ok((2, Some(1))));
    assert_eq!(parse_corner("3/7/2", 5, 2), Ok((2, Some(1))));
    assert_eq!(parse_corner("-1//-2", 5, 2), Ok((4, Some(0))));
    assert!(parse_corner("0", 5, 0).is_err());
    assert!(parse_corner("-6", 5, 0).is_err());
    assert!(parse_corner("a", 5, 0).is_err());
  }

  #[test]
  fn test_faces_without_normals_are_flat() {
    let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 3 2\n").unwrap();

    assert_eq!(mesh.normals, vec![[0., 0., 1.], [0., 0., -1.]]);
    assert_eq!(mesh.faces[0].normal, [0, 0, 0]);
    assert_eq!(mesh.faces[1].normal, [1, 1, 1]);
  }

  #[test]
  fn test_errors_carry_line_numbers() {
    assert!(matches!(
      parse_obj("v 0 0 0\nv 1 0\n"),
      Err(MeshError::Obj { line: 2, .. })
    ));
    assert!(matches!(
      parse_obj("v 0 0 0\nf 1 2\n"),
      Err(MeshError::Obj { line: 2, .. })
    ));
    assert!(matches!(
      parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n"),
      Err(MeshError::PositionOutOfRange { face: 0, index: 3, .. })
    ));
  }

  #[test]
  fn test_unknown_statements_are_skipped() {
    let mesh = parse_obj("cstype bezier\nv 0 0 0\n").unwrap();
    assert_eq!(mesh.positions, vec![[0., 0., 0.]]);
  }
}
