use cgmath::*;

use crate::mesh::{Face, SparseMesh};
use crate::normals::flat_normal;

const AXIS_NORMALS: [[f32; 3]; 6] = [
  [1., 0., 0.],
  [-1., 0., 0.],
  [0., 1., 0.],
  [0., -1., 0.],
  [0., 0., 1.],
  [0., 0., -1.],
];

/// Cube centered at the origin with 8 shared corners and 6 face normals.
///
/// Corner `i` sits at `+side / 2` on axis `k` when bit `k` of `i` is set.
pub fn create_cube_data(side: f32) -> SparseMesh {
  let h = side / 2.;
  let positions = (0..8_u32)
    .map(|i| [0, 1, 2].map(|k| if i & (1 << k) != 0 { h } else { -h }))
    .collect::<Vec<[f32; 3]>>();

  let mut faces: Vec<Face> = vec![];

  for (n, normal) in AXIS_NORMALS.iter().enumerate() {
    let axis = n / 2;
    let side_bit = u32::from(normal[axis] > 0.);
    let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
    let corner = |a: u32, b: u32| (side_bit << axis) | (a << u) | (b << v);

    let mut quad = [corner(0, 0), corner(1, 0), corner(1, 1), corner(0, 1)];
    let winding = flat_normal(
      positions[quad[0] as usize],
      positions[quad[1] as usize],
      positions[quad[2] as usize],
    );
    if Vector3::from(winding).dot(Vector3::from(*normal)) < 0. {
      quad.reverse();
    }

    let n = n as u32;
    faces.push(Face {
      position: [quad[0], quad[1], quad[2]],
      normal: [n; 3],
    });
    faces.push(Face {
      position: [quad[2], quad[3], quad[0]],
      normal: [n; 3],
    });
  }

  SparseMesh {
    positions,
    normals: AXIS_NORMALS.to_vec(),
    faces,
  }
}
