use cgmath::{InnerSpace, Vector3};

/// Unit normal of the triangle `a, b, c` with counter-clockwise winding.
///
/// Degenerate triangles get the zero vector.
pub fn flat_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
  let a = Vector3::from(a);
  let n = (Vector3::from(b) - a).cross(Vector3::from(c) - a);

  if n.magnitude2() == 0. {
    return [0., 0., 0.];
  }
  n.normalize().into()
}
