//! Packs a small mesh whose positions and normals are referenced sparsely,
//! checking both the raw indexer answers and the packed buffers.

use mesh_helper::{Face, IndexFor, PackedMesh, SparseMesh, VertexIndexer};
use pretty_assertions::assert_eq;

fn scenario_mesh() -> SparseMesh {
  let positions = (0..10).map(|i| [i as f32, 0., 0.]).collect();

  let mut normals = vec![[0., 0., 0.]; 9];
  normals[3] = [1., 0., 0.];
  normals[5] = [0., 1., 0.];
  normals[7] = [0., 0., 1.];
  normals[8] = [1., 0., 1.];

  let faces = [
    ([0, 4, 2], [7, 5, 3]),
    ([2, 3, 9], [3, 7, 8]),
    ([9, 2, 4], [8, 7, 5]),
    ([2, 6, 1], [3, 5, 7]),
    ([9, 6, 0], [5, 7, 8]),
  ]
  .into_iter()
  .map(|(position, normal)| Face { position, normal })
  .collect();

  SparseMesh {
    positions,
    normals,
    faces,
  }
}

#[test]
fn test_indexer_answers() {
  let mesh = scenario_mesh();
  let mut indexer = VertexIndexer::for_mesh(10, 5).unwrap();

  let answers = mesh
    .faces
    .iter()
    .flat_map(|face| {
      face
        .position
        .into_iter()
        .zip(face.normal)
        .map(|(p, n)| (p, mesh.normals[n as usize]))
    })
    .map(|(p, normal)| indexer.index_for(p, normal))
    .collect::<Vec<_>>();

  assert_eq!(indexer.vertex_count(), 11);
  assert_eq!(
    answers[3],
    IndexFor {
      index: 2,
      new_vertex: false
    }
  );
  assert_eq!(
    answers.iter().filter(|a| a.new_vertex).count(),
    indexer.vertex_count() as usize
  );
}

#[test]
fn test_packed_buffers() {
  let mesh = scenario_mesh();
  let packed = PackedMesh::build(&mesh).unwrap();

  assert_eq!(packed.vertex_count(), 11);
  assert_eq!(packed.collision_count, 4);
  assert_eq!(
    packed.indices,
    vec![0, 1, 2, 2, 3, 4, 4, 5, 1, 2, 6, 7, 8, 9, 10]
  );

  let positions = packed
    .vertices
    .iter()
    .map(|v| v.position[0] as u32)
    .collect::<Vec<_>>();
  assert_eq!(positions, vec![0, 4, 2, 3, 9, 2, 6, 1, 9, 6, 0]);
  assert_eq!(packed.vertices[5].normal, [0., 0., 1.]);
}

#[test]
fn test_packing_is_deterministic() {
  let mesh = scenario_mesh();
  assert_eq!(
    PackedMesh::build(&mesh).unwrap(),
    PackedMesh::build(&mesh).unwrap()
  );
}
