use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use std::{fs::File, io::BufReader, path::Path};

use crate::error::MeshError;
use crate::mesh::{FaceIndices, SparseMesh};
use crate::obj::load_obj;

/// A component stored either as a JSON number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Component {
  Number(f32),
  Text(String),
}

impl Component {
  fn parse<E: serde::de::Error>(self) -> Result<f32, E> {
    match self {
      Component::Number(x) => Ok(x),
      Component::Text(s) => f32::from_str(s.trim()).map_err(E::custom),
    }
  }
}

fn from_component_vec<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
  D: Deserializer<'de>,
{
  let components: Vec<Component> = Vec::deserialize(deserializer)?;
  components.into_iter().map(Component::parse).collect()
}

fn from_optional_component_vec<'de, D>(
  deserializer: D,
) -> Result<Option<Vec<f32>>, D::Error>
where
  D: Deserializer<'de>,
{
  let components: Option<Vec<Component>> = Option::deserialize(deserializer)?;
  components
    .map(|c| c.into_iter().map(Component::parse).collect())
    .transpose()
}

fn to_triples(
  name: &'static str,
  flat: &[f32],
) -> Result<Vec<[f32; 3]>, MeshError> {
  if flat.len() % 3 != 0 {
    return Err(MeshError::RaggedArray {
      name,
      len: flat.len(),
    });
  }
  Ok(flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

/// JSON model with flat `position` and `normal` arrays and per-face index
/// triples into each.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Model {
  pub vertex_count: u32,
  #[serde(default)]
  pub face_count: Option<usize>,
  #[serde(deserialize_with = "from_component_vec")]
  pub position: Vec<f32>,
  #[serde(default, deserialize_with = "from_optional_component_vec")]
  pub normal: Option<Vec<f32>>,
  pub faces: Vec<FaceIndices>,
}

impl Model {
  pub fn into_sparse_mesh(self) -> Result<SparseMesh, MeshError> {
    let positions = to_triples("position", &self.position)?;
    if positions.len() != self.vertex_count as usize {
      return Err(MeshError::VertexCountMismatch {
        declared: self.vertex_count,
        actual: positions.len(),
      });
    }
    if let Some(declared) = self.face_count {
      if declared != self.faces.len() {
        return Err(MeshError::FaceCountMismatch {
          declared,
          actual: self.faces.len(),
        });
      }
    }

    let normals = match &self.normal {
      Some(flat) => to_triples("normal", flat)?,
      None => vec![],
    };

    SparseMesh::from_parts(positions, normals, &self.faces)
  }
}

pub fn load_model_json<P: AsRef<Path>>(path: P) -> Result<Model, MeshError> {
  let file = File::open(path)?;
  let reader = BufReader::new(file);

  let model = serde_json::from_reader(reader)?;

  Ok(model)
}

/// Loads a `.json` or `.obj` model, picking the format by extension.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<SparseMesh, MeshError> {
  let path = path.as_ref();
  let extension = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();

  match extension.as_str() {
    "json" => load_model_json(path)?.into_sparse_mesh(),
    "obj" => load_obj(path),
    _ => Err(MeshError::UnsupportedFormat(extension)),
  }
}
