use thiserror::Error;

use crate::indexer::IndexerError;

#[derive(Error, Debug)]
pub enum MeshError {
  #[error("failed to read model file: {0}")]
  Io(#[from] std::io::Error),
  #[error("invalid JSON model: {0}")]
  Json(#[from] serde_json::Error),
  #[error("unsupported model format {0:?}, expected .json or .obj")]
  UnsupportedFormat(String),
  #[error("line {line}: {message}")]
  Obj { line: usize, message: String },
  #[error("{name} array has {len} components, which is not a multiple of 3")]
  RaggedArray { name: &'static str, len: usize },
  #[error("model declares {declared} vertices but has {actual} positions")]
  VertexCountMismatch { declared: u32, actual: usize },
  #[error("model declares {declared} faces but lists {actual}")]
  FaceCountMismatch { declared: usize, actual: usize },
  #[error("face {face} references position {index}, but there are only {count}")]
  PositionOutOfRange { face: usize, index: u32, count: usize },
  #[error("face {face} references normal {index}, but there are only {count}")]
  NormalOutOfRange { face: usize, index: u32, count: usize },
  #[error("{len} {name} do not fit in 32-bit indices")]
  TooLarge { name: &'static str, len: usize },
  #[error("{0} vertices cannot be addressed by a 16-bit index buffer")]
  TooManyVerticesForU16(usize),
  #[error(transparent)]
  Indexer(#[from] IndexerError),
}
