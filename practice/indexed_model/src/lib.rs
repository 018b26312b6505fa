use std::fs::File;
use std::io::BufWriter;
use std::iter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mesh_helper::model::load_mesh;
use mesh_helper::vertex_data::cube::create_cube_data;
use mesh_helper::{PackedMesh, SparseMesh};

const DEFAULT_EXPORT_PATH: &str = "indexed_model.json";

/// Packs a model into a deduplicated vertex buffer and index buffer.
#[derive(Parser, Debug)]
#[command(name = "practice/indexed_model")]
struct Args {
  /// Model to import (`.json` or `.obj`). Uses the built-in cube if omitted.
  #[arg(long)]
  model: Option<PathBuf>,

  /// Side length of the built-in cube.
  #[arg(long, default_value_t = 2.)]
  cube_size: f32,

  /// Write the packed mesh as JSON.
  #[arg(long)]
  output: Option<PathBuf>,

  /// Fail unless the index buffer fits in `Uint16`.
  #[arg(long)]
  u16: bool,
}

pub fn run(args: &[String]) -> Result<()> {
  let _ = env_logger::try_init();

  import(&parse_args(args))?;

  Ok(())
}

/// Like [`run`], but always writes the packed JSON, to `indexed_model.json`
/// unless `--output` is given.
pub fn export(args: &[String]) -> Result<()> {
  let _ = env_logger::try_init();

  import(&with_default_output(parse_args(args)))?;

  Ok(())
}

fn parse_args(args: &[String]) -> Args {
  Args::parse_from(
    iter::once("indexed_model").chain(args.iter().map(String::as_str)),
  )
}

fn with_default_output(mut args: Args) -> Args {
  if args.output.is_none() {
    args.output = Some(PathBuf::from(DEFAULT_EXPORT_PATH));
  }
  args
}

fn load(args: &Args) -> Result<SparseMesh> {
  match &args.model {
    Some(path) => load_mesh(path)
      .with_context(|| format!("failed to load {}", path.display())),
    None => Ok(create_cube_data(args.cube_size)),
  }
}

fn import(args: &Args) -> Result<PackedMesh> {
  let mesh = load(args)?;
  let packed = PackedMesh::build(&mesh).context("failed to pack mesh")?;

  info!(
    "{} positions, {} normals, {} triangles -> {} vertices, {} indices",
    mesh.positions.len(),
    mesh.normals.len(),
    mesh.faces.len(),
    packed.vertex_count(),
    packed.index_count()
  );
  info!(
    "Vertex buffer {} bytes, index buffer {} bytes",
    packed.vertex_bytes().len(),
    packed.index_bytes().len()
  );

  if args.u16 {
    let indices = packed.indices_u16()?;
    info!("Index buffer fits Uint16 ({} bytes)", indices.len() * 2);
  }

  if let Some(path) = &args.output {
    export_json(&packed, path)
      .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
  }

  Ok(packed)
}

fn export_json(packed: &PackedMesh, path: &Path) -> Result<()> {
  let writer = BufWriter::new(File::create(path)?);
  let json = serde_json::json!({
    "vertex_count": packed.vertex_count(),
    "index_count": packed.index_count(),
    "vertices": packed.vertices,
    "indices": packed.indices,
  });
  serde_json::to_writer_pretty(writer, &json)?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn parse(args: &[&str]) -> Args {
    Args::parse_from(iter::once("indexed_model").chain(args.iter().copied()))
  }

  #[test]
  fn test_default_cube() {
    let args = parse(&[]);
    assert_eq!(args.cube_size, 2.);

    let packed = import(&args).unwrap();
    assert_eq!(packed.vertex_count(), 24);
  }

  #[test]
  fn test_export_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cube.json");
    let args = parse(&[
      "--cube-size",
      "1",
      "--u16",
      "--output",
      output.to_str().unwrap(),
    ]);
    import(&args).unwrap();

    let json: serde_json::Value =
      serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["vertex_count"], 24);
    assert_eq!(json["index_count"], 36);
    assert_eq!(json["vertices"][0]["position"][0], 0.5);
    assert_eq!(json["indices"].as_array().unwrap().len(), 36);
  }

  #[test]
  fn test_export_defaults_output_path() {
    let args = with_default_output(parse(&[]));
    assert_eq!(args.output, Some(PathBuf::from("indexed_model.json")));

    let args = with_default_output(parse(&["--output", "mesh.json"]));
    assert_eq!(args.output, Some(PathBuf::from("mesh.json")));
  }

  #[test]
  fn test_export_writes_packed_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");
    let options = vec![
      "--output".to_string(),
      output.to_str().unwrap().to_string(),
    ];
    export(&options).unwrap();

    let json: serde_json::Value =
      serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["vertex_count"], 24);
    assert_eq!(json["index_count"], 36);
  }

  #[test]
  fn test_missing_model_file() {
    let args = parse(&["--model", "does/not/exist.obj"]);
    let err = import(&args).unwrap_err();
    assert!(err.to_string().contains("does/not/exist.obj"));
  }
}
