use std::env;

use anyhow::Result;

fn main() -> Result<()> {
  let args: Vec<String> = env::args().collect();

  if args.len() < 2 {
    eprintln!("Usage: {} <workspace_member> [options]", args[0]);
    return Ok(());
  }

  let target = &args[1];
  let options = &args[2..];

  match target.as_str() {
    "practice/indexed_model" => indexed_model::run(options),
    "export:practice/indexed_model" => indexed_model::export(options),
    _ => {
      eprintln!("Not found: {}", target);
      Ok(())
    }
  }
}
