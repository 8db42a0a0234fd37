//! Renders every schema under `schemas/` into `OUT_DIR`.

use std::error::Error;
use std::path::PathBuf;
use std::{env, fs};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=schemas");
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let mut paths = Vec::new();
    for entry in fs::read_dir("schemas")? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    for path in paths {
        let code = jsonbind_codegen::generate_from_file(&path)?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| format!("{}: file name is not UTF-8", path.display()))?
            .to_lowercase();
        fs::write(out_dir.join(format!("{stem}.rs")), code)?;
    }
    Ok(())
}
