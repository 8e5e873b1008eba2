use std::error::Error;
use std::{ fs, path::Path };
use serde_json::{ Value, Map };
use anyhow::{ Context, Result };

fn main() -> Result<(), Box<dyn Error>> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")?;
    let data_dir = Path::new(&manifest_dir).join("data");
    let out_path = Path::new(&std::env::var("OUT_DIR")?).join("all_tables.json");

    println!("cargo:rerun-if-changed=data");

    // Always create the file, even if empty, so include_str! works
    if !data_dir.exists() {
        println!("cargo:warning=No data/ folder found, bundling no name tables");
        fs::write(out_path, "{}")?;
        return Ok(());
    }

    let tables = bundle_tables(&data_dir)?;
    fs::write(out_path, serde_json::to_string(&tables)?)?;
    Ok(())
}

fn bundle_tables(data_dir: &Path) -> Result<Value> {
    let mut tables = Map::new();

    for entry in fs::read_dir(data_dir)? {
        let file = entry?;
        let file_path = file.path();

        if !file.file_type()?.is_file() {
            continue;
        }
        if file_path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let stem = file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow::anyhow!("Non UTF-8 table file name: {}", file_path.display()))?
            .to_string();

        let content = fs::read_to_string(&file_path)
            .with_context(|| format!("reading {}", file_path.display()))?;
        let json: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", file_path.display()))?;

        println!("cargo:rerun-if-changed={}", file_path.display());
        tables.insert(stem, json);
    }

    Ok(Value::Object(tables))
}
