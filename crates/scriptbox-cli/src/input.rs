//! Script source resolution for CLI commands.
//!
//! A script path of `-` reads the script from stdin.

use std::io::Read;
use std::path::Path;

/// Reads script source from `path`, or from stdin when `path` is `-`.
pub fn read_script(path: &str) -> anyhow::Result<String> {
    match path {
        "-" => read_from_stdin(),
        path => read_from_file(path),
    }
}

fn read_from_file(path: &str) -> anyhow::Result<String> {
    let file_path = Path::new(path);
    if !file_path.exists() {
        anyhow::bail!("script not found: {path}");
    }
    std::fs::read_to_string(file_path).map_err(|e| anyhow::anyhow!("failed to read script: {e}"))
}

fn read_from_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
    Ok(buffer)
}
