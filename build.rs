use std::error::Error;
use std::path::PathBuf;
use std::{env, fs};

const SETTINGS_FILE: &str = "config.toml";

/// Embeds the default settings file as `DEFAULT_CONFIG`.
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed={SETTINGS_FILE}");

    let defaults = fs::read_to_string(SETTINGS_FILE)?;
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);

    // Debug formatting escapes quotes and newlines into a valid string literal.
    fs::write(
        out_dir.join("default_settings.rs"),
        format!("pub const DEFAULT_CONFIG: &str = {defaults:?};\n"),
    )?;
    Ok(())
}
