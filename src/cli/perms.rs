use anyhow::{Context, Result};
use std::path::Path;

use crate::audio::permissions;

pub fn run(path: &Path) -> Result<()> {
    let perms = permissions::inspect(path)
        .with_context(|| format!("Failed to read permissions of {}", path.display()))?;
    println!("{}: {}", path.display(), perms);
    Ok(())
}
