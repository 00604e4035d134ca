//! Build pages and convert them to inlined emails.

use std::path::PathBuf;

use anyhow::{Context, Result};
use mailsmith_gen::Generator;

/// Run the build pipeline over each target directory, stopping at the first
/// failure.
pub fn run(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        Generator::new(dir)
            .build()
            .with_context(|| format!("build failed in {}", dir.display()))?;
    }

    Ok(())
}
