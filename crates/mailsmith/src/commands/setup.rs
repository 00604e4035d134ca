//! Scaffold new mail projects.

use std::path::PathBuf;

use anyhow::{Context, Result};
use mailsmith_gen::Generator;

/// Run the setup command over each target directory, stopping at the first
/// failure.
pub fn run(dirs: &[PathBuf]) -> Result<()> {
    for dir in dirs {
        tracing::info!("Setting up {}", dir.display());

        Generator::new(dir)
            .setup()
            .with_context(|| format!("setup failed in {}", dir.display()))?;
    }

    tracing::info!("Setup complete. Run 'mailsmith build' to generate emails.");

    Ok(())
}
