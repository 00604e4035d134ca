//! The per-project generation pipeline.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use mailsmith_inline::{inline_file, InlineError, Warning};

use crate::runner::{CommandRunner, RunError, ShellRunner};

/// Subdirectory the site builder writes HTML pages into.
pub const SITE_SUBDIR: &str = "site";

/// Subdirectory the inlined email copies are written into.
pub const EMAILS_SUBDIR: &str = "emails";

const DEFAULT_LAYOUT_SUBPATH: &str = "src/layouts/default.haml";
const DEFAULT_PAGE_SUBPATH: &str = "src/pages/index.haml";

const SCAFFOLD_BRANDING: &str = "StaticMatic";
const BRANDING: &str = "MailSmith";

// The scaffolded layout links stylesheets through a helper that the built
// pages cannot use; setup swaps it for a plain link tag so the inliner can
// find the stylesheet in the generated HTML.
const STYLESHEET_HELPER: &str = "= stylesheets";
const STYLESHEET_LINK: &str = "%link{:rel => 'stylesheet', :href => 'stylesheets/screen.css'}";

/// One external tool invocation. The project root is appended as the final
/// argument when run.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Command lines for the external scaffolding tool and site builder.
///
/// Explicit configuration rather than a runtime platform probe, so a
/// different builder (or a wrapper script per platform) can be swapped in.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub scaffold: ToolCommand,
    pub build: ToolCommand,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            scaffold: ToolCommand::new("staticmatic", &["setup"]),
            build: ToolCommand::new("staticmatic", &["build"]),
        }
    }
}

/// Errors from the generation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Command(#[from] RunError),

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("site output directory not found: {path}")]
    MissingSiteDir { path: PathBuf },

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to inline {path}: {source}")]
    Email {
        path: PathBuf,
        #[source]
        source: InlineError,
    },
}

/// Drives the pipeline for one project root: setup, build pages, convert
/// each generated page to an inlined email copy.
///
/// Every operation stops at the first failure; nothing already written is
/// rolled back.
pub struct Generator<R: CommandRunner = ShellRunner> {
    root: PathBuf,
    tools: ToolConfig,
    runner: R,
}

impl Generator<ShellRunner> {
    /// Create a generator with the default external tools.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self::with_runner(root, ToolConfig::default(), ShellRunner)
    }
}

impl<R: CommandRunner> Generator<R> {
    /// Create a generator with an explicit tool configuration and runner.
    pub fn with_runner(root: impl AsRef<Path>, tools: ToolConfig, runner: R) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            tools,
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scaffold a new project and rebrand the generated templates.
    pub fn setup(&self) -> Result<(), GenerateError> {
        self.run_tool(&self.tools.scaffold)?;

        self.rewrite(
            DEFAULT_LAYOUT_SUBPATH,
            &[
                (SCAFFOLD_BRANDING, BRANDING),
                (STYLESHEET_HELPER, STYLESHEET_LINK),
            ],
        )?;
        self.rewrite(DEFAULT_PAGE_SUBPATH, &[(SCAFFOLD_BRANDING, BRANDING)])?;

        Ok(())
    }

    /// Run the external site builder against the project root.
    pub fn generate_pages(&self) -> Result<(), GenerateError> {
        self.run_tool(&self.tools.build)
    }

    /// Convert one generated HTML page into an inlined email copy.
    ///
    /// Failures are logged with the output path before being returned, so a
    /// broken page is diagnosable from the output alone.
    pub fn generate_email(&self, input: &Path, output: &Path) -> Result<(), GenerateError> {
        match self.try_generate_email(input, output) {
            Ok(warnings) => {
                tracing::info!("created {}", output.display());
                if !warnings.is_empty() {
                    tracing::warn!("WARNING: {}", output.display());
                    for warning in &warnings {
                        tracing::warn!("  {warning}");
                    }
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("failed to create {}: {e}", output.display());
                Err(e)
            }
        }
    }

    fn try_generate_email(
        &self,
        input: &Path,
        output: &Path,
    ) -> Result<Vec<Warning>, GenerateError> {
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|source| GenerateError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let result = inline_file(input).map_err(|source| GenerateError::Email {
            path: output.to_path_buf(),
            source,
        })?;

        fs::write(output, &result.html).map_err(|source| GenerateError::Write {
            path: output.to_path_buf(),
            source,
        })?;

        Ok(result.warnings)
    }

    /// Convert every generated HTML page under `site/` into a mirrored tree
    /// under `emails/`, stopping at the first failure.
    pub fn generate_emails(&self) -> Result<(), GenerateError> {
        let site_dir = self.root.join(SITE_SUBDIR);
        let emails_dir = self.root.join(EMAILS_SUBDIR);

        if !site_dir.is_dir() {
            return Err(GenerateError::MissingSiteDir { path: site_dir });
        }

        fs::create_dir_all(&emails_dir).map_err(|source| GenerateError::CreateDir {
            path: emails_dir.clone(),
            source,
        })?;

        for entry in WalkDir::new(&site_dir).sort_by_file_name() {
            let entry = entry.map_err(|source| GenerateError::Walk {
                path: site_dir.clone(),
                source,
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }

            let relative = entry.path().strip_prefix(&site_dir).unwrap_or(entry.path());
            let output = emails_dir.join(relative);
            self.generate_email(entry.path(), &output)?;
        }

        Ok(())
    }

    /// Build pages then convert them to emails.
    pub fn build(&self) -> Result<(), GenerateError> {
        tracing::info!("Building {}", self.root.display());

        self.generate_pages()?;
        self.generate_emails()
    }

    fn run_tool(&self, tool: &ToolCommand) -> Result<(), GenerateError> {
        let mut args = tool.args.clone();
        args.push(self.root.display().to_string());
        self.runner.run(&tool.program, &args)?;
        Ok(())
    }

    fn rewrite(
        &self,
        subpath: &str,
        replacements: &[(&str, &str)],
    ) -> Result<(), GenerateError> {
        let path = self.root.join(subpath);

        let mut content = fs::read_to_string(&path).map_err(|source| GenerateError::Read {
            path: path.clone(),
            source,
        })?;

        for (from, to) in replacements {
            content = content.replace(from, to);
        }

        fs::write(&path, content).map_err(|source| GenerateError::Write { path, source })
    }
}
