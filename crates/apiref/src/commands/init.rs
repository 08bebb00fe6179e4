//! `apiref init` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use apiref_config::{CONFIG_FILENAME, DEFAULT_CONFIG};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Directory to create the configuration in.
    #[arg(default_value = ".")]
    dir: PathBuf,
}

impl InitArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let path = write_default_config(&self.dir)?;
        Output::new().success(&format!("Created {}", path.display()));
        Ok(())
    }
}

/// Write [`DEFAULT_CONFIG`] into `dir`, refusing to overwrite.
fn write_default_config(dir: &Path) -> Result<PathBuf, CliError> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        return Err(CliError::Validation(format!(
            "{} already exists",
            path.display()
        )));
    }
    fs::create_dir_all(dir)?;
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}
