use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes rendered token files into one output directory
pub struct OutputWriter {
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl OutputWriter {
    /// Create a writer for `output_dir`, creating the directory if needed
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

        Ok(OutputWriter {
            output_dir,
            written: Vec::new(),
        })
    }

    /// Write `<stem>.tokens.<extension>`, replacing any previous file
    pub fn write(&mut self, stem: &str, extension: &str, contents: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.tokens.{}", stem, extension));
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
        self.written.push(path.clone());
        Ok(path)
    }

    /// Paths written so far, in write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}
