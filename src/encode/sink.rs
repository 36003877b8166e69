use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::encode::png::ExportFile;
use crate::foundation::error::{PhotocardError, PhotocardResult};

/// Destination for finished exports (the browser's download step, a directory, a test buffer).
pub trait ExportSink: Send {
    fn save(&mut self, file: ExportFile) -> PhotocardResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    files: Vec<ExportFile>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exports in the order they were saved.
    pub fn files(&self) -> &[ExportFile] {
        &self.files
    }
}

impl ExportSink for InMemorySink {
    fn save(&mut self, file: ExportFile) -> PhotocardResult<()> {
        self.files.push(file);
        Ok(())
    }
}

/// Writes each export into a directory under its suggested file name.
#[derive(Debug)]
pub struct DirSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ExportSink for DirSink {
    fn save(&mut self, file: ExportFile) -> PhotocardResult<()> {
        if file.file_name.contains(['/', '\\']) || file.file_name.starts_with('.') {
            return Err(PhotocardError::validation(format!(
                "refusing export file name '{}'",
                file.file_name
            )));
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create export dir '{}'", self.dir.display()))?;
        let path = self.dir.join(&file.file_name);
        std::fs::write(&path, &file.png)
            .with_context(|| format!("write export '{}'", path.display()))?;
        tracing::info!(path = %path.display(), bytes = file.png.len(), "export saved");
        self.written.push(path);
        Ok(())
    }
}
