//! Filesystem output for generated files.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::error::GenerateError;
use super::generator::GeneratedFile;

/// Write each generated file under the output directory, creating
/// intermediate directories as needed.
pub fn write_files(out_dir: &Path, files: &[GeneratedFile]) -> Result<(), GenerateError> {
    for file in files {
        let path = out_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.source).map_err(|source| GenerateError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = file.source.len(), "wrote generated file");
    }
    Ok(())
}
