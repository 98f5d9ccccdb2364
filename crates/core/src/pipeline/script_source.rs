use std::fs;
use std::path::Path;

use super::pipeline_error::PipelineError;

/// Reads a UTF-8 script and trims surrounding whitespace.
pub fn read_script(path: &Path) -> Result<String, PipelineError> {
    let text = fs::read_to_string(path).map_err(|source| PipelineError::ScriptRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(PipelineError::EmptyScript);
    }
    Ok(text.to_string())
}
