use crate::foundation::error::SketchlapseResult;
use std::path::Path;

/// Ensure the parent directory of `path` exists.
///
/// Bare file names (empty parent) are left alone.
pub fn ensure_parent_dir(path: &Path) -> SketchlapseResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
