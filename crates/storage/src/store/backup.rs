#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

/// `<dir>/<stem><suffix>.<ext>`, e.g. `chmgt.db` -> `chmgt_backup.db`.
pub fn backup_path(primary: &Path, suffix: &str) -> PathBuf {
    let stem = primary
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match primary.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    primary.with_file_name(name)
}

/// Full-file copy of the primary database. Called only after the save
/// transaction committed and its connection was closed.
pub(crate) fn write_backup(primary: &Path, backup: &Path) -> std::io::Result<()> {
    std::fs::copy(primary, backup)?;
    Ok(())
}
