//! Recursive file collection for directory-based verification codes.

use super::path::normalize_file_path;
use crate::checksum::FileChecksumGenerator;
use crate::error::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Walks `dir` depth-first, appending the lowercased checksum of every file
/// whose normalized path relative to `root` is not in `skipped`.
///
/// Directories that cannot be listed are skipped whole; packagers routinely
/// point the generator at trees with unreadable corners, and the code is
/// still well defined over the files that are visible. An unreadable file,
/// by contrast, would silently change the code, so it aborts generation.
pub(crate) fn collect_checksums<G: FileChecksumGenerator>(
    generator: &G,
    root: &Path,
    dir: &Path,
    skipped: &HashSet<String>,
    checksums: &mut Vec<String>,
) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(dir = %dir.display(), error = %err, "skipping unlistable directory");
            return Ok(());
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "directory listing failed; skipping remainder");
                return Ok(());
            }
        };
        let path = entry.path();
        // Follows symlinks, so a link to a directory is walked into.
        let is_dir = fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false);
        if is_dir {
            collect_checksums(generator, root, &path, skipped, checksums)?;
        } else {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let normalized = normalize_file_path(&relative.to_string_lossy());
            if skipped.contains(&normalized) {
                continue;
            }
            let checksum = generator.file_checksum(&path)?;
            checksums.push(checksum.to_lowercase());
        }
    }
    Ok(())
}
