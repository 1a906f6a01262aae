//! File path canonicalization for verification codes.
//!
//! Skip-set membership and the excluded-name list both compare normalized
//! paths, so every path is reduced to one platform-independent spelling
//! before use.

/// Normalizes a file path to the `./`-rooted form used in verification
/// codes.
///
/// Backslashes become forward slashes and surrounding whitespace is
/// dropped. `parent/..` pairs collapse in a single left-to-right pass over
/// the segments (only immediate pairs; this is not a full path resolver),
/// literal `./` sequences are removed, and the result is anchored under
/// `./`. The function is idempotent, so already-normalized names pass
/// through unchanged.
pub fn normalize_file_path(path: &str) -> String {
    let mut file_path = path.trim().replace('\\', "/");
    if file_path.contains("../") {
        let parts: Vec<&str> = file_path.split('/').collect();
        let mut kept: Vec<&str> = Vec::with_capacity(parts.len());
        let mut i = 0;
        while i < parts.len() {
            if i + 1 < parts.len() && parts[i + 1] == ".." {
                // Drop the parent segment together with its "..".
                i += 2;
            } else {
                kept.push(parts[i]);
                i += 1;
            }
        }
        file_path = kept.join("/");
    }
    file_path = file_path.replace("./", "");
    if file_path.starts_with('/') {
        format!(".{}", file_path)
    } else {
        format!("./{}", file_path)
    }
}
