use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;

use crate::errors::Result;

const TMP_SUFFIX: &str = "tmp";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Sibling path a document is staged to before it replaces `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Replaces `path` with `data` by writing a temporary file and renaming it.
///
/// Readers observe either the previous document or the new one, never a mix.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Lowercase, dash-separated label safe to embed in a backup file name.
pub fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !sanitized.is_empty() && !last_dash {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Fresh `<prefix>_<YYYYMMDD_HHMMSS><millis>[_note].<extension>` path in `dir`.
///
/// Names taken within the same millisecond get an `_NN` suffix numbered past
/// the highest one already on disk, so newer snapshots always sort after older ones.
pub fn next_backup_path(
    dir: &Path,
    prefix: &str,
    note: Option<&str>,
    extension: &str,
) -> PathBuf {
    let now = Utc::now();
    let mut stem = format!(
        "{prefix}_{}{:03}",
        now.format(BACKUP_TIMESTAMP_FORMAT),
        now.timestamp_subsec_millis()
    );
    if let Some(label) = sanitize_note(note) {
        stem.push('_');
        stem.push_str(&label);
    }
    match highest_suffix(dir, &stem, extension) {
        None => dir.join(format!("{stem}.{extension}")),
        Some(last) => dir.join(format!("{stem}_{:02}.{extension}", last + 1)),
    }
}

/// `Some(0)` for a bare `<stem>.<ext>`, `Some(n)` for the highest `<stem>_NN.<ext>`.
fn highest_suffix(dir: &Path, stem: &str, extension: &str) -> Option<u32> {
    let entries = fs::read_dir(dir).ok()?;
    let dotted = format!(".{extension}");
    entries
        .filter_map(|entry| entry.ok()?.file_name().into_string().ok())
        .filter_map(|name| {
            let rest = name.strip_prefix(stem)?.strip_suffix(dotted.as_str())?;
            if rest.is_empty() {
                return Some(0);
            }
            let digits = rest.strip_prefix('_')?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.parse().ok()
        })
        .max()
}
