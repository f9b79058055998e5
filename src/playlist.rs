use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum PlaylistError {
    #[error("entry \"{0}\" not found in playlist")]
    EntryNotFound(String),
    #[error("entry \"{0}\" has no URL line")]
    MissingUrlLine(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    /// The entry already carried this URL; the file was not rewritten.
    Unchanged,
    Updated {
        old: String,
        new: String,
    },
}

const EXTINF: &str = "#EXTINF:";

fn line_body(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// Index of the URL line belonging to the `#EXTINF` directive that names
/// `entry_name`. The URL is the next non-blank, non-directive line.
fn find_url_line(lines: &[&str], entry_name: &str) -> Result<usize, PlaylistError> {
    let suffix = format!(",{}", entry_name);

    let idx_extinf = lines
        .iter()
        .position(|l| {
            let l = line_body(l);
            l.starts_with(EXTINF) && l.ends_with(suffix.as_str())
        })
        .ok_or_else(|| PlaylistError::EntryNotFound(entry_name.to_string()))?;

    lines[idx_extinf + 1..]
        .iter()
        .position(|l| {
            let l = line_body(l).trim();
            !l.is_empty() && !l.starts_with('#')
        })
        .map(|offset| idx_extinf + 1 + offset)
        .ok_or_else(|| PlaylistError::MissingUrlLine(entry_name.to_string()))
}

/// Replaces the URL of the playlist entry named `entry_name` with
/// `new_url`, leaving every other line byte-for-byte intact. The file is
/// only rewritten when the URL actually changed.
pub fn patch_entry(
    path: &Path,
    entry_name: &str,
    new_url: &str,
) -> Result<PatchOutcome, PlaylistError> {
    let content = std::fs::read_to_string(path)?;
    let mut lines: Vec<&str> = content.split_inclusive('\n').collect();

    let idx_url = find_url_line(&lines, entry_name)?;
    let old = line_body(lines[idx_url]).to_string();
    if old == new_url {
        return Ok(PatchOutcome::Unchanged);
    }

    // Keep the original line terminator (if any)
    let terminator = lines[idx_url][old.len()..].to_string();
    let replacement = format!("{}{}", new_url, terminator);
    lines[idx_url] = &replacement;

    std::fs::write(path, lines.concat())?;

    Ok(PatchOutcome::Updated {
        old,
        new: new_url.to_string(),
    })
}
