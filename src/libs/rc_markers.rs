//! # RC File Markers
//!
//! Pure text transforms for the PATH export block we add to a shell rc file.
//!
//! The block is a [`MarkerPair`]: a sentinel comment line immediately followed by
//! an `export PATH=...` line. [`apply_marker`] appends the pair when the export
//! line is missing and [`remove_marker`] takes it back out. Neither function
//! touches the filesystem.
//!
//! For any `content` that is empty or ends in a newline,
//! `remove_marker(&apply_marker(content, p), p) == content`.

use std::path::Path;

/// Sentinel comment that owns the export line below it.
/// Kept identical to what earlier installer releases wrote so their blocks are still cleaned up.
pub const EXPORT_MARK: &str = "# added by install_epm.py";

/// The two lines we own in an rc file, always added and removed together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    /// Sentinel comment, [`EXPORT_MARK`].
    pub mark: String,
    /// `export PATH="<bin_dir>:$PATH"`.
    pub export_line: String,
}

impl MarkerPair {
    /// The pair that puts `bin_dir` in front of `$PATH`.
    pub fn for_bin_dir(bin_dir: &Path) -> Self {
        MarkerPair {
            mark: EXPORT_MARK.to_string(),
            export_line: format!("export PATH=\"{}:$PATH\"", bin_dir.display()),
        }
    }
}

/// Appends the marker pair unless the export line already appears anywhere in `content`.
///
/// The appended text is `"\n<mark>\n<export>\n"`, so a file that ends in a newline
/// gets one blank separator line before the block. Files that already use CRLF
/// line endings get `\r\n` instead.
pub fn apply_marker(content: &str, pair: &MarkerPair) -> String {
    if content.contains(&pair.export_line) {
        return content.to_string();
    }
    let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
    format!("{content}{eol}{}{eol}{}{eol}", pair.mark, pair.export_line)
}

/// Removes every occurrence of the marker pair from `content`.
///
/// A sentinel line only counts when the very next line is our export line
/// (both compared after trimming). A blank line directly before a removed pair
/// is dropped too, since [`apply_marker`] put it there. Lone sentinels, lone
/// export lines and everything else survive byte for byte, line endings included.
pub fn remove_marker(content: &str, pair: &MarkerPair) -> String {
    // Each segment keeps its own terminator (`\n`, `\r\n`, or none on the last line).
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let is_pair = lines[i].trim() == pair.mark
            && lines
                .get(i + 1)
                .is_some_and(|next| next.trim() == pair.export_line);

        if is_pair {
            if kept.last().is_some_and(|prev| prev.trim().is_empty()) {
                kept.pop();
            }
            i += 2;
            continue;
        }

        kept.push(lines[i]);
        i += 1;
    }

    kept.concat()
}
