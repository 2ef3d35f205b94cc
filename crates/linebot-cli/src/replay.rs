//! Centroid replay files for `linebot run --script`.
//!
//! One centroid per line.  Blank lines and `#` comments are skipped, and a
//! status line captured from an earlier run (`<centroid>,<control>`) is read
//! by its first field, so recorded logs can be fed straight back in.

use std::fs;
use std::path::Path;

use linebot_types::LineBotError;

/// Parse replay text into a centroid sequence.
pub fn parse_centroids(text: &str) -> Result<Vec<i32>, LineBotError> {
    let mut centroids = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let field = line.split(',').next().unwrap_or(line).trim();
        let centroid = field.parse::<i32>().map_err(|e| LineBotError::InvalidScript {
            line: idx + 1,
            reason: format!("'{field}' is not a centroid: {e}"),
        })?;
        centroids.push(centroid);
    }
    if centroids.is_empty() {
        return Err(LineBotError::EmptyScript);
    }
    Ok(centroids)
}

/// Read and parse a replay file.
pub fn load_centroids(path: &Path) -> Result<Vec<i32>, LineBotError> {
    let text = fs::read_to_string(path).map_err(|e| {
        LineBotError::Config(format!("Failed to read script at {}: {}", path.display(), e))
    })?;
    parse_centroids(&text)
}
