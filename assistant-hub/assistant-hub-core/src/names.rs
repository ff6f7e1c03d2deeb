//! Validation for caller-supplied names that end up as path segments.
//!
//! Every assistant title, directory name, history id and uploaded file
//! name passes through here before it is joined onto the workspace root.
//! Titles and directories use a strict allow-list; uploaded files keep
//! whatever name the client gave them as long as it is one inert segment.

use crate::error::{Result, StoreError};
use std::path::PathBuf;

const MAX_NAME_LEN: usize = 255;
const EXTRA_CHARS: &[char] = &[' ', '-', '_', '.', ',', '(', ')', '+', '&', '\''];

/// Accept `name` as a single path segment or reject it.
pub fn validate_name(name: &str) -> Result<&str> {
    let well_formed = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && name.trim() == name
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || EXTRA_CHARS.contains(&c));
    if well_formed {
        Ok(name)
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Accept `name` as the final component of an uploaded file.
pub fn validate_file_name(name: &str) -> Result<&str> {
    let well_formed = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && !name.starts_with('.')
        && !name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control());
    if well_formed {
        Ok(name)
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Accept a `/`-separated relative path whose every segment is a valid name.
pub fn validate_relative(path: &str) -> Result<PathBuf> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName(path.to_string()));
    }
    let mut out = PathBuf::new();
    for segment in trimmed.split('/') {
        out.push(validate_name(segment)?);
    }
    Ok(out)
}
