//! Filename sanitization
//!
//! Reduces a user-supplied filename to a portable basename that can be
//! joined onto the storage root.

use crate::error::InvalidNameError;

/// Characters treated as path separators on every platform.
pub const SEPARATORS: [char; 2] = ['/', '\\'];

/// Longest name most filesystems accept for a single component.
const MAX_NAME_BYTES: usize = 255;

const WINDOWS_DEVICE_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Sanitize a filename down to a safe basename.
///
/// Only the final path component survives. Whitespace becomes `_`, anything
/// outside `[A-Za-z0-9._-]` is dropped, and leading dots are stripped so the
/// result can never be `.`, `..` or a hidden file.
pub fn sanitize(raw_name: &str) -> Result<String, InvalidNameError> {
    let base = raw_name.rsplit(SEPARATORS).next().unwrap_or(raw_name);

    let filtered: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() => Some(c),
            '.' | '-' | '_' => Some(c),
            c if c.is_ascii_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let trimmed = filtered
        .trim_start_matches(['.', '_'])
        .trim_end_matches('.');

    if trimmed.is_empty() {
        return Err(InvalidNameError::Empty);
    }

    let name = if is_device_name(trimmed) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    };
    let name = truncate_keeping_extension(name);

    if name.contains(SEPARATORS) {
        return Err(InvalidNameError::ContainsSeparator(name));
    }

    Ok(name)
}

/// Shortens `name` to `MAX_NAME_BYTES`, cutting the stem so the final
/// extension survives.
fn truncate_keeping_extension(mut name: String) -> String {
    if name.len() <= MAX_NAME_BYTES {
        return name;
    }

    // Everything left is ASCII, so any byte index is a char boundary.
    match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot < MAX_NAME_BYTES / 2 => {
            let extension = name.split_off(dot);
            name.truncate(MAX_NAME_BYTES - extension.len());
            name.push_str(&extension);
            name
        }
        _ => {
            name.truncate(MAX_NAME_BYTES);
            name
        }
    }
}

fn is_device_name(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or(name);
    WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| device.eq_ignore_ascii_case(stem))
}
