//! Typed extraction of width constraints from string metadata JSON.
//!
//! Each value is read from a prioritized list of field paths. The first path
//! that holds a valid value wins; invalid values fall through to the next path.

use serde_json::Value;

use crate::measurement::FontSpec;
use crate::qa::StringConstraint;

/// Custom field first, then the legacy top-level key.
pub const MAX_WIDTH_PATHS: &[&[&str]] = &[&["fields", "widthpx"], &["MaxWidthPixel"]];
pub const FONT_PATHS: &[&[&str]] = &[&["fields", "font"], &["Font"]];
pub const FONT_SIZE_PATHS: &[&[&str]] = &[&["fields", "fontsize"], &["FontSize"]];

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// Positive integer from a JSON number or numeric string.
fn as_positive_int(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() || number.fract() != 0.0 || number < 1.0 || number > u32::MAX as f64 {
        return None;
    }
    Some(number as u32)
}

fn as_non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

pub fn first_positive_int(value: &Value, paths: &[&[&str]]) -> Option<u32> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(as_positive_int))
}

pub fn first_non_empty_str<'a>(value: &'a Value, paths: &[&[&str]]) -> Option<&'a str> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(as_non_empty_str))
}

/// Build a constraint from string metadata; `None` when no width limit is set.
pub fn parse_constraint(
    string_id: u64,
    value: &Value,
    defaults: &FontSpec,
) -> Option<StringConstraint> {
    let max_width_pixels = first_positive_int(value, MAX_WIDTH_PATHS)?;
    let font = first_non_empty_str(value, FONT_PATHS)
        .map(str::to_string)
        .unwrap_or_else(|| defaults.family.clone());
    let font_size = first_positive_int(value, FONT_SIZE_PATHS).unwrap_or(defaults.size);

    Some(StringConstraint {
        string_id,
        max_width_pixels,
        font,
        font_size,
    })
}
