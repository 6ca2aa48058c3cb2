use std::fmt::Display;

/// Record `field` as out of bounds unless `min <= value <= max`. NaN is
/// always out of bounds.
pub(crate) fn check_bounds<T>(errors: &mut Vec<String>, field: &str, value: T, min: T, max: T)
where
    T: PartialOrd + Display,
{
    if !(value >= min && value <= max) {
        errors.push(format!("{field} must be between {min} and {max}, got {value}"));
    }
}

pub(crate) fn check_not_empty(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} must not be empty"));
    }
}
