//! The script run against popup content on every resize tick.

use crx_common::{Color, Size};
use serde_json::Value;

/// Forces the document background to `background`, then reports the
/// rendered size of the root element as `[width, height]`, or `undefined`
/// while the document is not ready.
pub fn measurement_script(background: Color) -> String {
    format!(
        "document && document.documentElement ? document.documentElement.style.backgroundColor = '{}' : undefined;\
         document.head && document.head.parentElement ? [document.head.parentElement.offsetWidth, document.head.parentElement.offsetHeight] : undefined",
        background.to_hex()
    )
}

/// Read a probe result. Anything but two positive finite numbers is a miss.
pub fn parse_measurement(value: Option<&Value>) -> Option<Size> {
    let values = value?.as_array()?;
    let [width, height] = values.as_slice() else {
        return None;
    };
    let width = width.as_f64()?;
    let height = height.as_f64()?;
    let usable = |v: f64| v.is_finite() && v > 0.0;
    (usable(width) && usable(height)).then(|| Size::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn script_sets_background_and_measures_root() {
        let script = measurement_script(Color::WHITE);
        assert!(script.contains("backgroundColor = '#ffffff'"));
        assert!(script.contains("offsetWidth"));
        assert!(script.contains("offsetHeight"));
    }

    #[test]
    fn parses_width_and_height() {
        assert_eq!(
            parse_measurement(Some(&json!([250, 150]))),
            Some(Size::new(250.0, 150.0))
        );
        assert_eq!(
            parse_measurement(Some(&json!([320.5, 90.25]))),
            Some(Size::new(320.5, 90.25))
        );
    }

    #[test]
    fn misses_are_none() {
        assert_eq!(parse_measurement(None), None);
        assert_eq!(parse_measurement(Some(&Value::Null)), None);
        assert_eq!(parse_measurement(Some(&json!("250x150"))), None);
        assert_eq!(parse_measurement(Some(&json!([250]))), None);
        assert_eq!(parse_measurement(Some(&json!([250, 150, 1]))), None);
        assert_eq!(parse_measurement(Some(&json!([0, 150]))), None);
        assert_eq!(parse_measurement(Some(&json!(["a", "b"]))), None);
    }
}
