mod color;
mod core;

pub use self::core::*;
pub use color::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_clone_and_equality() {
        let r = Rect::new(10.0, 20.0, 800.0, 600.0);
        let r2 = r;
        assert_eq!(r, r2);
    }

    #[test]
    fn rect_size() {
        let r = Rect::new(100.0, 200.0, 800.0, 600.0);
        assert_eq!(r.size(), Size::new(800.0, 600.0));
    }

    #[test]
    fn rect_center_of_smaller_size() {
        let screen = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let p = screen.center_of(Size::new(100.0, 100.0));
        assert!((p.x - 910.0).abs() < f64::EPSILON);
        assert!((p.y - 490.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rect_serialization() {
        let r = Rect::new(0.0, 0.0, 1920.0, 1080.0);
        let json = serde_json::to_string(&r).unwrap();
        let deserialized: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(r, deserialized);
    }

    #[test]
    fn color_from_hex_6() {
        let c = Color::from_hex("#ff8800").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 255));
    }

    #[test]
    fn color_from_hex_8() {
        let c = Color::from_hex("#ff880080").unwrap();
        assert_eq!(c, Color::from_rgba(255, 136, 0, 128));
    }

    #[test]
    fn color_from_hex_no_hash() {
        let c = Color::from_hex("00ff00").unwrap();
        assert_eq!(c, Color::from_rgba(0, 255, 0, 255));
    }

    #[test]
    fn color_from_hex_invalid() {
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#abc").is_none());
        assert!(Color::from_hex("").is_none());
    }

    #[test]
    fn color_white_constant_matches_hex() {
        assert_eq!(Color::from_hex("#FFFFFF"), Some(Color::WHITE));
        assert_eq!(Color::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn color_to_hex_with_alpha() {
        let c = Color::from_rgba(1, 2, 3, 4);
        assert_eq!(c.to_hex(), "#01020304");
    }

    #[test]
    fn color_as_tuple() {
        let c = Color::from_rgba(10, 20, 30, 40);
        assert_eq!(c.as_tuple(), (10, 20, 30, 40));
    }
}
