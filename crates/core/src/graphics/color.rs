//! Colour literals and channel access.
//!
//! Colors are held in ARGB8888 format (0xAARRGGBB), which is also the order of
//! the `#AARRGGBB` literals found in palette files.

pub struct ColorOps;

impl ColorOps {
    /// Parse a colour literal.
    ///
    /// Accepts `#AARRGGBB` and the opaque shorthand `#RRGGBB`, hex digits in
    /// either case, surrounding whitespace ignored. Anything else is `None`.
    ///
    /// ```
    /// use lsmap_core::graphics::ColorOps;
    ///
    /// assert_eq!(ColorOps::parse_hex("#ff112233"), Some(0xFF112233));
    /// assert_eq!(ColorOps::parse_hex("#112233"), Some(0xFF112233));
    /// assert_eq!(ColorOps::parse_hex("112233"), None);
    /// ```
    pub fn parse_hex(literal: &str) -> Option<u32> {
        let digits = literal.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            8 => Some(value),
            6 => Some(0xFF000000 | value),
            _ => None,
        }
    }

    /// Format as a lowercase `#aarrggbb` literal.
    pub fn to_hex(color: u32) -> String {
        format!("#{:08x}", color)
    }

    #[inline]
    pub fn alpha(color: u32) -> u8 {
        (color >> 24) as u8
    }

    #[inline]
    pub fn red(color: u32) -> u8 {
        (color >> 16) as u8
    }

    #[inline]
    pub fn green(color: u32) -> u8 {
        (color >> 8) as u8
    }

    #[inline]
    pub fn blue(color: u32) -> u8 {
        color as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_component_extraction() {
        let color = 0xAABBCCDD; // A=0xAA, R=0xBB, G=0xCC, B=0xDD

        assert_eq!(ColorOps::alpha(color), 0xAA);
        assert_eq!(ColorOps::red(color), 0xBB);
        assert_eq!(ColorOps::green(color), 0xCC);
        assert_eq!(ColorOps::blue(color), 0xDD);
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(ColorOps::parse_hex("#11223344"), Some(0x11223344));
        assert_eq!(ColorOps::parse_hex("#FFccCCcc"), Some(0xFFCCCCCC));
        assert_eq!(ColorOps::parse_hex("  #ff000000\r"), Some(0xFF000000));
        // Short form is opaque
        assert_eq!(ColorOps::parse_hex("#00ff00"), Some(0xFF00FF00));
    }

    #[test]
    fn test_parse_hex_rejects_malformed() {
        assert_eq!(ColorOps::parse_hex(""), None);
        assert_eq!(ColorOps::parse_hex("#"), None);
        assert_eq!(ColorOps::parse_hex("ff112233"), None);
        assert_eq!(ColorOps::parse_hex("#ff11223"), None);
        assert_eq!(ColorOps::parse_hex("#ff1122334"), None);
        assert_eq!(ColorOps::parse_hex("#gg112233"), None);
        assert_eq!(ColorOps::parse_hex("#+f112233"), None);
    }

    #[test]
    fn test_to_hex_roundtrip() {
        assert_eq!(ColorOps::to_hex(0x88FF0000), "#88ff0000");
        assert_eq!(ColorOps::parse_hex(&ColorOps::to_hex(0x01020304)), Some(0x01020304));
    }
}
