//! CSS color parsing and light/dark classification.
//!
//! Background and foreground directives accept any CSS-ish color notation:
//! `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(...)`, `rgba(...)`, or a named color.
//! A value that fails to parse is not an error for the caller; directive
//! owners fall back to treating the raw string as an asset reference.

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness on the YIQ scale (0..=255).
    pub fn brightness(&self) -> u32 {
        (u32::from(self.r) * 299 + u32::from(self.g) * 587 + u32::from(self.b) * 114) / 1000
    }

    /// Whether the color reads as light against dark text.
    ///
    /// Threshold 128 on the YIQ brightness scale.
    pub fn is_light(&self) -> bool {
        self.brightness() >= 128
    }
}

/// Parse a CSS color string. Returns `None` when the value is not a color.
pub fn parse(input: &str) -> Option<Rgb> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(hex) = input.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = input.to_ascii_lowercase();
    if lower.starts_with("rgb(") || lower.starts_with("rgba(") {
        return parse_rgb_function(&lower);
    }

    named(&lower)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 | 4 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).unwrap() as u8);
            let r = digits.next()?;
            let g = digits.next()?;
            let b = digits.next()?;
            Some(Rgb::new(r * 17, g * 17, b * 17))
        }
        6 | 8 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

fn parse_rgb_function(lower: &str) -> Option<Rgb> {
    let open = lower.find('(')?;
    let close = lower.rfind(')')?;
    if close <= open {
        return None;
    }

    let mut channels = lower[open + 1..close]
        .split(',')
        .map(|part| part.trim().parse::<f32>());

    let r = channels.next()?.ok()?;
    let g = channels.next()?.ok()?;
    let b = channels.next()?.ok()?;

    if !(0.0..=255.0).contains(&r) || !(0.0..=255.0).contains(&g) || !(0.0..=255.0).contains(&b) {
        return None;
    }

    Some(Rgb::new(r as u8, g as u8, b as u8))
}

/// CSS named colors recognized by the directive surface.
///
/// The basic CSS keywords plus the handful of extended names that show up in
/// real presentations. Unknown names fall through to the image heuristic.
fn named(name: &str) -> Option<Rgb> {
    let (r, g, b) = match name {
        "black" => (0x00, 0x00, 0x00),
        "silver" => (0xc0, 0xc0, 0xc0),
        "gray" | "grey" => (0x80, 0x80, 0x80),
        "white" => (0xff, 0xff, 0xff),
        "maroon" => (0x80, 0x00, 0x00),
        "red" => (0xff, 0x00, 0x00),
        "purple" => (0x80, 0x00, 0x80),
        "fuchsia" | "magenta" => (0xff, 0x00, 0xff),
        "green" => (0x00, 0x80, 0x00),
        "lime" => (0x00, 0xff, 0x00),
        "olive" => (0x80, 0x80, 0x00),
        "yellow" => (0xff, 0xff, 0x00),
        "navy" => (0x00, 0x00, 0x80),
        "blue" => (0x00, 0x00, 0xff),
        "teal" => (0x00, 0x80, 0x80),
        "aqua" | "cyan" => (0x00, 0xff, 0xff),
        "orange" => (0xff, 0xa5, 0x00),
        "gold" => (0xff, 0xd7, 0x00),
        "pink" => (0xff, 0xc0, 0xcb),
        "brown" => (0xa5, 0x2a, 0x2a),
        "coral" => (0xff, 0x7f, 0x50),
        "crimson" => (0xdc, 0x14, 0x3c),
        "indigo" => (0x4b, 0x00, 0x82),
        "ivory" => (0xff, 0xff, 0xf0),
        "khaki" => (0xf0, 0xe6, 0x8c),
        "lavender" => (0xe6, 0xe6, 0xfa),
        "salmon" => (0xfa, 0x80, 0x72),
        "tan" => (0xd2, 0xb4, 0x8c),
        "tomato" => (0xff, 0x63, 0x47),
        "turquoise" => (0x40, 0xe0, 0xd0),
        "violet" => (0xee, 0x82, 0xee),
        _ => return None,
    };
    Some(Rgb::new(r, g, b))
}
