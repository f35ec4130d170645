/// A colour, expressed in RGB, CMYK, or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Create a new colour in the Gray space, g ranges from 0 to 255
    pub fn new_grey_bytes(g: u8) -> Colour {
        Colour::Grey {
            g: g as f32 / 255.0,
        }
    }

    /// Quantize the colour back to 8-bit RGB. CMYK is converted naively, without
    /// any colour profile
    pub fn to_rgb_bytes(&self) -> (u8, u8, u8) {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match *self {
            Colour::RGB { r, g, b } => (q(r), q(g), q(b)),
            Colour::CMYK { c, m, y, k } => (
                q((1.0 - c) * (1.0 - k)),
                q((1.0 - m) * (1.0 - k)),
                q((1.0 - y) * (1.0 - k)),
            ),
            Colour::Grey { g } => (q(g), q(g), q(g)),
        }
    }

    pub(crate) fn set_fill(&self, content: &mut pdf_writer::Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_fill_gray(g),
        };
    }

    pub(crate) fn set_stroke(&self, content: &mut pdf_writer::Content) {
        match *self {
            Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_stroke_gray(g),
        };
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour::new_rgb_bytes(c.0, c.1, c.2)
    }
}

impl From<[u8; 3]> for Colour {
    fn from(c: [u8; 3]) -> Self {
        let [r, g, b] = c;
        Colour::new_rgb_bytes(r, g, b)
    }
}

/// A list of pre-defined colour constants, including the report palette
pub mod colours {
    use super::*;

    macro_rules! rgb {
        ($r:expr, $g:expr, $b:expr) => {
            Colour::RGB {
                r: $r as f32 / 255.0,
                g: $g as f32 / 255.0,
                b: $b as f32 / 255.0,
            }
        };
    }

    macro_rules! grey {
        ($g:expr) => {
            Colour::Grey {
                g: $g as f32 / 255.0,
            }
        };
    }

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };

    /// Report and page titles
    pub const TITLE: Colour = rgb!(102, 126, 234);
    /// Section headings
    pub const SUBTITLE: Colour = rgb!(118, 75, 162);
    /// Body copy
    pub const BODY: Colour = grey!(60);
    /// Bold labels in key / value lines and threat box titles
    pub const LABEL: Colour = grey!(40);
    /// Secondary text inside threat boxes
    pub const MUTED: Colour = grey!(80);
    /// Horizontal rules and table grid lines
    pub const RULE: Colour = grey!(200);
    /// Page footers
    pub const FOOTER: Colour = grey!(150);
    /// Table header background
    pub const TABLE_HEADER: Colour = rgb!(102, 126, 234);

    pub const SEVERITY_CRITICAL: Colour = rgb!(211, 47, 47);
    pub const SEVERITY_HIGH: Colour = rgb!(245, 124, 0);
    pub const SEVERITY_MEDIUM: Colour = rgb!(251, 192, 45);
    pub const SEVERITY_LOW: Colour = rgb!(56, 142, 60);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_colours_round_trip() {
        assert_eq!(colours::SEVERITY_HIGH.to_rgb_bytes(), (245, 124, 0));
        assert_eq!(colours::BODY.to_rgb_bytes(), (60, 60, 60));
        assert_eq!(Colour::from((1, 2, 3)).to_rgb_bytes(), (1, 2, 3));
    }

    #[test]
    fn cmyk_converts_naively() {
        let c = Colour::CMYK {
            c: 0.0,
            m: 0.0,
            y: 0.0,
            k: 1.0,
        };
        assert_eq!(c.to_rgb_bytes(), (0, 0, 0));
    }
}
