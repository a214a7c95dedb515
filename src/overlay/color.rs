/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

const COLORS: [Color; 20] = [
    Color::rgb(255, 99, 71),
    Color::rgb(60, 179, 113),
    Color::rgb(65, 105, 225),
    Color::rgb(255, 215, 0),
    Color::rgb(238, 130, 238),
    Color::rgb(64, 224, 208),
    Color::rgb(255, 165, 0),
    Color::rgb(154, 205, 50),
    Color::rgb(135, 206, 250),
    Color::rgb(255, 182, 193),
    Color::rgb(210, 180, 140),
    Color::rgb(127, 255, 212),
    Color::rgb(221, 160, 221),
    Color::rgb(240, 230, 140),
    Color::rgb(100, 149, 237),
    Color::rgb(250, 128, 114),
    Color::rgb(144, 238, 144),
    Color::rgb(255, 218, 185),
    Color::rgb(176, 196, 222),
    Color::rgb(218, 165, 32),
];

/// Deterministic class-id -> colour mapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct Palette;

impl Palette {
    pub fn new() -> Self {
        Self
    }

    /// Colour for `class_id`. Negative ids wrap around from the end.
    pub fn color_for(&self, class_id: i32) -> Color {
        COLORS[class_id.rem_euclid(COLORS.len() as i32) as usize]
    }

    pub fn len(&self) -> usize {
        COLORS.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
