use colored::Color;

pub const PRIMARY: Color = Color::TrueColor { r: 94, g: 186, b: 255 };
pub const ACCENT: Color = Color::TrueColor { r: 255, g: 196, b: 87 };
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::TrueColor { r: 210, g: 210, b: 210 };
pub const IPV4_ADDR: Color = Color::TrueColor { r: 120, g: 220, b: 140 };
pub const PORT: Color = Color::TrueColor { r: 230, g: 140, b: 230 };
pub const DEVICE_TYPE: Color = Color::TrueColor { r: 255, g: 160, b: 110 };
