//! Notification request value types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(u32);

impl Rgb {
    /// Mask applied to every value so only the low 24 bits survive
    pub const MASK: u32 = 0x00FF_FFFF;

    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(((red as u32) << 16) | ((green as u32) << 8) | blue as u32)
    }

    pub const fn from_u32(value: u32) -> Self {
        Self(value & Self::MASK)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid color '{}': expected 6 hex digits", s));
        }
        u32::from_str_radix(hex, 16)
            .map(Self::from_u32)
            .map_err(|_| format!("Invalid color '{}': not hexadecimal", s))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// One notification to be shown on the display surface
///
/// Requests carry no identity: two requests with the same content are shown
/// twice.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    title: String,
    body: String,
    color: Option<Rgb>,
}

impl NotificationRequest {
    /// Create a request that uses the surface's default color
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            color: None,
        }
    }

    /// Create a request with an explicit color
    pub fn with_color(title: impl Into<String>, body: impl Into<String>, color: Rgb) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            color: Some(color),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    /// Color as the host's display script expects it: `-1` selects the default
    pub fn host_color(&self) -> i32 {
        self.color.map(|c| c.value() as i32).unwrap_or(-1)
    }
}
