use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Unique identifier for a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

/// Identifier for a skeletal-runtime animation track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u32);

/// A sound cue emitted by stage logic, resolved by the sound service.
/// Fire and forget: nothing in the core waits on playback.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub name: String,
    pub volume: f32,
}

impl SoundCue {
    pub fn new(name: impl Into<String>, volume: f32) -> Self {
        Self {
            name: name.into(),
            volume,
        }
    }
}

/// Packed 0xRRGGBB color, the same numeric form the host compositor takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

/// Raised when a user-supplied color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color string {input:?}, expected \"#rrggbb\"")]
pub struct ColorParseError {
    pub input: String,
}

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);
    /// Default torso fill when a record carries no body color.
    pub const BODY_DEFAULT: Color = Color(0x87cefa);
    /// Default head fill when a record carries no face color.
    pub const FACE_DEFAULT: Color = Color(0xffe0bd);

    /// Parse a CSS-style hex string. A leading `#` is optional.
    pub fn from_hex(input: &str) -> Result<Color, ColorParseError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError {
                input: input.to_string(),
            });
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError {
            input: input.to_string(),
        })?;
        Ok(Color(value))
    }

    /// Render back to the `#rrggbb` form used by attribute forms.
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }

    /// Red/green/blue channels as floats in [0, 1].
    pub fn channels(self) -> [f32; 3] {
        [
            ((self.0 >> 16) & 0xff) as f32 / 255.0,
            ((self.0 >> 8) & 0xff) as f32 / 255.0,
            (self.0 & 0xff) as f32 / 255.0,
        ]
    }
}

// Character records travel as JSON, where colors are hex strings.
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Color::from_hex("#ff6b6b").unwrap(), Color(0xff6b6b));
        assert_eq!(Color::from_hex("87cefa").unwrap(), Color(0x87cefa));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::from_hex("#ff6b").is_err());
        assert!(Color::from_hex("not-a-color").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
    }

    #[test]
    fn hex_round_trip() {
        let c = Color::from_hex("#00ff7f").unwrap();
        assert_eq!(c.to_hex(), "#00ff7f");
    }

    #[test]
    fn channels_are_normalized() {
        let [r, g, b] = Color::WHITE.channels();
        assert_eq!((r, g, b), (1.0, 1.0, 1.0));
        let [r, _, _] = Color(0x800000).channels();
        assert!((r - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color(0xff0000)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, Color(0x00ff00));
    }
}
