//! Canonical artifact filenames

use crate::range::Codepoint;

/// Number of hex digits in a filename; enough for `U+10FFFF`
const HEX_WIDTH: usize = 6;

/// Maps codepoints to artifact filenames and back
///
/// Filenames have the form `<prefix><hex>.<extension>`, where `<hex>` is the
/// codepoint as six zero-padded lowercase hex digits (`u004e00.html`). The
/// fixed width makes lexicographic filename order identical to numeric
/// codepoint order, which the integrity audit relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNaming {
    prefix: String,
    extension: String,
}

impl ArtifactNaming {
    /// Creates a naming scheme with the given prefix and extension (no dot)
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            extension: extension.into(),
        }
    }

    /// Returns the canonical filename for `codepoint`
    pub fn file_name(&self, codepoint: Codepoint) -> String {
        format!(
            "{}{:0width$x}.{}",
            self.prefix,
            codepoint.value(),
            self.extension,
            width = HEX_WIDTH
        )
    }

    /// Parses a filename produced by [`ArtifactNaming::file_name`]
    ///
    /// Returns `None` for anything that is not exactly a canonical name,
    /// including uppercase or unpadded hex.
    pub fn parse(&self, file_name: &str) -> Option<Codepoint> {
        let hex = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;

        let canonical = hex.len() == HEX_WIDTH
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !canonical {
            return None;
        }

        u32::from_str_radix(hex, 16).ok().map(Codepoint)
    }
}

impl Default for ArtifactNaming {
    fn default() -> Self {
        Self::new("u", "html")
    }
}
