use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, TintError};

/// A parsed hex color, remembering the text it was written as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorLiteral {
    pub rgb: (u8, u8, u8),
    /// Trimmed input, case and prefix untouched. Used for output names.
    pub original: String,
}

impl FromStr for ColorLiteral {
    type Err = TintError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex_literal(s)
    }
}

impl fmt::Display for ColorLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Convert a hex literal like "0xRRGGBB", "0XRRGGBB" or "RRGGBB" into (r, g, b)
pub fn parse_hex_literal(input: &str) -> Result<ColorLiteral> {
    let original = input.trim();
    let lowered = original.to_lowercase();
    let hex = lowered.strip_prefix("0x").unwrap_or(&lowered);

    let invalid = |reason: &str| TintError::InvalidColorFormat {
        input: original.to_string(),
        reason: reason.to_string(),
    };

    if hex.len() != 6 {
        return Err(invalid("expected exactly 6 hex digits"));
    }

    // from_str_radix tolerates a leading '+', so check the digits up front
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("contains non-hex characters"));
    }

    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid("invalid red value"))?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid("invalid green value"))?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid("invalid blue value"))?;

    Ok(ColorLiteral {
        rgb: (r, g, b),
        original: original.to_string(),
    })
}

/// Output path for a pair: `{dir}/{stem}_{literal}.png`
pub fn force_png_path(dir: &Path, stem: &str, color: &ColorLiteral) -> PathBuf {
    dir.join(format!("{}_{}.png", stem, color.original))
}

pub fn resolve_full_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();

    // Expand ~ on Unix-like systems
    #[cfg(unix)]
    if let Some(path_str) = path.to_str() {
        if path_str == "~" || path_str.starts_with("~/") {
            if let Some(home) = dirs::home_dir() {
                let stripped = path_str.trim_start_matches('~').trim_start_matches('/');
                p = home.join(stripped);
            }
        }
    }

    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}
