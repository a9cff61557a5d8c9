//! Shareable palette links: `ff0000-00ff00-0000ff` path segments

use super::MAX_COLORS;
use crate::color::{self, Color};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("share link is empty")]
    Empty,
    #[error("share link has {0} colors (max {MAX_COLORS})")]
    TooMany(usize),
    #[error("invalid color in share link: {0:?}")]
    InvalidColor(String),
    #[error("share link is not valid UTF-8 after decoding")]
    Encoding,
}

pub fn encode<S: AsRef<str>>(hexes: &[S]) -> String {
    hexes
        .iter()
        .map(|h| {
            let h = h.as_ref();
            h.strip_prefix('#').unwrap_or(h).to_ascii_lowercase()
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub fn encode_colors(colors: &[Color]) -> String {
    let hexes: Vec<&str> = colors.iter().map(|c| c.hex.as_str()).collect();
    encode(&hexes)
}

/// Full link under `base`, e.g. `https://huewave.app/palette/ff0000-00ff00`.
pub fn share_url(base: &str, colors: &[Color]) -> String {
    format!("{}/{}", base.trim_end_matches('/'), encode_colors(colors))
}

/// Decode a segment (or a whole URL, whose last path segment is used) into
/// canonical `#RRGGBB` strings. Every token must be exactly six hex digits.
pub fn decode(input: &str) -> Result<Vec<String>, ShareError> {
    let trimmed = input.trim().trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let segment = urlencoding::decode(segment).map_err(|_| ShareError::Encoding)?;
    if segment.is_empty() {
        return Err(ShareError::Empty);
    }

    let tokens: Vec<&str> = segment.split('-').collect();
    if tokens.len() > MAX_COLORS {
        return Err(ShareError::TooMany(tokens.len()));
    }

    tokens
        .into_iter()
        .map(|token| {
            let candidate = format!("#{token}");
            if color::is_strict_hex(&candidate) {
                Ok(candidate.to_ascii_uppercase())
            } else {
                Err(ShareError::InvalidColor(token.to_string()))
            }
        })
        .collect()
}
