use crate::color::{self, Color};
use crate::palette::MAX_COLORS;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPalette {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "de_colors")]
    pub colors: Vec<String>,
    #[serde(rename = "user_id", alias = "owner_id", deserialize_with = "de_id")]
    pub owner_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Body for create / update / stage requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDraft {
    pub name: String,
    #[serde(deserialize_with = "de_colors")]
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl PaletteDraft {
    pub fn new(name: impl Into<String>, colors: &[Color]) -> Self {
        Self {
            name: name.into(),
            colors: colors.iter().map(|c| c.hex.clone()).collect(),
        }
    }

    /// Field-level checks matching what the server rejects with a 400.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError {
                path: "name".into(),
                message: "Name is required".into(),
            });
        }
        if self.colors.is_empty() {
            errors.push(FieldError {
                path: "colors".into(),
                message: "At least one color is required".into(),
            });
        }
        if self.colors.len() > MAX_COLORS {
            errors.push(FieldError {
                path: "colors".into(),
                message: "Maximum 10 colors allowed".into(),
            });
        }
        for (i, hex) in self.colors.iter().enumerate() {
            if color::normalize_hex(hex).is_none() || !hex.trim().starts_with('#') {
                errors.push(FieldError {
                    path: format!("colors.{i}"),
                    message: "Invalid hex color format. Must be a valid hex color (e.g., #FF0000 or #F00)".into(),
                });
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Trimmed name and canonical `#RRGGBB` colors. Entries that do not parse are kept as-is
    /// so `validate` still reports them.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            colors: self
                .colors
                .iter()
                .map(|h| color::normalize_hex(h).unwrap_or_else(|| h.clone()))
                .collect(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(i64),
        Str(String),
    }
    Ok(match Id::deserialize(d)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}

// Stored palettes carry plain hex strings; palettes staged from the editor may carry
// `{hex, locked}` objects.
fn de_colors<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Hex(String),
        Swatch { hex: String },
    }
    Ok(Vec::<Entry>::deserialize(d)?
        .into_iter()
        .map(|e| match e {
            Entry::Hex(h) | Entry::Swatch { hex: h } => h,
        })
        .collect())
}
