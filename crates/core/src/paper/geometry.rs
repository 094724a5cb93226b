//! Keyword tables and per-page geometry.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::PaperError;

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
}

impl Orientation {
    /// Returns the string representation of the orientation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    /// ISO A4, 210 x 297 mm.
    #[default]
    A4,
    /// ISO A5, 148 x 210 mm.
    A5,
    /// Folio, 215 x 330 mm.
    F4,
    /// US Letter, 8.5 x 11 in.
    Letter,
    /// US Legal, 8.5 x 14 in.
    Legal,
}

impl PaperSize {
    /// Parses a paper size keyword.
    ///
    /// # Errors
    ///
    /// Returns `PaperError::UnknownSize` for anything outside the table.
    pub fn parse(keyword: &str) -> Result<Self, PaperError> {
        match keyword.to_ascii_lowercase().as_str() {
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "f4" => Ok(Self::F4),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            _ => Err(PaperError::UnknownSize(keyword.to_string())),
        }
    }

    /// Returns the keyword for this size.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A4 => "a4",
            Self::A5 => "a5",
            Self::F4 => "f4",
            Self::Letter => "letter",
            Self::Legal => "legal",
        }
    }

    /// Portrait (width, height) in millimetres.
    #[must_use]
    pub fn dimensions_mm(&self) -> (Decimal, Decimal) {
        match self {
            Self::A4 => (Decimal::new(210, 0), Decimal::new(297, 0)),
            Self::A5 => (Decimal::new(148, 0), Decimal::new(210, 0)),
            Self::F4 => (Decimal::new(215, 0), Decimal::new(330, 0)),
            Self::Letter => (Decimal::new(2159, 1), Decimal::new(2794, 1)),
            Self::Legal => (Decimal::new(2159, 1), Decimal::new(3556, 1)),
        }
    }
}

/// Uniform page margin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Margin {
    /// 0 mm.
    None,
    /// 5 mm.
    Narrow,
    /// 10 mm.
    #[default]
    Normal,
    /// 20 mm.
    Wide,
}

impl Margin {
    /// Parses a margin keyword.
    ///
    /// # Errors
    ///
    /// Returns `PaperError::UnknownMargin` for anything outside the table.
    pub fn parse(keyword: &str) -> Result<Self, PaperError> {
        match keyword.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "narrow" => Ok(Self::Narrow),
            "normal" => Ok(Self::Normal),
            "wide" => Ok(Self::Wide),
            _ => Err(PaperError::UnknownMargin(keyword.to_string())),
        }
    }

    /// Returns the keyword for this margin.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Narrow => "narrow",
            Self::Normal => "normal",
            Self::Wide => "wide",
        }
    }

    /// Margin applied to every side, in millimetres.
    #[must_use]
    pub fn mm(&self) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::Narrow => Decimal::new(5, 0),
            Self::Normal => Decimal::new(10, 0),
            Self::Wide => Decimal::new(20, 0),
        }
    }
}

/// Physical geometry of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Sheet width in mm, after orientation.
    pub width_mm: Decimal,
    /// Sheet height in mm, after orientation.
    pub height_mm: Decimal,
    /// Margin on every side in mm.
    pub margin_mm: Decimal,
    /// Orientation the geometry was resolved for.
    pub orientation: Orientation,
}

impl PageGeometry {
    /// Resolves geometry for one page.
    #[must_use]
    pub fn resolve(paper: PaperSize, margin: Margin, orientation: Orientation) -> Self {
        let (short, long) = paper.dimensions_mm();
        let (width_mm, height_mm) = match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        };

        Self {
            width_mm,
            height_mm,
            margin_mm: margin.mm(),
            orientation,
        }
    }

    /// Printable (width, height) inside the margins, never negative.
    #[must_use]
    pub fn printable_mm(&self) -> (Decimal, Decimal) {
        let inset = self.margin_mm * Decimal::TWO;
        (
            (self.width_mm - inset).max(Decimal::ZERO),
            (self.height_mm - inset).max(Decimal::ZERO),
        )
    }
}
