//! # Layout Table
//!
//! Fixed mapping from a layout name to the column widths it implies. This
//! table is the only place that knows how many columns a layout has; the
//! factories, redistribution and validation all read from it.

use crate::error::DocumentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named column layout for a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutName {
    #[default]
    #[serde(rename = "100")]
    Full,
    #[serde(rename = "50-50")]
    Halves,
    #[serde(rename = "60-40")]
    SixtyForty,
    #[serde(rename = "40-60")]
    FortySixty,
    #[serde(rename = "70-30")]
    SeventyThirty,
    #[serde(rename = "30-70")]
    ThirtySeventy,
    #[serde(rename = "33-33-33")]
    Thirds,
    #[serde(rename = "50-25-25")]
    HalfQuarterQuarter,
    #[serde(rename = "25-50-25")]
    QuarterHalfQuarter,
    #[serde(rename = "25-25-50")]
    QuarterQuarterHalf,
    #[serde(rename = "25-25-25-25")]
    Quarters,
}

impl LayoutName {
    pub const ALL: [LayoutName; 11] = [
        LayoutName::Full,
        LayoutName::Halves,
        LayoutName::SixtyForty,
        LayoutName::FortySixty,
        LayoutName::SeventyThirty,
        LayoutName::ThirtySeventy,
        LayoutName::Thirds,
        LayoutName::HalfQuarterQuarter,
        LayoutName::QuarterHalfQuarter,
        LayoutName::QuarterQuarterHalf,
        LayoutName::Quarters,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutName::Full => "100",
            LayoutName::Halves => "50-50",
            LayoutName::SixtyForty => "60-40",
            LayoutName::FortySixty => "40-60",
            LayoutName::SeventyThirty => "70-30",
            LayoutName::ThirtySeventy => "30-70",
            LayoutName::Thirds => "33-33-33",
            LayoutName::HalfQuarterQuarter => "50-25-25",
            LayoutName::QuarterHalfQuarter => "25-50-25",
            LayoutName::QuarterQuarterHalf => "25-25-50",
            LayoutName::Quarters => "25-25-25-25",
        }
    }

    /// Column widths in percent, left to right
    pub fn widths(self) -> &'static [f64] {
        match self {
            LayoutName::Full => &[100.0],
            LayoutName::Halves => &[50.0, 50.0],
            LayoutName::SixtyForty => &[60.0, 40.0],
            LayoutName::FortySixty => &[40.0, 60.0],
            LayoutName::SeventyThirty => &[70.0, 30.0],
            LayoutName::ThirtySeventy => &[30.0, 70.0],
            LayoutName::Thirds => &[33.33, 33.33, 33.34],
            LayoutName::HalfQuarterQuarter => &[50.0, 25.0, 25.0],
            LayoutName::QuarterHalfQuarter => &[25.0, 50.0, 25.0],
            LayoutName::QuarterQuarterHalf => &[25.0, 25.0, 50.0],
            LayoutName::Quarters => &[25.0, 25.0, 25.0, 25.0],
        }
    }

    pub fn column_count(self) -> usize {
        self.widths().len()
    }
}

impl fmt::Display for LayoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LayoutName {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayoutName::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| DocumentError::UnknownLayout(s.to_string()))
    }
}

pub fn get_column_widths(layout: LayoutName) -> &'static [f64] {
    layout.widths()
}

pub fn get_column_count(layout: LayoutName) -> usize {
    layout.column_count()
}
