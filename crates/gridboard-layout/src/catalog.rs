//! Size catalog: the closed set of widget size variants.
//!
//! Widgets render one discrete layout variant per [`SizeLabel`], so not every
//! numeric span is valid. Requests for a span outside the catalog resolve to
//! the nearest entry rather than failing.
//!
//! Labels read `COLSxROWS`: `"3x2"` is three columns wide and two rows tall.
//!
//! # Nearest match
//!
//! Columns are clamped to `[1, min(columns, 4)]` and rows to `[1, 4]`. Among
//! entries that fit the column limit, the winner minimizes Manhattan distance
//! to the requested span, then prefers the larger area, then catalog order.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use gridboard_core::geometry::GridDelta;
use serde::{Deserialize, Serialize};

/// Tallest span the catalog offers.
pub const MAX_CATALOG_ROWS: u32 = 4;
/// Widest span the catalog offers.
pub const MAX_CATALOG_COLS: u32 = 4;

/// A widget span in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub cols: u32,
    pub rows: u32,
}

impl Span {
    #[must_use]
    pub const fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols * self.rows
    }
}

/// Declared widget size, serialized as its `"CxR"` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum SizeLabel {
    S1x1,
    S2x1,
    S1x2,
    S2x2,
    S3x1,
    S1x3,
    S3x2,
    S2x3,
    S3x3,
    S4x1,
    S4x2,
    S1x4,
    S2x4,
}

impl SizeLabel {
    /// Every catalog entry, in catalog order.
    pub const ALL: [SizeLabel; 13] = [
        SizeLabel::S1x1,
        SizeLabel::S2x1,
        SizeLabel::S1x2,
        SizeLabel::S2x2,
        SizeLabel::S3x1,
        SizeLabel::S1x3,
        SizeLabel::S3x2,
        SizeLabel::S2x3,
        SizeLabel::S3x3,
        SizeLabel::S4x1,
        SizeLabel::S4x2,
        SizeLabel::S1x4,
        SizeLabel::S2x4,
    ];

    #[must_use]
    pub const fn span(self) -> Span {
        match self {
            Self::S1x1 => Span::new(1, 1),
            Self::S2x1 => Span::new(2, 1),
            Self::S1x2 => Span::new(1, 2),
            Self::S2x2 => Span::new(2, 2),
            Self::S3x1 => Span::new(3, 1),
            Self::S1x3 => Span::new(1, 3),
            Self::S3x2 => Span::new(3, 2),
            Self::S2x3 => Span::new(2, 3),
            Self::S3x3 => Span::new(3, 3),
            Self::S4x1 => Span::new(4, 1),
            Self::S4x2 => Span::new(4, 2),
            Self::S1x4 => Span::new(1, 4),
            Self::S2x4 => Span::new(2, 4),
        }
    }

    #[inline]
    #[must_use]
    pub const fn cols(self) -> u32 {
        self.span().cols
    }

    #[inline]
    #[must_use]
    pub const fn rows(self) -> u32 {
        self.span().rows
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S1x1 => "1x1",
            Self::S2x1 => "2x1",
            Self::S1x2 => "1x2",
            Self::S2x2 => "2x2",
            Self::S3x1 => "3x1",
            Self::S1x3 => "1x3",
            Self::S3x2 => "3x2",
            Self::S2x3 => "2x3",
            Self::S3x3 => "3x3",
            Self::S4x1 => "4x1",
            Self::S4x2 => "4x2",
            Self::S1x4 => "1x4",
            Self::S2x4 => "2x4",
        }
    }

    /// Exact catalog lookup.
    #[must_use]
    pub fn from_span(cols: u32, rows: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| label.span() == Span::new(cols, rows))
    }

    /// Parse any `CxR` string and snap it to the nearest catalog entry.
    ///
    /// Only garbled input fails; `"4x4"` or `"9x0"` resolve to the closest
    /// variant under [`MAX_CATALOG_COLS`] columns.
    pub fn normalize(input: &str) -> Result<Self, SizeLabelParseError> {
        let (cols, rows) = parse_dims(input)?;
        Ok(label_of(cols, rows, MAX_CATALOG_COLS))
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: the string must name a catalog entry.
impl FromStr for SizeLabel {
    type Err = SizeLabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cols, rows) = parse_dims(s)?;
        Self::from_span(cols, rows).ok_or(SizeLabelParseError::NotInCatalog { cols, rows })
    }
}

/// Lenient conversion used when deserializing stored layouts.
impl TryFrom<String> for SizeLabel {
    type Error = SizeLabelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl From<SizeLabel> for &'static str {
    fn from(label: SizeLabel) -> Self {
        label.as_str()
    }
}

/// Failure to read a size label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeLabelParseError {
    /// Not of the form `<cols>x<rows>`.
    Malformed { input: String },
    /// Well-formed, but the catalog has no such variant.
    NotInCatalog { cols: u32, rows: u32 },
}

impl fmt::Display for SizeLabelParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { input } => {
                write!(f, "malformed size label {input:?} (expected e.g. \"2x1\")")
            }
            Self::NotInCatalog { cols, rows } => {
                write!(f, "size {cols}x{rows} is not a catalog variant")
            }
        }
    }
}

impl std::error::Error for SizeLabelParseError {}

fn parse_dims(input: &str) -> Result<(u32, u32), SizeLabelParseError> {
    let malformed = || SizeLabelParseError::Malformed {
        input: input.to_owned(),
    };
    let trimmed = input.trim();
    let (cols, rows) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(malformed)?;
    let cols = cols.trim().parse::<u32>().map_err(|_| malformed())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| malformed())?;
    Ok((cols, rows))
}

/// Span of a label.
#[inline]
#[must_use]
pub const fn span_of(label: SizeLabel) -> Span {
    label.span()
}

/// Nearest catalog label for a raw span on a grid `columns` wide.
#[must_use]
pub fn label_of(cols: u32, rows: u32, columns: u32) -> SizeLabel {
    let col_limit = columns.clamp(1, MAX_CATALOG_COLS);
    let want = Span::new(cols.clamp(1, col_limit), rows.clamp(1, MAX_CATALOG_ROWS));

    if let Some(exact) = SizeLabel::from_span(want.cols, want.rows) {
        return exact;
    }

    SizeLabel::ALL
        .into_iter()
        .enumerate()
        .filter(|(_, label)| label.cols() <= col_limit)
        .min_by_key(|(idx, label)| {
            let span = label.span();
            let distance = span.cols.abs_diff(want.cols) + span.rows.abs_diff(want.rows);
            (distance, Reverse(span.area()), *idx)
        })
        .map_or(SizeLabel::S1x1, |(_, label)| label)
}

/// Apply a cell delta to a label's span and resolve it back to the catalog.
///
/// Columns clamp to `[1, columns]`, rows to `[1, MAX_CATALOG_ROWS]`.
#[must_use]
pub fn next_size_from_delta(current: SizeLabel, delta: GridDelta, columns: u32) -> SizeLabel {
    let columns = columns.max(1);
    let cols = (i64::from(current.cols()) + i64::from(delta.cols)).clamp(1, i64::from(columns));
    let rows = (i64::from(current.rows()) + i64::from(delta.rows))
        .clamp(1, i64::from(MAX_CATALOG_ROWS));
    // Both values are within u32 range after clamping.
    label_of(cols as u32, rows as u32, columns)
}

/// Narrow a label so it fits a grid `columns` wide; unchanged if it already fits.
#[must_use]
pub fn fit_to_columns(label: SizeLabel, columns: u32) -> SizeLabel {
    if label.cols() <= columns.max(1) {
        label
    } else {
        label_of(columns, label.rows(), columns)
    }
}
