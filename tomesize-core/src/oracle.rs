// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Height oracle abstraction.
//!
//! An oracle reports the rendered pixel height of a text fragment laid out in
//! the print style of the book. Calls may be slow (a real renderer sits behind
//! them) and are never cached by the engine.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OracleError;

/// Maximum height of the first page of a message.
pub const FIRST_PAGE_CEILING_PX: u32 = 493;

/// Maximum height of every continuation page.
pub const CONTINUATION_CEILING_PX: u32 = 548;

/// Where a fragment sits within its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePosition {
    First,
    Continuation,
}

impl PagePosition {
    /// Position of the fragment with the given zero-based index.
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            PagePosition::First
        } else {
            PagePosition::Continuation
        }
    }

    pub fn is_first(self) -> bool {
        matches!(self, PagePosition::First)
    }

    pub fn ceiling_px(self) -> u32 {
        match self {
            PagePosition::First => FIRST_PAGE_CEILING_PX,
            PagePosition::Continuation => CONTINUATION_CEILING_PX,
        }
    }
}

/// Trait for height measurement backends
#[async_trait]
pub trait HeightOracle: Send + Sync {
    /// Rendered height in pixels of `text` placed at `position`.
    async fn measure(&self, text: &str, position: PagePosition) -> Result<u32, OracleError>;

    /// Whether `text` is taller than `threshold`, or the position's ceiling when none is given.
    async fn exceeds(
        &self,
        text: &str,
        position: PagePosition,
        threshold: Option<u32>,
    ) -> Result<bool, OracleError> {
        let height = self.measure(text, position).await?;
        Ok(height > threshold.unwrap_or_else(|| position.ceiling_px()))
    }

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Fixed glyph metrics of the print style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    #[serde(default = "default_column_width")]
    pub column_width_px: u32,

    #[serde(default = "default_glyph_width")]
    pub glyph_width_px: u32,

    #[serde(default = "default_space_width")]
    pub space_width_px: u32,

    #[serde(default = "default_line_height")]
    pub line_height_px: u32,
}

fn default_column_width() -> u32 {
    420
}

fn default_glyph_width() -> u32 {
    8
}

fn default_space_width() -> u32 {
    4
}

fn default_line_height() -> u32 {
    24
}

impl Default for GlyphMetrics {
    fn default() -> Self {
        Self {
            column_width_px: default_column_width(),
            glyph_width_px: default_glyph_width(),
            space_width_px: default_space_width(),
            line_height_px: default_line_height(),
        }
    }
}

/// Deterministic oracle that word-wraps text with fixed glyph metrics.
///
/// Hard newlines start a new line, whitespace runs collapse to a single
/// space, and a word wider than the column breaks over as many lines as it
/// needs. Height grows monotonically with the length of a prefix.
#[derive(Debug, Clone, Default)]
pub struct GlyphMetricsOracle {
    metrics: GlyphMetrics,
}

impl GlyphMetricsOracle {
    pub fn new(metrics: GlyphMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &GlyphMetrics {
        &self.metrics
    }

    /// Number of laid out lines for `text`.
    pub fn line_count(&self, text: &str) -> u64 {
        if text.is_empty() {
            return 0;
        }
        text.split('\n').map(|line| self.wrapped_lines(line)).sum()
    }

    pub fn height_px(&self, text: &str) -> u32 {
        let height = self.line_count(text) * u64::from(self.metrics.line_height_px);
        u32::try_from(height).unwrap_or(u32::MAX)
    }

    fn wrapped_lines(&self, line: &str) -> u64 {
        let column = u64::from(self.metrics.column_width_px.max(1));
        let glyph = u64::from(self.metrics.glyph_width_px);
        let space = u64::from(self.metrics.space_width_px);

        let mut lines = 1u64;
        let mut used = 0u64;
        for word in line.split_whitespace() {
            let width = word.chars().count() as u64 * glyph;
            if used > 0 && used + space + width <= column {
                used += space + width;
                continue;
            }
            if used > 0 {
                lines += 1;
            }
            // a word wider than the column spills onto extra lines
            let spans = width.div_ceil(column).max(1);
            lines += spans - 1;
            used = width - (spans - 1) * column;
        }
        lines
    }
}

#[async_trait]
impl HeightOracle for GlyphMetricsOracle {
    async fn measure(&self, text: &str, _position: PagePosition) -> Result<u32, OracleError> {
        Ok(self.height_px(text))
    }

    fn name(&self) -> &str {
        "glyph-metrics"
    }
}
