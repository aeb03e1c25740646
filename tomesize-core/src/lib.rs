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

//! Tomesize Core
//!
//! Pagination and volume allocation engine for printed memorial books: text
//! messages are split into pages with a height oracle, page counts are packed
//! into bound volumes and the volumes are mapped to a size code.

pub mod allocate;
pub mod classify;
pub mod content;
pub mod counter;
pub mod error;
pub mod estimate;
pub mod oracle;
pub mod paginate;

pub use allocate::{
    allocate, volume_count, CapacityBand, VolumeDescriptor, FRONT_MATTER_PAGES,
    MAX_CEREMONY_PAGES,
};
pub use classify::{classify, SizeCode};
pub use content::{Category, ContentItem, ContentList, CountingMode, ImageRef};
pub use counter::{CategoryCount, ContentCount, ContentTotals, ItemPages, PageCounter};
pub use error::{OracleError, Result, TomeError};
pub use estimate::{estimate, estimate_detailed, SizeEstimate};
pub use oracle::{
    GlyphMetrics, GlyphMetricsOracle, HeightOracle, PagePosition, CONTINUATION_CEILING_PX,
    FIRST_PAGE_CEILING_PX,
};
pub use paginate::{rejoin, PageFragment, Paginator};
