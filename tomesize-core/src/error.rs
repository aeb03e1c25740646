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

//! Error types for the pagination and allocation engine.

use thiserror::Error;

/// Errors raised by a height oracle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("height oracle unavailable: {0}")]
    Unavailable(String),

    #[error("invalid height oracle response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while estimating a tome size.
#[derive(Debug, Error)]
pub enum TomeError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// No word boundary prefix fits the page, e.g. a single word taller than a page.
    #[error("text cannot be split to fit page {page} (starting with {excerpt:?})")]
    UnsplittableText { page: usize, excerpt: String },

    #[error("ceremony content of {ceremony_pages} pages does not fit the first volume (max {max})")]
    CeremonyOverflow { ceremony_pages: u32, max: u32 },

    #[error("page count overflow adding {added} pages to {pages}")]
    PageCountOverflow { pages: u32, added: u32 },

    #[error("no size code for {volumes} volume(s) with a total of {total} pages")]
    Unclassifiable { volumes: usize, total: u32 },
}

pub type Result<T> = std::result::Result<T, TomeError>;
