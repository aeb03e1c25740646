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

//! Text pagination
//!
//! Splits a message into page-sized fragments by bisecting over the word
//! boundaries of the remaining text and asking the height oracle whether each
//! candidate prefix fits the current page.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, TomeError};
use crate::oracle::{HeightOracle, PagePosition};

const EXCERPT_CHARS: usize = 32;

/// One printable slice of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFragment {
    pub text: String,
    pub position: PagePosition,
    /// Whitespace consumed at the cut after this fragment, `None` for the last one.
    pub separator: Option<char>,
}

/// Rebuild the original message from its fragments.
pub fn rejoin(fragments: &[PageFragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        out.push_str(&fragment.text);
        if let Some(separator) = fragment.separator {
            out.push(separator);
        }
    }
    out
}

/// Byte range of a cut: the fragment ends at `end`, the next one starts at `resume`.
#[derive(Debug, Clone, Copy)]
struct Cut {
    end: usize,
    resume: usize,
}

pub struct Paginator<'a> {
    oracle: &'a dyn HeightOracle,
}

impl<'a> Paginator<'a> {
    pub fn new(oracle: &'a dyn HeightOracle) -> Self {
        Self { oracle }
    }

    /// Split `message` into fragments that each fit their page.
    ///
    /// Returns no fragments for an empty message. Fails with
    /// [`TomeError::UnsplittableText`] when not even the first word of the
    /// remaining text fits a page.
    pub async fn paginate(&self, message: &str) -> Result<Vec<PageFragment>> {
        let mut fragments = Vec::new();
        let mut remaining = message;

        while !remaining.is_empty() {
            let position = PagePosition::from_index(fragments.len());
            let cut = self.fit(remaining, position, fragments.len()).await?;

            let separator = remaining[cut.end..cut.resume].chars().next();
            fragments.push(PageFragment {
                text: remaining[..cut.end].to_string(),
                position,
                separator,
            });
            remaining = &remaining[cut.resume..];
        }

        Ok(fragments)
    }

    /// Find the longest word-boundary prefix of `remaining` that fits a page.
    async fn fit(&self, remaining: &str, position: PagePosition, page: usize) -> Result<Cut> {
        let ceiling = position.ceiling_px();

        let height = self.oracle.measure(remaining, position).await?;
        if height <= ceiling {
            return Ok(Cut {
                end: remaining.len(),
                resume: remaining.len(),
            });
        }

        let boundaries: Vec<Cut> = remaining
            .char_indices()
            .filter(|(idx, ch)| *idx > 0 && ch.is_whitespace())
            .map(|(idx, ch)| Cut {
                end: idx,
                resume: idx + ch.len_utf8(),
            })
            .collect();

        // `fitting` counts the boundaries known to fit; only measured cuts move it.
        let mut fitting = 0;
        let mut upper = boundaries.len();
        while fitting < upper {
            let mid = fitting + (upper - fitting) / 2;
            let candidate = &remaining[..boundaries[mid].end];
            let height = self.oracle.measure(candidate, position).await?;
            trace!(page, mid, height, ceiling, "probed cut");
            if height <= ceiling {
                fitting = mid + 1;
            } else {
                upper = mid;
            }
        }

        if fitting == 0 {
            return Err(TomeError::UnsplittableText {
                page,
                excerpt: remaining.chars().take(EXCERPT_CHARS).collect(),
            });
        }
        Ok(boundaries[fitting - 1])
    }
}
