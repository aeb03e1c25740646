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

//! Full size estimation: count, allocate, classify.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::allocate::{allocate, VolumeDescriptor};
use crate::classify::{classify, SizeCode};
use crate::content::{ContentList, CountingMode};
use crate::counter::{ContentCount, ContentTotals, PageCounter};
use crate::error::Result;
use crate::oracle::HeightOracle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEstimate {
    pub totals: ContentTotals,
    pub volumes: Vec<VolumeDescriptor>,
    pub size: SizeCode,
}

impl SizeEstimate {
    /// Allocate and classify already counted totals.
    pub fn from_totals(totals: ContentTotals) -> Result<Self> {
        let volumes = allocate(totals)?;
        let size = classify(&volumes)?;
        Ok(Self {
            totals,
            volumes,
            size,
        })
    }

    pub fn total_pages(&self) -> u32 {
        self.volumes.iter().map(|v| v.total).sum()
    }
}

/// Estimate the size of a content list, returning the per-item count as well.
pub async fn estimate_detailed(
    list: &ContentList,
    oracle: &dyn HeightOracle,
    mode: CountingMode,
) -> Result<(SizeEstimate, ContentCount)> {
    let count = PageCounter::new(oracle, mode).count_list(list).await?;
    let estimate = SizeEstimate::from_totals(count.totals())?;

    info!(
        oracle = oracle.name(),
        ?mode,
        ceremony_pages = estimate.totals.ceremony_pages,
        memory_pages = estimate.totals.memory_pages,
        volumes = estimate.volumes.len(),
        size = %estimate.size,
        "estimated tome size"
    );

    Ok((estimate, count))
}

/// Estimate the size of a content list.
pub async fn estimate(
    list: &ContentList,
    oracle: &dyn HeightOracle,
    mode: CountingMode,
) -> Result<SizeEstimate> {
    estimate_detailed(list, oracle, mode)
        .await
        .map(|(estimate, _)| estimate)
}
