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

//! Volume allocation
//!
//! Packs ceremony and memory pages into bound volumes. Every volume reserves
//! front matter, is padded with notes pages up to the smallest capacity band
//! that holds its content, and overflow memory pages carry over to the next
//! volume.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::counter::{add_pages, ContentTotals};
use crate::error::{Result, TomeError};

/// Cover, blank, imprint and closing page.
pub const FRONT_MATTER_PAGES: u32 = 4;

/// Section divider in front of the ceremony pages.
pub const CEREMONY_DIVIDER_PAGES: u32 = 2;

/// Section divider in front of the notes pages.
pub const NOTES_DIVIDER_PAGES: u32 = 1;

/// Content pages per volume used to size a collection with ceremony pages.
pub const PAGES_PER_VOLUME_WITH_CEREMONY: u32 = 182;

/// Content pages per volume used to size a collection without ceremony pages.
pub const PAGES_PER_VOLUME: u32 = 183;

/// Largest ceremony that fits the first volume next to its front matter.
pub const MAX_CEREMONY_PAGES: u32 =
    CapacityBand::Large.pages() - FRONT_MATTER_PAGES - CEREMONY_DIVIDER_PAGES;

/// Page counts a bound volume can be printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityBand {
    Small,
    Medium,
    Large,
}

impl CapacityBand {
    pub const fn pages(self) -> u32 {
        match self {
            CapacityBand::Small => 54,
            CapacityBand::Medium => 94,
            CapacityBand::Large => 188,
        }
    }

    /// Smallest band holding `pages`, if any.
    pub fn fitting(pages: u32) -> Option<Self> {
        [CapacityBand::Small, CapacityBand::Medium, CapacityBand::Large]
            .into_iter()
            .find(|band| pages <= band.pages())
    }
}

/// Page composition of one physical volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeDescriptor {
    pub front_matter_pages: u32,
    pub ceremony_pages: u32,
    pub notes_pages: u32,
    pub memory_pages: u32,
    pub total: u32,
}

/// Number of volumes needed for `totals`, at least one.
pub fn volume_count(totals: ContentTotals) -> Result<u32> {
    let count = if totals.ceremony_pages > 0 {
        totals
            .content_pages()?
            .div_ceil(PAGES_PER_VOLUME_WITH_CEREMONY)
    } else {
        totals.memory_pages.div_ceil(PAGES_PER_VOLUME)
    };
    Ok(count.max(1))
}

/// Split `totals` into volumes.
///
/// Only the first volume carries ceremony pages. The third volume onward keeps
/// no front matter and no notes, even though its band padding is computed
/// with them.
pub fn allocate(totals: ContentTotals) -> Result<Vec<VolumeDescriptor>> {
    if totals.ceremony_pages > MAX_CEREMONY_PAGES {
        return Err(TomeError::CeremonyOverflow {
            ceremony_pages: totals.ceremony_pages,
            max: MAX_CEREMONY_PAGES,
        });
    }

    let count = volume_count(totals)?;
    let mut volumes = Vec::new();
    let mut remaining_memory = totals.memory_pages;

    for index in 0..count {
        let ceremony = if index == 0 { totals.ceremony_pages } else { 0 };
        let volume = build_volume(index, ceremony, remaining_memory)?;
        debug!(index, ?volume, "allocated volume");

        remaining_memory -= volume.memory_pages;
        volumes.push(volume);
    }

    Ok(volumes)
}

fn build_volume(
    index: u32,
    ceremony_pages: u32,
    memory_pages: u32,
) -> Result<VolumeDescriptor> {
    let mut front = FRONT_MATTER_PAGES;
    if ceremony_pages > 0 {
        front += CEREMONY_DIVIDER_PAGES;
    }

    let provisional = add_pages(add_pages(front, ceremony_pages)?, memory_pages)?;
    let (mut front, mut notes, memory) = match CapacityBand::fitting(provisional) {
        Some(band) if provisional < CapacityBand::Large.pages() => {
            let mut notes = band.pages() - provisional;
            if notes > 0 {
                front += NOTES_DIVIDER_PAGES;
                notes -= NOTES_DIVIDER_PAGES;
            }
            let memory = band.pages() - (ceremony_pages + front + notes);
            (front, notes, memory)
        }
        // saturated: keep what fits, the rest carries over
        _ => {
            let memory = CapacityBand::Large.pages() - (ceremony_pages + front);
            (front, 0, memory)
        }
    };

    if index > 1 {
        front = 0;
        notes = 0;
    }

    Ok(VolumeDescriptor {
        front_matter_pages: front,
        ceremony_pages,
        notes_pages: notes,
        memory_pages: memory,
        total: front + ceremony_pages + notes + memory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(front: u32, ceremony: u32, notes: u32, memory: u32) -> VolumeDescriptor {
        VolumeDescriptor {
            front_matter_pages: front,
            ceremony_pages: ceremony,
            notes_pages: notes,
            memory_pages: memory,
            total: front + ceremony + notes + memory,
        }
    }

    #[test]
    fn test_band_lookup() {
        assert_eq!(CapacityBand::fitting(0), Some(CapacityBand::Small));
        assert_eq!(CapacityBand::fitting(54), Some(CapacityBand::Small));
        assert_eq!(CapacityBand::fitting(55), Some(CapacityBand::Medium));
        assert_eq!(CapacityBand::fitting(94), Some(CapacityBand::Medium));
        assert_eq!(CapacityBand::fitting(188), Some(CapacityBand::Large));
        assert_eq!(CapacityBand::fitting(189), None);
        assert_eq!(MAX_CEREMONY_PAGES, 182);
    }

    #[test]
    fn test_volume_count() {
        assert_eq!(volume_count(ContentTotals::new(0, 0)).unwrap(), 1);
        assert_eq!(volume_count(ContentTotals::new(0, 183)).unwrap(), 1);
        assert_eq!(volume_count(ContentTotals::new(0, 184)).unwrap(), 2);
        assert_eq!(volume_count(ContentTotals::new(0, 400)).unwrap(), 3);
        assert_eq!(volume_count(ContentTotals::new(2, 180)).unwrap(), 1);
        assert_eq!(volume_count(ContentTotals::new(5, 180)).unwrap(), 2);
    }

    #[test]
    fn test_empty_collection_is_one_small_volume() {
        let volumes = allocate(ContentTotals::new(0, 0)).unwrap();
        assert_eq!(volumes, vec![volume(5, 0, 49, 0)]);
    }

    #[test]
    fn test_small_volume_is_padded_with_notes() {
        let volumes = allocate(ContentTotals::new(0, 40)).unwrap();
        assert_eq!(volumes, vec![volume(5, 0, 9, 40)]);
        assert_eq!(volumes[0].total, 54);
    }

    #[test]
    fn test_exact_band_needs_no_notes_divider() {
        let volumes = allocate(ContentTotals::new(0, 50)).unwrap();
        assert_eq!(volumes, vec![volume(4, 0, 0, 50)]);
    }

    #[test]
    fn test_ceremony_adds_divider_pages() {
        let volumes = allocate(ContentTotals::new(10, 70)).unwrap();
        // 4 + 2 + 10 + 70 = 86, padded to 94
        assert_eq!(volumes, vec![volume(7, 10, 7, 70)]);
        assert_eq!(volumes[0].total, 94);
    }

    #[test]
    fn test_large_band_one_short() {
        let volumes = allocate(ContentTotals::new(0, 183)).unwrap();
        assert_eq!(volumes, vec![volume(5, 0, 0, 183)]);
    }

    #[test]
    fn test_saturated_first_volume_carries_overflow() {
        let volumes = allocate(ContentTotals::new(5, 180)).unwrap();
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0], volume(6, 5, 0, 177));
        assert_eq!(volumes[0].total, 188);
        assert_eq!(volumes[1], volume(5, 0, 46, 3));
        assert_eq!(volumes[1].total, 54);
    }

    #[test]
    fn test_trailing_volume_may_be_empty_padding() {
        let volumes = allocate(ContentTotals::new(0, 184)).unwrap();
        assert_eq!(volumes, vec![volume(4, 0, 0, 184), volume(5, 0, 49, 0)]);
    }

    #[test]
    fn test_third_volume_drops_front_matter_and_notes() {
        let volumes = allocate(ContentTotals::new(0, 400)).unwrap();
        assert_eq!(
            volumes,
            vec![
                volume(4, 0, 0, 184),
                volume(4, 0, 0, 184),
                volume(0, 0, 0, 32),
            ]
        );
    }

    #[test]
    fn test_saturated_third_volume_keeps_front_matter_room() {
        // the third volume is sized with front matter, then stripped of it
        let volumes = allocate(ContentTotals::new(0, 560)).unwrap();
        assert_eq!(volumes.len(), 4);
        assert_eq!(volumes[2], volume(0, 0, 0, 184));
        assert_eq!(volumes[3], volume(0, 0, 0, 8));
        let memory: u32 = volumes.iter().map(|v| v.memory_pages).sum();
        assert_eq!(memory, 560);
    }

    #[test]
    fn test_largest_ceremony_fits() {
        let volumes = allocate(ContentTotals::new(MAX_CEREMONY_PAGES, 0)).unwrap();
        assert_eq!(volumes[0], volume(6, 182, 0, 0));
        assert_eq!(volumes[0].total, 188);
    }

    #[test]
    fn test_oversized_ceremony_is_rejected() {
        let err = allocate(ContentTotals::new(MAX_CEREMONY_PAGES + 1, 10)).unwrap_err();
        assert!(matches!(
            err,
            TomeError::CeremonyOverflow {
                ceremony_pages: 183,
                max: 182
            }
        ));
    }

    #[test]
    fn test_page_counts_near_u32_max_are_rejected() {
        let err = allocate(ContentTotals::new(1, u32::MAX)).unwrap_err();
        assert!(matches!(err, TomeError::PageCountOverflow { .. }));
        assert!(volume_count(ContentTotals::new(1, u32::MAX)).is_err());

        // no overflow in the volume count, but the first volume's sum wraps
        let err = allocate(ContentTotals::new(0, u32::MAX - 2)).unwrap_err();
        assert!(matches!(
            err,
            TomeError::PageCountOverflow {
                pages: 4,
                added
            } if added == u32::MAX - 2
        ));
    }
}
