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

//! Content page counting

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::{Category, ContentItem, ContentList, CountingMode};
use crate::error::{Result, TomeError};
use crate::oracle::HeightOracle;
use crate::paginate::{PageFragment, Paginator};

/// Page totals per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTotals {
    pub ceremony_pages: u32,
    pub memory_pages: u32,
}

impl ContentTotals {
    pub fn new(ceremony_pages: u32, memory_pages: u32) -> Self {
        Self {
            ceremony_pages,
            memory_pages,
        }
    }

    pub fn content_pages(&self) -> Result<u32> {
        add_pages(self.ceremony_pages, self.memory_pages)
    }
}

/// `pages + added`, failing instead of wrapping.
pub(crate) fn add_pages(pages: u32, added: u32) -> Result<u32> {
    pages
        .checked_add(added)
        .ok_or(TomeError::PageCountOverflow { pages, added })
}

/// Pages contributed by a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPages {
    pub category: Category,
    pub index: usize,
    pub text_pages: u32,
    pub image_pages: u32,
    /// Fragments of the message, only filled in accurate mode.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fragments: Vec<PageFragment>,
}

impl ItemPages {
    pub fn pages(&self) -> Result<u32> {
        add_pages(self.text_pages, self.image_pages)
    }
}

/// Count of one category with its per-item breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub pages: u32,
    pub items: Vec<ItemPages>,
}

/// Count of a whole content list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCount {
    pub ceremony: CategoryCount,
    pub memory: CategoryCount,
}

impl ContentCount {
    pub fn totals(&self) -> ContentTotals {
        ContentTotals::new(self.ceremony.pages, self.memory.pages)
    }
}

/// Turns content items into page counts.
pub struct PageCounter<'a> {
    paginator: Paginator<'a>,
    mode: CountingMode,
}

impl<'a> PageCounter<'a> {
    pub fn new(oracle: &'a dyn HeightOracle, mode: CountingMode) -> Self {
        Self {
            paginator: Paginator::new(oracle),
            mode,
        }
    }

    pub fn mode(&self) -> CountingMode {
        self.mode
    }

    /// Count both categories of a list, ceremony first.
    pub async fn count_list(&self, list: &ContentList) -> Result<ContentCount> {
        let ceremony = self.count_category(Category::Ceremony, &list.ceremony).await?;
        let memory = self.count_category(Category::Memory, &list.memory).await?;
        Ok(ContentCount { ceremony, memory })
    }

    /// Count the items of one category, one oracle call at a time.
    pub async fn count_category(
        &self,
        category: Category,
        items: &[ContentItem],
    ) -> Result<CategoryCount> {
        let mut count = CategoryCount::default();
        for (index, item) in items.iter().enumerate() {
            let pages = self.count_item(category, index, item).await?;
            count.pages = add_pages(count.pages, pages.pages()?)?;
            count.items.push(pages);
        }
        debug!(%category, items = items.len(), pages = count.pages, "counted category");
        Ok(count)
    }

    async fn count_item(
        &self,
        category: Category,
        index: usize,
        item: &ContentItem,
    ) -> Result<ItemPages> {
        let mut pages = ItemPages {
            category,
            index,
            text_pages: 0,
            image_pages: item.image_pages(),
            fragments: Vec::new(),
        };

        if item.has_text() {
            match self.mode {
                CountingMode::Approximate => pages.text_pages = 1,
                CountingMode::Accurate => {
                    let fragments = self.paginator.paginate(&item.message).await?;
                    debug!(
                        %category,
                        index,
                        chars = item.message.chars().count(),
                        fragments = fragments.len(),
                        "paginated message"
                    );
                    pages.text_pages = u32::try_from(fragments.len()).unwrap_or(u32::MAX);
                    pages.fragments = fragments;
                }
            }
        }

        Ok(pages)
    }
}
