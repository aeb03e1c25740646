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

//! Content items as delivered by the memories API.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Section of the book an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ceremony,
    Memory,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Ceremony => write!(f, "ceremony"),
            Category::Memory => write!(f, "memory"),
        }
    }
}

/// Opaque image reference. Only the number of images matters for pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub serde_json::Value);

/// A single tribute: a text message and its images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,

    #[serde(default)]
    pub images: Vec<ImageRef>,
}

impl ContentItem {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, count: usize) -> Self {
        self.images = (0..count)
            .map(|i| ImageRef(serde_json::Value::from(i)))
            .collect();
        self
    }

    pub fn has_text(&self) -> bool {
        !self.message.is_empty()
    }

    pub fn image_pages(&self) -> u32 {
        u32::try_from(self.images.len()).unwrap_or(u32::MAX)
    }
}

/// Items of a collection grouped by category (`?byCategory=true`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentList {
    #[serde(default)]
    pub ceremony: Vec<ContentItem>,

    #[serde(default)]
    pub memory: Vec<ContentItem>,
}

impl ContentList {
    pub fn items(&self, category: Category) -> &[ContentItem] {
        match category {
            Category::Ceremony => &self.ceremony,
            Category::Memory => &self.memory,
        }
    }
}

/// How text messages are turned into pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountingMode {
    /// One page per non-empty message, no oracle calls.
    #[default]
    Approximate,
    /// Paginate every message through the height oracle.
    Accurate,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
