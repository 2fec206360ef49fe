//! A minimal rich-text slot.
//!
//! A [`Slot`] owns its content and its [`Format`], and translates every
//! content edit into the matching format operation, in the order the
//! format engine expects: content first, then the range update.

use crate::core::{FormatValue, Formatter};
use crate::format::{Format, FormatLiteral, FormatTree, Formats};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An embedded object occupying one unit of the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub name: String,
    /// Block embeds break inline formats around them.
    #[serde(default)]
    pub block: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotItem {
    Char(char),
    Embed(Embed),
}

/// Content as serialized: runs of text and embeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentLiteral {
    Text(String),
    Embed(Embed),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotLiteral {
    pub content: Vec<ContentLiteral>,
    pub formats: FormatLiteral,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    items: Vec<SlotItem>,
    format: Format,
}

impl Slot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let items: Vec<SlotItem> = text.chars().map(SlotItem::Char).collect();
        let format = Format::new(items.len());
        Self { items, format }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[SlotItem] {
        &self.items
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Text content, with embeds shown as U+FFFC.
    pub fn to_plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| match item {
                SlotItem::Char(c) => *c,
                SlotItem::Embed(_) => '\u{fffc}',
            })
            .collect()
    }

    /// Inserts `text` at `index` and applies `formats` over the inserted span.
    ///
    /// Returns the number of units inserted.
    pub fn insert_text(
        &mut self,
        index: usize,
        text: &str,
        formats: &[(Formatter, Option<FormatValue>)],
    ) -> usize {
        let index = index.min(self.len());
        let chars: Vec<SlotItem> = text.chars().map(SlotItem::Char).collect();
        let count = chars.len();
        if count == 0 {
            return 0;
        }
        self.items.splice(index..index, chars);
        self.format.stretch(index, count);
        for (formatter, value) in formats {
            self.format
                .merge(formatter, index..index + count, value.clone(), false);
        }
        count
    }

    /// Inserts an embed at `index`.
    ///
    /// Block embeds split the inline formats around them; inline embeds
    /// extend them like text.
    pub fn insert_embed(&mut self, index: usize, embed: Embed) {
        let index = index.min(self.len());
        let block = embed.block;
        self.items.insert(index, SlotItem::Embed(embed));
        if block {
            self.format.split(index, 1);
        } else {
            self.format.stretch(index, 1);
        }
    }

    /// Deletes up to `count` units at `index` and returns how many were removed.
    pub fn delete(&mut self, index: usize, count: usize) -> usize {
        let index = index.min(self.len());
        let end = index.saturating_add(count).min(self.len());
        let removed = end - index;
        if removed == 0 {
            return 0;
        }
        self.items.drain(index..end);
        self.format.shrink(index, removed);
        removed
    }

    /// Applies a format. Block formatters ignore `range`.
    pub fn apply_format(
        &mut self,
        formatter: &Formatter,
        range: Range<usize>,
        value: Option<FormatValue>,
        background: bool,
    ) {
        self.format.merge(formatter, range, value, background);
    }

    pub fn remove_format(&mut self, formatter: &Formatter, range: Range<usize>) {
        self.format.discard(formatter, range.start, range.end);
    }

    /// Formats picked up by text typed at `index`.
    pub fn formats_at(&self, index: usize) -> Formats {
        self.format.extract_formats_by_index(index)
    }

    /// Moves `[start, end)` out into a new slot with rebased formats.
    pub fn cut(&mut self, start: usize, end: usize) -> Slot {
        let start = start.min(self.len());
        let end = end.clamp(start, self.len());
        let format = self.format.create_format_by_range(end - start, start, end);
        let items: Vec<SlotItem> = self.items.drain(start..end).collect();
        self.format.shrink(start, end - start);
        Slot { items, format }
    }

    pub fn to_tree(&self) -> FormatTree {
        self.format.to_tree(0, self.len())
    }

    pub fn to_json(&self) -> SlotLiteral {
        let mut content = Vec::new();
        let mut text = String::new();
        for item in &self.items {
            match item {
                SlotItem::Char(c) => text.push(*c),
                SlotItem::Embed(embed) => {
                    if !text.is_empty() {
                        content.push(ContentLiteral::Text(std::mem::take(&mut text)));
                    }
                    content.push(ContentLiteral::Embed(embed.clone()));
                }
            }
        }
        if !text.is_empty() {
            content.push(ContentLiteral::Text(text));
        }
        SlotLiteral {
            content,
            formats: self.format.to_json(),
        }
    }
}
