//! The format engine owned by a slot.
//!
//! A [`Format`] maps each [`Formatter`] to a canonical list of ranges:
//! sorted, non-overlapping, adjacent equal values coalesced, never longer
//! than the slot. Edits to the slot are mirrored here through
//! [`Format::stretch`], [`Format::split`] and [`Format::shrink`]; format
//! application goes through [`Format::merge`] and [`Format::discard`].

use crate::core::tile::{self, Layer};
use crate::core::{
    FormatError, FormatItem, FormatRange, FormatValue, Formatter, FormatterRegistry,
};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;
use tracing::{debug, trace};

pub mod tree;

pub use tree::FormatTree;

/// JSON shape produced by [`Format::to_json`], keyed by formatter name.
pub type FormatLiteral = BTreeMap<String, Vec<FormatRange>>;

/// Formats active at a position.
pub type Formats = Vec<(Formatter, FormatValue)>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Format {
    len: usize,
    map: BTreeMap<Formatter, Vec<FormatRange>>,
}

impl Format {
    /// Creates an empty format for a slot of `len` units.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            map: BTreeMap::new(),
        }
    }

    /// Rebuilds a format from the shape produced by [`Format::to_json`].
    ///
    /// Ranges are merged one by one, so the result is canonical even if the
    /// literal overlaps or is unsorted. Block ranges are not checked: a block
    /// entry always covers the whole slot, and is `[0, 0)` in an empty one.
    pub fn from_literal(
        len: usize,
        literal: &FormatLiteral,
        registry: &FormatterRegistry,
    ) -> Result<Self, FormatError> {
        let mut format = Self::new(len);
        for (name, ranges) in literal {
            let formatter = registry
                .get(name)
                .ok_or_else(|| FormatError::UnknownFormatter(name.clone()))?;
            for range in ranges {
                if range.is_empty() && !formatter.is_block() {
                    return Err(FormatError::EmptyRange {
                        formatter: name.clone(),
                        start: range.start_index,
                        end: range.end_index,
                    });
                }
                format.merge(
                    formatter,
                    range.start_index..range.end_index,
                    Some(range.value.clone()),
                    false,
                );
            }
        }
        Ok(format)
    }

    /// Length of the slot this format describes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no formatter has any range.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, formatter: &Formatter) -> Option<&[FormatRange]> {
        self.map.get(formatter).map(Vec::as_slice)
    }

    pub fn has(&self, formatter: &Formatter) -> bool {
        self.map.contains_key(formatter)
    }

    pub fn formatters(&self) -> impl Iterator<Item = &Formatter> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Formatter, &[FormatRange])> {
        self.map
            .iter()
            .map(|(formatter, ranges)| (formatter, ranges.as_slice()))
    }

    /// Applies `value` to `formatter`.
    ///
    /// Inline formatters apply over `range`; block formatters ignore it and
    /// cover the whole slot. A `None` value removes formatting. With
    /// `background` the existing values win wherever both are present, and a
    /// block formatter that already has a value keeps it.
    pub fn merge(
        &mut self,
        formatter: &Formatter,
        range: Range<usize>,
        value: Option<FormatValue>,
        background: bool,
    ) -> &mut Self {
        trace!(formatter = %formatter, start = range.start, end = range.end, background, "merge");
        if formatter.is_block() {
            match value {
                None => {
                    self.map.remove(formatter);
                }
                Some(value) => {
                    if !background || !self.map.contains_key(formatter) {
                        self.map
                            .insert(formatter.clone(), vec![FormatRange::new(0, self.len, value)]);
                    }
                }
            }
            return self;
        }

        let start = range.start.min(self.len);
        let end = range.end.min(self.len);
        let normalized = match self.map.get(formatter) {
            None => {
                if let Some(value) = value {
                    if start < end {
                        self.map
                            .insert(formatter.clone(), vec![FormatRange::new(start, end, value)]);
                    }
                }
                return self;
            }
            Some(existing) => tile::normalize(
                background,
                existing,
                Some(Layer {
                    start,
                    end,
                    value: value.as_ref(),
                }),
                self.len,
            ),
        };
        self.store(formatter, normalized);
        self
    }

    /// Mirrors an insertion of `count` units at `index`.
    ///
    /// A range that ends at or after `index` grows; if it also starts at or
    /// after `index` it shifts instead.
    pub fn stretch(&mut self, index: usize, count: usize) -> &mut Self {
        trace!(index, count, "stretch");
        let index = index.min(self.len);
        let count = count.min(usize::MAX - self.len);
        self.len += count;
        let len = self.len;
        for (formatter, ranges) in self.map.iter_mut() {
            if formatter.is_block() {
                cover(ranges, len);
                continue;
            }
            for range in ranges.iter_mut() {
                if range.end_index < index {
                    continue;
                }
                range.end_index += count;
                if range.start_index >= index {
                    range.start_index += count;
                }
            }
        }
        self
    }

    /// Mirrors a split at `index` that opens `distance` unformatted units.
    ///
    /// Inline ranges covering `index` are cut in two around the gap; ranges
    /// after it shift by `distance`.
    pub fn split(&mut self, index: usize, distance: usize) -> &mut Self {
        trace!(index, distance, "split");
        let index = index.min(self.len);
        let distance = distance.min(usize::MAX - self.len);
        self.len += distance;
        let len = self.len;
        for (formatter, ranges) in self.map.iter_mut() {
            if formatter.is_block() {
                cover(ranges, len);
                continue;
            }
            if distance == 0 {
                continue;
            }
            let mut rebuilt = Vec::with_capacity(ranges.len() + 1);
            for mut range in ranges.drain(..) {
                if range.end_index <= index {
                    rebuilt.push(range);
                } else if range.start_index >= index {
                    range.start_index += distance;
                    range.end_index += distance;
                    rebuilt.push(range);
                } else {
                    rebuilt.push(FormatRange {
                        start_index: range.start_index,
                        end_index: index,
                        value: range.value.clone(),
                    });
                    range.start_index = index + distance;
                    range.end_index += distance;
                    rebuilt.push(range);
                }
            }
            *ranges = rebuilt;
        }
        self
    }

    /// Mirrors a deletion of `count` units starting at `start_index`.
    pub fn shrink(&mut self, start_index: usize, count: usize) -> &mut Self {
        trace!(start_index, count, "shrink");
        let removed = count.min(self.len.saturating_sub(start_index));
        self.len -= removed;
        let len = self.len;
        let formatters: Vec<Formatter> = self.map.keys().cloned().collect();
        for formatter in formatters {
            let Some(ranges) = self.map.get_mut(&formatter) else {
                continue;
            };
            if formatter.is_block() {
                cover(ranges, len);
                continue;
            }
            for range in ranges.iter_mut() {
                if range.end_index <= start_index {
                    continue;
                }
                range.end_index = range.end_index.saturating_sub(count).max(start_index);
                if range.start_index > start_index {
                    range.start_index = range.start_index.saturating_sub(count).max(start_index);
                }
            }
            let normalized = tile::normalize(false, ranges, None, len);
            self.store(&formatter, normalized);
        }
        self
    }

    /// Removes `formatter` from `[start_index, end_index)`.
    ///
    /// Block formatters cannot be partially removed: any non-empty overlap
    /// with the slot removes the whole entry.
    pub fn discard(
        &mut self,
        formatter: &Formatter,
        start_index: usize,
        end_index: usize,
    ) -> &mut Self {
        trace!(formatter = %formatter, start_index, end_index, "discard");
        let Some(existing) = self.map.get(formatter) else {
            return self;
        };
        if formatter.is_block() {
            if start_index < end_index && start_index < self.len {
                self.map.remove(formatter);
            }
            return self;
        }
        let normalized = tile::normalize(
            false,
            existing,
            Some(Layer {
                start: start_index,
                end: end_index,
                value: None,
            }),
            self.len,
        );
        self.store(formatter, normalized);
        self
    }

    /// Returns the parts of every range that intersect `[start_index, end_index)`.
    ///
    /// Positions are kept as they are in `self`.
    pub fn extract(&self, start_index: usize, end_index: usize) -> Format {
        let mut format = Format::new(self.len);
        for formatter in self.map.keys() {
            let ranges = self.extract_ranges_by_formatter(start_index, end_index, formatter);
            if !ranges.is_empty() {
                format.map.insert(formatter.clone(), ranges);
            }
        }
        format
    }

    /// Like [`Format::extract`], with positions rebased to `start_index`.
    ///
    /// The result describes a new slot of `len` units.
    pub fn create_format_by_range(&self, len: usize, start_index: usize, end_index: usize) -> Format {
        let mut format = Format::new(len);
        for formatter in self.map.keys() {
            let mut ranges = self.extract_ranges_by_formatter(start_index, end_index, formatter);
            if ranges.is_empty() {
                continue;
            }
            for range in &mut ranges {
                range.start_index -= start_index;
                range.end_index -= start_index;
            }
            format.map.insert(formatter.clone(), ranges);
        }
        format
    }

    pub fn extract_ranges_by_formatter(
        &self,
        start_index: usize,
        end_index: usize,
        formatter: &Formatter,
    ) -> Vec<FormatRange> {
        let Some(ranges) = self.map.get(formatter) else {
            return Vec::new();
        };
        ranges
            .iter()
            .filter_map(|range| {
                if range.start_index > end_index || range.end_index < start_index {
                    return None;
                }
                let start = range.start_index.max(start_index);
                let end = range.end_index.min(end_index);
                (start < end).then(|| FormatRange {
                    start_index: start,
                    end_index: end,
                    value: range.value.clone(),
                })
            })
            .collect()
    }

    /// Formats that a character typed at `index` would pick up.
    ///
    /// At index 0 these are the ranges starting at 0; elsewhere the ranges
    /// with `start_index < index <= end_index`.
    pub fn extract_formats_by_index(&self, index: usize) -> Formats {
        let mut formats = Vec::new();
        for (formatter, ranges) in &self.map {
            for range in ranges {
                let active = if index == 0 {
                    range.start_index == 0
                } else {
                    range.start_index < index && range.end_index >= index
                };
                if active {
                    formats.push((formatter.clone(), range.value.clone()));
                }
            }
        }
        formats
    }

    /// Sorted cut points between which formatting is uniform.
    pub fn to_grid(&self) -> Vec<usize> {
        let mut points = BTreeSet::from([0, self.len]);
        for ranges in self.map.values() {
            for range in ranges {
                points.insert(range.start_index);
                points.insert(range.end_index);
            }
        }
        points.into_iter().collect()
    }

    pub fn to_json(&self) -> FormatLiteral {
        self.map
            .iter()
            .map(|(formatter, ranges)| (formatter.name().to_string(), ranges.clone()))
            .collect()
    }

    pub fn to_array(&self) -> Vec<FormatItem> {
        self.map
            .iter()
            .flat_map(|(formatter, ranges)| {
                ranges.iter().map(move |range| FormatItem::new(formatter, range))
            })
            .collect()
    }

    /// Checks the canonical-form invariants.
    ///
    /// Block entries hold exactly `[0, len)`; inline entries are sorted,
    /// non-empty, within the slot, and adjacent ranges carry different values.
    pub fn is_canonical(&self) -> bool {
        self.map.iter().all(|(formatter, ranges)| {
            if formatter.is_block() {
                return ranges.len() == 1
                    && ranges[0].start_index == 0
                    && ranges[0].end_index == self.len;
            }
            !ranges.is_empty()
                && ranges
                    .iter()
                    .all(|range| range.start_index < range.end_index && range.end_index <= self.len)
                && ranges.windows(2).all(|pair| {
                    pair[0].end_index < pair[1].start_index
                        || (pair[0].end_index == pair[1].start_index
                            && pair[0].value != pair[1].value)
                })
        })
    }

    fn store(&mut self, formatter: &Formatter, ranges: Vec<FormatRange>) {
        if ranges.is_empty() {
            debug!(formatter = %formatter, "removing formatter without ranges");
            self.map.remove(formatter);
        } else {
            self.map.insert(formatter.clone(), ranges);
        }
    }
}

fn cover(ranges: &mut [FormatRange], len: usize) {
    for range in ranges {
        range.start_index = 0;
        range.end_index = len;
    }
}
