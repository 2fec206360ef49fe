//! Dense tiling of range lists.
//!
//! Overlap resolution works on a per-position array: every range paints its
//! value over its positions in list order, so later ranges win, then
//! consecutive equal values are grouped back into ranges.

use super::{FormatRange, FormatValue};

/// One layer painted onto the tiles. A `None` value erases.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layer<'a> {
    pub start: usize,
    pub end: usize,
    pub value: Option<&'a FormatValue>,
}

impl<'a> From<&'a FormatRange> for Layer<'a> {
    fn from(range: &'a FormatRange) -> Self {
        Layer {
            start: range.start_index,
            end: range.end_index,
            value: Some(&range.value),
        }
    }
}

/// Expands `ranges` into one entry per position, clamped to `len`.
///
/// The output may be shorter than `len` when no range reaches the end.
pub fn tile_ranges(ranges: &[FormatRange], len: usize) -> Vec<Option<FormatValue>> {
    tile(ranges.iter().map(Layer::from), len)
        .into_iter()
        .map(|value| value.cloned())
        .collect()
}

/// Groups consecutive equal, non-void values into ranges.
pub fn to_ranges(values: &[Option<FormatValue>]) -> Vec<FormatRange> {
    let tiles: Vec<Option<&FormatValue>> = values.iter().map(Option::as_ref).collect();
    collect_runs(&tiles)
}

pub(crate) fn tile<'a>(
    layers: impl IntoIterator<Item = Layer<'a>>,
    len: usize,
) -> Vec<Option<&'a FormatValue>> {
    let mut tiles: Vec<Option<&'a FormatValue>> = Vec::new();
    for layer in layers {
        let end = layer.end.min(len);
        if layer.start >= end {
            continue;
        }
        if tiles.len() < end {
            tiles.resize(end, None);
        }
        tiles[layer.start..end].fill(layer.value);
    }
    tiles
}

pub(crate) fn collect_runs(tiles: &[Option<&FormatValue>]) -> Vec<FormatRange> {
    let mut ranges: Vec<FormatRange> = Vec::new();
    let mut open = false;
    for (index, tile) in tiles.iter().enumerate() {
        let Some(value) = tile else {
            open = false;
            continue;
        };
        if open {
            if let Some(last) = ranges.last_mut() {
                if last.value == **value {
                    last.end_index = index + 1;
                    continue;
                }
            }
        }
        ranges.push(FormatRange {
            start_index: index,
            end_index: index + 1,
            value: (*value).clone(),
        });
        open = true;
    }
    ranges
}

/// Resolves `incoming` against `existing` and returns the canonical list.
///
/// With `background` the existing ranges are painted last, so they keep
/// their values wherever both are present.
pub(crate) fn normalize(
    background: bool,
    existing: &[FormatRange],
    incoming: Option<Layer<'_>>,
    len: usize,
) -> Vec<FormatRange> {
    let existing = existing.iter().map(Layer::from);
    let tiles = match (incoming, background) {
        (None, _) => tile(existing, len),
        (Some(layer), true) => tile(std::iter::once(layer).chain(existing), len),
        (Some(layer), false) => tile(existing.chain(std::iter::once(layer)), len),
    };
    collect_runs(&tiles)
}
