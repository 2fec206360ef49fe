//! Format tree construction.
//!
//! [`Format::to_tree`] partitions an interval greedily: formats covering the
//! whole interval become the node's `formats`, the rest is cut at the next
//! place where the format set changes and each part is built recursively.
//! Columned formats are never consumed by a node that has children; they are
//! handed down so they reappear on every descendant they cover.
//!
//! The recursion works on borrowed spans into the source format, so no
//! intermediate [`Format`] is allocated per level.

use super::Format;
use crate::core::{FormatItem, FormatValue, Formatter};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatTree {
    pub start_index: usize,
    pub end_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FormatTree>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<FormatItem>>,
}

impl FormatTree {
    pub fn leaf(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
            children: None,
            formats: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// This node's formats, highest priority first.
    ///
    /// Formats sharing a priority keep their tree order.
    pub fn formats_by_priority(&self) -> Vec<&FormatItem> {
        let mut formats: Vec<&FormatItem> = self.formats.iter().flatten().collect();
        formats.sort_by(|a, b| b.formatter.priority().cmp(&a.formatter.priority()));
        formats
    }
}

#[derive(Debug, Clone, Copy)]
struct Span<'a> {
    start: usize,
    end: usize,
    value: &'a FormatValue,
}

#[derive(Debug, Clone)]
struct Entry<'a> {
    formatter: &'a Formatter,
    spans: Vec<Span<'a>>,
}

impl Format {
    /// Builds the format tree of `[start_index, end_index)`.
    pub fn to_tree(&self, start_index: usize, end_index: usize) -> FormatTree {
        let entries: Vec<Entry<'_>> = self
            .map
            .iter()
            .map(|(formatter, ranges)| Entry {
                formatter,
                spans: ranges
                    .iter()
                    .map(|range| Span {
                        start: range.start_index,
                        end: range.end_index,
                        value: &range.value,
                    })
                    .collect(),
            })
            .collect();
        build(&entries, start_index, end_index)
    }
}

fn build(entries: &[Entry<'_>], start: usize, end: usize) -> FormatTree {
    let mut working = clip(entries, start, end);
    let mut formats = Vec::new();
    let mut columned = Vec::new();
    let mut next_start = end;
    let mut next_end = start;

    working.retain(|entry| {
        let mut keep = true;
        for span in &entry.spans {
            if span.start == start && span.end == end {
                let found = to_item(entry.formatter, span);
                if entry.formatter.is_columned() {
                    columned.push(found);
                } else {
                    formats.push(found);
                    keep = false;
                }
            } else if span.start < next_start {
                next_start = span.start;
                next_end = span.end;
            } else if span.start == next_start {
                next_end = next_end.max(span.end);
            }
        }
        keep
    });

    let mut tree = FormatTree::leaf(start, end);
    if working.len() > columned.len() {
        let mut children = Vec::new();
        if start < next_start {
            if columned.is_empty() {
                children.push(FormatTree::leaf(start, next_start));
            } else {
                children.push(build(&working, start, next_start));
            }
        }
        push_flattened(&mut children, build(&working, next_start, next_end));
        if next_end < end {
            push_flattened(&mut children, build(&working, next_end, end));
        }
        tree.children = Some(children);
    } else {
        formats.append(&mut columned);
    }

    if !formats.is_empty() {
        tree.formats = Some(formats);
    }
    tree
}

/// A child without formats of its own is replaced by its children.
fn push_flattened(children: &mut Vec<FormatTree>, child: FormatTree) {
    match child {
        FormatTree {
            formats: None,
            children: Some(grandchildren),
            ..
        } => children.extend(grandchildren),
        child => children.push(child),
    }
}

fn clip<'a>(entries: &[Entry<'a>], start: usize, end: usize) -> Vec<Entry<'a>> {
    entries
        .iter()
        .filter_map(|entry| {
            let spans: Vec<Span<'a>> = entry
                .spans
                .iter()
                .filter(|span| span.start <= end && span.end >= start)
                .filter_map(|span| {
                    let clipped = Span {
                        start: span.start.max(start),
                        end: span.end.min(end),
                        value: span.value,
                    };
                    (clipped.start < clipped.end).then_some(clipped)
                })
                .collect();
            (!spans.is_empty()).then(|| Entry {
                formatter: entry.formatter,
                spans,
            })
        })
        .collect()
}

fn to_item(formatter: &Formatter, span: &Span<'_>) -> FormatItem {
    FormatItem {
        formatter: formatter.clone(),
        start_index: span.start,
        end_index: span.end,
        value: span.value.clone(),
    }
}
