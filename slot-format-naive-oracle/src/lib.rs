//! A naive, simple oracle implementation for differential testing.
//!
//! Every inline formatter is stored as one cell per slot position, so each
//! edit is a plain vector operation. Block formatters are not modelled.
use slot_format::{FormatRange, FormatValue, Formatter};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NaiveFormat {
    len: usize,
    cells: BTreeMap<Formatter, Vec<Option<FormatValue>>>,
}

impl NaiveFormat {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            cells: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn merge(
        &mut self,
        formatter: &Formatter,
        start: usize,
        end: usize,
        value: Option<FormatValue>,
        background: bool,
    ) {
        let len = self.len;
        let cells = self
            .cells
            .entry(formatter.clone())
            .or_insert_with(|| vec![None; len]);
        for cell in cells.iter_mut().take(end.min(len)).skip(start) {
            if background && cell.is_some() {
                continue;
            }
            *cell = value.clone();
        }
    }

    pub fn discard(&mut self, formatter: &Formatter, start: usize, end: usize) {
        if let Some(cells) = self.cells.get_mut(formatter) {
            for cell in cells.iter_mut().take(end.min(self.len)).skip(start) {
                *cell = None;
            }
        }
    }

    /// Inserted cells copy the cell to their left.
    pub fn stretch(&mut self, index: usize, count: usize) {
        let index = index.min(self.len);
        for cells in self.cells.values_mut() {
            let inherited = if index == 0 {
                None
            } else {
                cells[index - 1].clone()
            };
            for _ in 0..count {
                cells.insert(index, inherited.clone());
            }
        }
        self.len += count;
    }

    /// Inserted cells are empty.
    pub fn split(&mut self, index: usize, distance: usize) {
        let index = index.min(self.len);
        for cells in self.cells.values_mut() {
            for _ in 0..distance {
                cells.insert(index, None);
            }
        }
        self.len += distance;
    }

    pub fn shrink(&mut self, start: usize, count: usize) {
        let start = start.min(self.len);
        let end = start.saturating_add(count).min(self.len);
        for cells in self.cells.values_mut() {
            cells.drain(start..end);
        }
        self.len -= end - start;
    }

    pub fn ranges(&self, formatter: &Formatter) -> Vec<FormatRange> {
        let Some(cells) = self.cells.get(formatter) else {
            return Vec::new();
        };
        let mut ranges: Vec<FormatRange> = Vec::new();
        let mut previous: Option<&FormatValue> = None;
        for (index, cell) in cells.iter().enumerate() {
            match cell {
                Some(value) if previous == Some(value) => {
                    if let Some(last) = ranges.last_mut() {
                        last.end_index = index + 1;
                    }
                }
                Some(value) => ranges.push(FormatRange {
                    start_index: index,
                    end_index: index + 1,
                    value: value.clone(),
                }),
                None => {}
            }
            previous = cell.as_ref();
        }
        ranges
    }

    /// Formatters that still cover at least one position.
    pub fn formatters(&self) -> Vec<Formatter> {
        self.cells
            .iter()
            .filter(|(_, cells)| cells.iter().any(Option::is_some))
            .map(|(formatter, _)| formatter.clone())
            .collect()
    }

    /// The cell left of `index`, or cell 0 at the start of the slot.
    pub fn formats_at(&self, index: usize) -> Vec<(Formatter, FormatValue)> {
        let cell = index.saturating_sub(1);
        self.cells
            .iter()
            .filter_map(|(formatter, cells)| {
                cells
                    .get(cell)
                    .cloned()
                    .flatten()
                    .map(|value| (formatter.clone(), value))
            })
            .collect()
    }

    pub fn grid(&self) -> Vec<usize> {
        let mut points = vec![0, self.len];
        for formatter in self.cells.keys() {
            for range in self.ranges(formatter) {
                points.push(range.start_index);
                points.push(range.end_index);
            }
        }
        points.sort_unstable();
        points.dedup();
        points
    }
}
