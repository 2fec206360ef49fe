//! slot-format: the format range engine behind rich-text slots.
//!
//! A slot is a mutable run of content. Its [`Format`] records which
//! formats (bold, color, block alignment, links, ...) cover which ranges,
//! and keeps those ranges canonical while the slot is edited. It includes:
//!
//! - **Core types** - Format values, ranges, formatters and the registry
//! - **Tiling** - Dense expansion and re-ranging, the only place overlaps are resolved
//! - **Format engine** - Merge, stretch, split, shrink, discard and extraction
//! - **Format trees** - Nested partitions used to decide rendering order
//! - **Slot** - A small buffer that drives the engine from content edits
//!
//! # Quick Start
//!
//! ```rust
//! use slot_format::{Format, Formatter};
//!
//! let bold = Formatter::inline(0, "bold");
//! let mut format = Format::new(10);
//! format.merge(&bold, 2..5, Some(true.into()), false);
//!
//! // Delete two units at position 3.
//! format.shrink(3, 2);
//! assert_eq!(format.get(&bold).unwrap()[0].end_index, 3);
//! ```

// Value, range and formatter types plus tiling
pub mod core;

// Format engine and tree builder
pub mod format;

// Slot buffer
pub mod slot;

// Re-export core types
pub use crate::core::{
    FormatError, FormatItem, FormatPriority, FormatRange, FormatType, FormatValue, Formatter,
    FormatterId, FormatterRegistry, FormatterSpec, Primitive,
};

// Re-export tiling primitives
pub use crate::core::tile::{tile_ranges, to_ranges};

// Re-export format types
pub use format::{Format, FormatLiteral, FormatTree, Formats};

// Re-export slot types
pub use slot::{ContentLiteral, Embed, Slot, SlotItem, SlotLiteral};
