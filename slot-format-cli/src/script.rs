//! Edit scripts: a formatter declaration, initial text and a list of ops.

use serde::Deserialize;
use slot_format::{
    Embed, FormatError, FormatValue, Formatter, FormatterRegistry, FormatterSpec, Slot,
};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub formatters: Vec<FormatterSpec>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub ops: Vec<Op>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Op {
    InsertText {
        index: usize,
        text: String,
        #[serde(default)]
        formats: BTreeMap<String, Option<FormatValue>>,
    },
    InsertEmbed {
        index: usize,
        name: String,
        #[serde(default)]
        block: bool,
    },
    Delete {
        index: usize,
        count: usize,
    },
    /// Applies a format; `end` defaults to the slot length.
    Format {
        formatter: String,
        #[serde(default)]
        start: usize,
        end: Option<usize>,
        value: Option<FormatValue>,
        #[serde(default)]
        background: bool,
    },
    Remove {
        formatter: String,
        #[serde(default)]
        start: usize,
        end: Option<usize>,
    },
    /// Replaces the slot with the part cut out of it.
    Cut {
        start: usize,
        end: usize,
    },
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn replay(&self) -> Result<Slot, ScriptError> {
        let registry = FormatterRegistry::from_specs(self.formatters.iter().cloned())?;
        let mut slot = Slot::from_text(&self.text);
        for (step, op) in self.ops.iter().enumerate() {
            debug!(step, ?op, "applying op");
            match op {
                Op::InsertText {
                    index,
                    text,
                    formats,
                } => {
                    let formats = formats
                        .iter()
                        .map(|(name, value)| Ok((lookup(&registry, name)?.clone(), value.clone())))
                        .collect::<Result<Vec<_>, FormatError>>()?;
                    slot.insert_text(*index, text, &formats);
                }
                Op::InsertEmbed { index, name, block } => {
                    slot.insert_embed(
                        *index,
                        Embed {
                            name: name.clone(),
                            block: *block,
                        },
                    );
                }
                Op::Delete { index, count } => {
                    slot.delete(*index, *count);
                }
                Op::Format {
                    formatter,
                    start,
                    end,
                    value,
                    background,
                } => {
                    let formatter = lookup(&registry, formatter)?;
                    let end = end.unwrap_or(slot.len());
                    slot.apply_format(formatter, *start..end, value.clone(), *background);
                }
                Op::Remove {
                    formatter,
                    start,
                    end,
                } => {
                    let formatter = lookup(&registry, formatter)?;
                    let end = end.unwrap_or(slot.len());
                    slot.remove_format(formatter, *start..end);
                }
                Op::Cut { start, end } => {
                    slot = slot.cut(*start, *end);
                }
            }
        }
        info!(len = slot.len(), ops = self.ops.len(), "replay complete");
        Ok(slot)
    }
}

fn lookup<'a>(registry: &'a FormatterRegistry, name: &str) -> Result<&'a Formatter, FormatError> {
    registry
        .get(name)
        .ok_or_else(|| FormatError::UnknownFormatter(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use slot_format::FormatRange;

    fn script(raw: &str) -> Script {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn replays_formats_and_deletes() {
        let slot = script(
            r#"{
                "formatters": [{"name": "bold", "type": "inline"}],
                "text": "0123456789",
                "ops": [
                    {"op": "format", "formatter": "bold", "start": 2, "end": 5, "value": true},
                    {"op": "delete", "index": 3, "count": 2}
                ]
            }"#,
        )
        .replay()
        .unwrap();
        assert_eq!(slot.len(), 8);
        let json = slot.format().to_json();
        assert_eq!(json["bold"], vec![FormatRange::new(2, 3, true)]);
    }

    #[test]
    fn cut_replaces_the_slot() {
        let slot = script(
            r#"{
                "formatters": [{"name": "color", "type": "inline"}],
                "text": "hello world",
                "ops": [
                    {"op": "format", "formatter": "color", "start": 0, "end": 8, "value": "red"},
                    {"op": "cut", "start": 6, "end": 11}
                ]
            }"#,
        )
        .replay()
        .unwrap();
        assert_eq!(slot.to_plain_text(), "world");
        assert_eq!(
            slot.format().to_json()["color"],
            vec![FormatRange::new(0, 2, "red")]
        );
    }

    #[test]
    fn unknown_formatter_is_an_error() {
        let result = script(
            r#"{"text": "abc", "ops": [{"op": "remove", "formatter": "italic"}]}"#,
        )
        .replay();
        assert!(matches!(
            result,
            Err(ScriptError::Format(FormatError::UnknownFormatter(name))) if name == "italic"
        ));
    }
}
