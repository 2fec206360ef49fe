#![no_main]

use libfuzzer_sys::fuzz_target;
use slot_format::{Format, FormatLiteral, FormatType, FormatterRegistry, FormatterSpec};

fuzz_target!(|data: &[u8]| {
    let Ok(literal) = serde_json::from_slice::<FormatLiteral>(data) else {
        return;
    };
    let mut registry = FormatterRegistry::new();
    for (index, name) in literal.keys().enumerate() {
        let kind = if index % 3 == 2 {
            FormatType::Block
        } else {
            FormatType::Inline
        };
        let _ = registry.register(FormatterSpec {
            name: name.clone(),
            kind,
            columned: false,
            priority: Default::default(),
        });
    }
    let len = literal
        .values()
        .flatten()
        .map(|range| range.end_index)
        .max()
        .unwrap_or(0)
        .min(1 << 16);
    if let Ok(format) = Format::from_literal(len, &literal, &registry) {
        assert!(format.is_canonical());
        let reloaded = Format::from_literal(len, &format.to_json(), &registry);
        assert_eq!(reloaded, Ok(format));
    }
});
