#![no_main]

//! Drives a format through arbitrary edits and checks that it stays canonical
//! and that its tree tiles the slot.

use libfuzzer_sys::fuzz_target;
use slot_format::{Format, FormatTree, FormatValue, Formatter};

fn leaves(tree: &FormatTree, out: &mut Vec<(usize, usize)>) {
    match &tree.children {
        Some(children) => children.iter().for_each(|child| leaves(child, out)),
        None => out.push((tree.start_index, tree.end_index)),
    }
}

fuzz_target!(|data: &[u8]| {
    let formatters = [
        Formatter::inline(0, "bold"),
        Formatter::inline(1, "color"),
        Formatter::inline(2, "cell").with_columned(true),
        Formatter::block(3, "align"),
    ];
    let values = [
        FormatValue::from(true),
        FormatValue::from("red"),
        FormatValue::from("blue"),
    ];

    let mut format = Format::new(data.first().copied().unwrap_or(0) as usize % 64);
    for chunk in data.chunks(4).skip(1) {
        if chunk.len() < 4 {
            break;
        }
        let formatter = &formatters[chunk[0] as usize % formatters.len()];
        let a = chunk[1] as usize % 80;
        let b = chunk[2] as usize % 16;
        match chunk[3] % 6 {
            0 => {
                let value = values.get(chunk[3] as usize / 6 % 4).cloned();
                format.merge(formatter, a..a + b, value, chunk[3] & 0x80 != 0);
            }
            1 => {
                format.discard(formatter, a, a + b);
            }
            2 => {
                format.stretch(a, b);
            }
            3 => {
                format.split(a, b % 4);
            }
            4 => {
                format.shrink(a, b);
            }
            _ => {
                let extracted = format.extract(a.min(format.len()), (a + b).min(format.len()));
                assert!(extracted
                    .iter()
                    .all(|(_, ranges)| ranges.iter().all(|range| !range.is_empty())));
            }
        }
        assert!(format.is_canonical(), "format lost its canonical form: {format:?}");
    }

    if format.len() > 0 {
        let mut spans = Vec::new();
        leaves(&format.to_tree(0, format.len()), &mut spans);
        assert!(spans.windows(2).all(|pair| pair[0].1 == pair[1].0));
        assert_eq!(spans.last().map(|span| span.1), Some(format.len()));
    }
});
