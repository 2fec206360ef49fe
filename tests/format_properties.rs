use proptest::collection::vec;
use proptest::prelude::*;
use slot_format::{
    Format, FormatPriority, FormatRange, FormatTree, FormatType, FormatValue, Formatter,
    FormatterRegistry, FormatterSpec, tile_ranges, to_ranges,
};

mod proptest_config;

fn registry() -> FormatterRegistry {
    let spec = |name: &str, kind: FormatType, columned: bool| FormatterSpec {
        name: name.to_string(),
        kind,
        columned,
        priority: FormatPriority::default(),
    };
    FormatterRegistry::from_specs([
        spec("bold", FormatType::Inline, false),
        spec("color", FormatType::Inline, false),
        spec("cell", FormatType::Inline, true),
        spec("align", FormatType::Block, false),
    ])
    .unwrap()
}

fn formatters() -> Vec<Formatter> {
    registry().iter().cloned().collect()
}

fn value_strategy() -> impl Strategy<Value = FormatValue> {
    prop_oneof![
        Just(FormatValue::from(true)),
        Just(FormatValue::from("red")),
        Just(FormatValue::from("blue")),
        (0..3i32).prop_map(FormatValue::from),
    ]
}

fn range_strategy() -> impl Strategy<Value = FormatRange> {
    (0..30usize, 1..10usize, value_strategy())
        .prop_map(|(start, span, value)| FormatRange::new(start, start + span, value))
}

#[derive(Debug, Clone)]
enum Edit {
    Merge(usize, usize, usize, Option<FormatValue>, bool),
    Discard(usize, usize, usize),
    Stretch(usize, usize),
    Split(usize, usize),
    Shrink(usize, usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (0..4usize, 0..30usize, 0..12usize, proptest::option::weighted(0.8, value_strategy()), any::<bool>())
            .prop_map(|(f, start, span, value, background)| Edit::Merge(f, start, start + span, value, background)),
        1 => (0..4usize, 0..30usize, 0..12usize).prop_map(|(f, start, span)| Edit::Discard(f, start, start + span)),
        2 => (0..30usize, 0..5usize).prop_map(|(index, count)| Edit::Stretch(index, count)),
        1 => (0..30usize, 0..3usize).prop_map(|(index, distance)| Edit::Split(index, distance)),
        2 => (0..30usize, 0..8usize).prop_map(|(index, count)| Edit::Shrink(index, count)),
    ]
}

fn apply(format: &mut Format, edit: &Edit, formatters: &[Formatter]) {
    match edit {
        Edit::Merge(f, start, end, value, background) => {
            format.merge(&formatters[*f], *start..*end, value.clone(), *background);
        }
        Edit::Discard(f, start, end) => {
            format.discard(&formatters[*f], *start, *end);
        }
        Edit::Stretch(index, count) => {
            format.stretch(*index, *count);
        }
        Edit::Split(index, distance) => {
            format.split(*index, *distance);
        }
        Edit::Shrink(index, count) => {
            format.shrink(*index, *count);
        }
    }
}

fn build(len: usize, edits: &[Edit], formatters: &[Formatter]) -> Format {
    let mut format = Format::new(len);
    for edit in edits {
        apply(&mut format, edit, formatters);
    }
    format
}

fn leaves(tree: &FormatTree, out: &mut Vec<(usize, usize)>) {
    match &tree.children {
        Some(children) => children.iter().for_each(|child| leaves(child, out)),
        None => out.push((tree.start_index, tree.end_index)),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]

    #[test]
    fn edits_keep_the_format_canonical(len in 0..30usize, edits in vec(edit_strategy(), 0..60)) {
        let formatters = formatters();
        let mut format = Format::new(len);
        for edit in &edits {
            apply(&mut format, edit, &formatters);
            prop_assert!(format.is_canonical(), "not canonical after {:?}: {:?}", edit, format);
        }
    }

    #[test]
    fn tiling_is_idempotent(ranges in vec(range_strategy(), 0..12), len in 0..40usize) {
        let tiles = tile_ranges(&ranges, len);
        prop_assert!(tiles.len() <= len);
        let canonical = to_ranges(&tiles);
        prop_assert_eq!(tile_ranges(&canonical, len), tiles);
        prop_assert_eq!(to_ranges(&tile_ranges(&canonical, len)), canonical);
    }

    #[test]
    fn stretch_then_shrink_restores_the_format(
        len in 0..30usize,
        edits in vec(edit_strategy(), 0..30),
        at in 0..30usize,
        count in 0..6usize,
    ) {
        let formatters = formatters();
        let original = build(len, &edits, &formatters);
        let index = at.min(original.len());
        let mut format = original.clone();
        format.stretch(index, count).shrink(index, count);
        prop_assert_eq!(format, original);
    }

    #[test]
    fn split_then_shrink_restores_the_format(
        len in 0..30usize,
        edits in vec(edit_strategy(), 0..30),
        at in 0..30usize,
        distance in 0..4usize,
    ) {
        let formatters = formatters();
        let original = build(len, &edits, &formatters);
        let index = at.min(original.len());
        let mut format = original.clone();
        format.split(index, distance).shrink(index, distance);
        prop_assert_eq!(format, original);
    }

    #[test]
    fn json_literal_reloads_to_the_same_format(len in 0..30usize, edits in vec(edit_strategy(), 0..40)) {
        let registry = registry();
        let formatters = formatters();
        let format = build(len, &edits, &formatters);
        let reloaded = Format::from_literal(format.len(), &format.to_json(), &registry).unwrap();
        prop_assert_eq!(reloaded, format);
    }

    #[test]
    fn full_extract_is_identity(len in 1..30usize, edits in vec(edit_strategy(), 0..40)) {
        let formatters = formatters();
        let format = build(len, &edits, &formatters);
        if format.len() == 0 {
            return Ok(());
        }
        prop_assert_eq!(format.extract(0, format.len()), format.clone());
        prop_assert_eq!(format.create_format_by_range(format.len(), 0, format.len()), format);
    }

    #[test]
    fn tree_leaves_tile_the_interval(len in 1..30usize, edits in vec(edit_strategy(), 0..40)) {
        let formatters = formatters();
        let format = build(len, &edits, &formatters);
        if format.len() == 0 {
            return Ok(());
        }
        let tree = format.to_tree(0, format.len());
        let mut spans = Vec::new();
        leaves(&tree, &mut spans);
        prop_assert_eq!(spans.first().map(|span| span.0), Some(0));
        prop_assert_eq!(spans.last().map(|span| span.1), Some(format.len()));
        prop_assert!(spans.iter().all(|(start, end)| start < end));
        prop_assert!(spans.windows(2).all(|pair| pair[0].1 == pair[1].0));
    }
}
