use proptest::collection::vec;
use proptest::prelude::*;
use slot_format::{Format, FormatValue, Formatter};
use slot_format_naive_oracle::NaiveFormat;

mod proptest_config;

#[derive(Debug, Clone)]
enum Edit {
    Merge {
        formatter: usize,
        start: usize,
        end: usize,
        value: Option<FormatValue>,
        background: bool,
    },
    Discard {
        formatter: usize,
        start: usize,
        end: usize,
    },
    Stretch {
        index: usize,
        count: usize,
    },
    Split {
        index: usize,
        distance: usize,
    },
    Shrink {
        index: usize,
        count: usize,
    },
}

fn formatters() -> Vec<Formatter> {
    vec![
        Formatter::inline(0, "bold"),
        Formatter::inline(1, "color"),
        Formatter::inline(2, "size"),
    ]
}

fn value_strategy() -> impl Strategy<Value = Option<FormatValue>> {
    prop_oneof![
        3 => prop_oneof![
            Just(FormatValue::from(true)),
            Just(FormatValue::from("red")),
            Just(FormatValue::from("blue")),
            (1..4i32).prop_map(FormatValue::from),
        ]
        .prop_map(Some),
        1 => Just(None),
    ]
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        4 => (0..3usize, 0..40usize, 0..40usize, value_strategy(), any::<bool>()).prop_map(
            |(formatter, a, b, value, background)| Edit::Merge {
                formatter,
                start: a.min(b),
                end: a.max(b),
                value,
                background,
            }
        ),
        1 => (0..3usize, 0..40usize, 0..40usize).prop_map(|(formatter, a, b)| Edit::Discard {
            formatter,
            start: a.min(b),
            end: a.max(b),
        }),
        2 => (0..40usize, 0..5usize).prop_map(|(index, count)| Edit::Stretch { index, count }),
        1 => (0..40usize, 0..5usize).prop_map(|(index, distance)| Edit::Split { index, distance }),
        2 => (0..40usize, 0..8usize).prop_map(|(index, count)| Edit::Shrink { index, count }),
    ]
}

fn apply(format: &mut Format, oracle: &mut NaiveFormat, edit: &Edit, formatters: &[Formatter]) {
    match edit {
        Edit::Merge {
            formatter,
            start,
            end,
            value,
            background,
        } => {
            let formatter = &formatters[*formatter];
            format.merge(formatter, *start..*end, value.clone(), *background);
            oracle.merge(formatter, *start, *end, value.clone(), *background);
        }
        Edit::Discard {
            formatter,
            start,
            end,
        } => {
            let formatter = &formatters[*formatter];
            format.discard(formatter, *start, *end);
            oracle.discard(formatter, *start, *end);
        }
        Edit::Stretch { index, count } => {
            format.stretch(*index, *count);
            oracle.stretch(*index, *count);
        }
        Edit::Split { index, distance } => {
            format.split(*index, *distance);
            oracle.split(*index, *distance);
        }
        Edit::Shrink { index, count } => {
            format.shrink(*index, *count);
            oracle.shrink(*index, *count);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]

    #[test]
    fn differential_test_inline_ranges(len in 0..30usize, edits in vec(edit_strategy(), 0..60)) {
        let formatters = formatters();
        let mut format = Format::new(len);
        let mut oracle = NaiveFormat::new(len);

        for edit in &edits {
            apply(&mut format, &mut oracle, edit, &formatters);
            prop_assert_eq!(format.len(), oracle.len());
        }

        for formatter in &formatters {
            let ranges = format.get(formatter).unwrap_or(&[]).to_vec();
            prop_assert_eq!(ranges, oracle.ranges(formatter), "{} should match the naive oracle", formatter);
        }
        let present: Vec<Formatter> = format.formatters().cloned().collect();
        prop_assert_eq!(present, oracle.formatters());
        prop_assert!(format.is_canonical());
    }

    #[test]
    fn differential_test_grid(len in 0..30usize, edits in vec(edit_strategy(), 0..40)) {
        let formatters = formatters();
        let mut format = Format::new(len);
        let mut oracle = NaiveFormat::new(len);
        for edit in &edits {
            apply(&mut format, &mut oracle, edit, &formatters);
        }
        prop_assert_eq!(format.to_grid(), oracle.grid());
    }

    #[test]
    fn differential_test_formats_by_index(
        len in 0..30usize,
        edits in vec(edit_strategy(), 0..40),
        probe in 0..50usize,
    ) {
        let formatters = formatters();
        let mut format = Format::new(len);
        let mut oracle = NaiveFormat::new(len);
        for edit in &edits {
            apply(&mut format, &mut oracle, edit, &formatters);
        }
        prop_assert_eq!(format.extract_formats_by_index(probe), oracle.formats_at(probe));
    }
}
