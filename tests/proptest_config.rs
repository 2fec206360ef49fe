//! Shared proptest settings. Set `PROPTEST_CASES` to raise the case count in CI.

pub fn cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|cases| *cases > 0)
        .unwrap_or(100)
}
