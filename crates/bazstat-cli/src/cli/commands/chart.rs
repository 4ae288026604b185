//! Horizontal text bars for the ranking chart.

const FULL: char = '█';
const SLIVER: char = '▏';

/// Bar of up to `width` cells for `value` scaled against `max`.
/// Non-zero values always get at least a sliver.
pub(super) fn bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 || width == 0 || value == 0 {
        return String::new();
    }
    let scaled = (u128::from(value) * width as u128 + u128::from(max) / 2) / u128::from(max);
    let cells = (scaled as usize).min(width);
    if cells == 0 {
        return SLIVER.to_string();
    }
    std::iter::repeat(FULL).take(cells).collect()
}
