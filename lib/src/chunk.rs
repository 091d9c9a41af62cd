use std::ops::Range;

/// Number of chunks of `size` needed to cover `len` samples.
pub fn chunk_count(len: usize, size: usize) -> usize {
    let size = size.max(1);
    (len + size - 1) / size
}

/// Splits `0..len` into contiguous ranges of `size` samples in index order.
/// The last range may be shorter. A `size` of 0 is treated as 1.
pub fn chunks(len: usize, size: usize) -> impl Iterator<Item = Range<usize>> {
    let size = size.max(1);
    (0..len)
        .step_by(size)
        .map(move |start| start..(start + size).min(len))
}
