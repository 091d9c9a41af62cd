//! Peak-preserving index selection.
//!
//! The series is partitioned into contiguous chunks and the position of each
//! chunk's maximum is kept. Unlike stride-based decimation this never drops a
//! transient spike: whichever chunk contains it reports it.

use crate::chunk::chunks;

/// Local index of the first occurrence of the maximum in `chunk`.
///
/// Returns `None` for an empty chunk. NaN never beats a number; a chunk made
/// only of NaN reports its first sample.
pub fn peak_index(chunk: &[f64]) -> Option<usize> {
    let mut samples = chunk.iter().copied().enumerate();
    let (mut peak, mut max) = samples.next()?;
    for (i, value) in samples {
        if value > max || (max.is_nan() && !value.is_nan()) {
            peak = i;
            max = value;
        }
    }
    Some(peak)
}

/// Global indexes of every chunk's peak, one per chunk, strictly increasing.
pub fn peak_indexes(series: &[f64], chunk_size: usize) -> Vec<usize> {
    chunks(series.len(), chunk_size)
        .filter_map(|range| {
            let start = range.start;
            peak_index(&series[range]).map(|local| start + local)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::chunk_count;
    use proptest::collection::vec;
    use proptest::prelude::*;

    #[test]
    fn empty_chunk_has_no_peak() {
        assert_eq!(peak_index(&[]), None);
    }

    #[test]
    fn first_maximum_wins() {
        assert_eq!(peak_index(&[3.0, 3.0, 3.0]), Some(0));
        assert_eq!(peak_index(&[1.0, 7.0, 2.0, 7.0]), Some(1));
    }

    #[test]
    fn nan_never_wins() {
        assert_eq!(peak_index(&[f64::NAN, 1.0, f64::NAN]), Some(1));
        assert_eq!(peak_index(&[2.0, f64::NAN, 5.0]), Some(2));
        assert_eq!(peak_index(&[f64::NAN, f64::NAN]), Some(0));
    }

    #[test]
    fn negative_values() {
        assert_eq!(peak_index(&[-5.0, -1.0, -3.0]), Some(1));
    }

    #[test]
    fn known_peaks() {
        let series = [1.0, 5.0, 3.0, 2.0, 8.0, 4.0, 0.0, 9.0];
        assert_eq!(peak_indexes(&series, 2), vec![1, 2, 4, 7]);
        assert_eq!(peak_indexes(&series, 3), vec![1, 4, 7]);
        assert_eq!(peak_indexes(&series, 8), vec![7]);
    }

    #[test]
    fn spike_survives_where_stride_would_drop_it() {
        let mut series = vec![0.0; 1000];
        series[537] = 42.0;
        let indexes = peak_indexes(&series, 10);
        assert_eq!(indexes.len(), 100);
        assert!(indexes.contains(&537));
        // Every other chunk is flat, so it reports its first sample.
        assert_eq!(indexes[0], 0);
        assert_eq!(indexes[99], 990);
    }

    #[test]
    fn empty_series() {
        assert!(peak_indexes(&[], 2).is_empty());
    }

    proptest! {
        #[test]
        fn one_peak_per_chunk(series in vec(-1e6f64..1e6, 0..2_000), size in 1usize..120) {
            let indexes = peak_indexes(&series, size);
            prop_assert_eq!(indexes.len(), chunk_count(series.len(), size));
            if let Some(&last) = indexes.last() {
                prop_assert!(last < series.len());
            }
        }

        #[test]
        fn peaks_dominate_their_chunk(series in vec(-1e6f64..1e6, 1..2_000), size in 1usize..120) {
            let indexes = peak_indexes(&series, size);
            for (chunk, &peak) in series.chunks(size).zip(&indexes) {
                let start = peak - peak % size;
                prop_assert_eq!(start, indexes.iter().position(|&i| i == peak).unwrap() * size);
                for (offset, &value) in chunk.iter().enumerate() {
                    prop_assert!(series[peak] >= value);
                    if value == series[peak] {
                        prop_assert!(start + offset >= peak);
                    }
                }
            }
        }

        #[test]
        fn indexes_strictly_increase(series in vec(-1e6f64..1e6, 0..2_000), size in 1usize..120) {
            let indexes = peak_indexes(&series, size);
            prop_assert!(indexes.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn ties_pick_lowest_index(value in -1e3f64..1e3, len in 1usize..300, size in 1usize..50) {
            let series = vec![value; len];
            let indexes = peak_indexes(&series, size);
            let starts: Vec<usize> = (0..len).step_by(size).collect();
            prop_assert_eq!(indexes, starts);
        }
    }
}
