use tracing::debug;

/// Sampling interval that shrinks `len` items to roughly `max_size`.
///
/// A series that already fits keeps every point (stride 1).
#[must_use]
pub fn stride_for(len: usize, max_size: usize) -> usize {
    let max_size = max_size.max(1);
    if len <= max_size {
        1
    } else {
        len / max_size + 1
    }
}

/// Downsample an ordered series to about `max_size` points.
///
/// Keeps the first item, then every `stride`-th item after it, and always
/// appends the original last item, which carries the final cumulative totals.
/// Relative order is preserved. The result has at most `max_size + 2` items.
/// Series of zero or one item are returned unchanged.
#[must_use]
pub fn reduce<T: Clone>(series: &[T], max_size: usize) -> Vec<T> {
    let Some((last, body)) = series.split_last() else {
        return Vec::new();
    };
    if body.is_empty() {
        return vec![last.clone()];
    }

    let stride = stride_for(series.len(), max_size);
    let mut reduced: Vec<T> = body.iter().step_by(stride).cloned().collect();
    reduced.push(last.clone());

    debug!(
        original = series.len(),
        reduced = reduced.len(),
        stride,
        "Reduced series"
    );
    reduced
}
