/// cumsum returns the running sum of x, every element shifted by offset. Inspired by numpy.cumsum.
pub fn cumsum(x: &[f64], offset: f64) -> Vec<f64> {
    let mut acc = offset;
    x.iter()
        .map(|&val| {
            acc += val;
            acc
        })
        .collect()
}

/// first_idx_where returns the index of the first element in x that fulfills the predicate.
pub fn first_idx_where<T, F>(x: &[T], pred: F) -> Option<usize>
where
    F: Fn(&T) -> bool,
{
    x.iter().position(|val| pred(val))
}

/// min returns the minimum value in the array x, None for an empty array.
pub fn min<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> Option<T> {
    let (&first, rest) = x.split_first()?;
    Some(rest.iter().fold(
        first,
        |val_min, &val| {
            if val < val_min {
                val
            } else {
                val_min
            }
        },
    ))
}

/// max returns the maximum value in the array x, None for an empty array.
pub fn max<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> Option<T> {
    let (&first, rest) = x.split_first()?;
    Some(rest.iter().fold(
        first,
        |val_max, &val| {
            if val > val_max {
                val
            } else {
                val_max
            }
        },
    ))
}
