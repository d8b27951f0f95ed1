/// Levenshtein distance over Unicode scalar values. Case-sensitive, no normalisation.
pub fn distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Stable sort of `items` by ascending distance between `key(item)` and `query`.
pub fn rank_by_distance<T, F>(items: &mut [T], query: &str, key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_cached_key(|item| distance(key(item), query));
}
