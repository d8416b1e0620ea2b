//! Ordered extractor chains for fields that live under different names
//! depending on the API version a source happens to answer with.

/// A single way of pulling a value out of an item
pub type Extractor<'a, T> = &'a dyn Fn(&T) -> Option<String>;

/// Try each extractor in order; the first non-blank value wins.
pub fn first_present<T>(item: &T, chain: &[Extractor<'_, T>]) -> Option<String> {
    chain
        .iter()
        .filter_map(|extract| extract(item))
        .find(|value| !value.trim().is_empty())
}
