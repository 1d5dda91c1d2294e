//! Caseless matching shared by search and highlighting.
//!
//! Both sides fold one char at a time, so a cell matches the search exactly
//! when highlighting finds a range in it.

/// Caseless form of `c`: its lowercase chars, with final sigma as sigma.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|ch| if ch == 'ς' { 'σ' } else { ch })
}

/// Folded chars of a search query.
pub(crate) fn fold_query(query: &str) -> Vec<char> {
    query.chars().flat_map(fold_char).collect()
}

/// A folded char and the byte range of the source char it came from.
struct Folded {
    ch: char,
    start: usize,
    end: usize,
}

fn fold_text(text: &str) -> Vec<Folded> {
    text.char_indices()
        .flat_map(|(start, c)| {
            let end = start + c.len_utf8();
            fold_char(c).map(move |ch| Folded { ch, start, end })
        })
        .collect()
}

/// Walk non-overlapping matches left to right until `on_match` returns false.
///
/// A match never splits a source char that folds to several chars.
fn scan(text: &str, needle: &[char], mut on_match: impl FnMut(usize, usize) -> bool) {
    if needle.is_empty() {
        return;
    }
    let hay = fold_text(text);
    let mut i = 0;
    while i + needle.len() <= hay.len() {
        let last = i + needle.len() - 1;
        let starts_char = i == 0 || hay[i - 1].start != hay[i].start;
        let ends_char = last + 1 == hay.len() || hay[last + 1].start != hay[last].start;
        let equal = hay[i..=last].iter().zip(needle).all(|(h, n)| h.ch == *n);
        if equal && starts_char && ends_char {
            if !on_match(hay[i].start, hay[last].end) {
                return;
            }
            i = last + 1;
        } else {
            i += 1;
        }
    }
}

/// Byte ranges in `text` of non-overlapping caseless matches of `needle`.
pub(crate) fn match_ranges(text: &str, needle: &[char]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    scan(text, needle, |start, end| {
        ranges.push((start, end));
        true
    });
    ranges
}

/// Whether `text` contains `needle`; an empty needle is always contained.
pub(crate) fn contains(text: &str, needle: &[char]) -> bool {
    let mut found = needle.is_empty();
    scan(text, needle, |_, _| {
        found = true;
        false
    });
    found
}
