use unicode_normalization::UnicodeNormalization;

/// Combining diacritical marks removed during normalization.
const COMBINING_MARKS: std::ops::RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Canonicalize text for comparison.
///
/// Applies compatibility decomposition (NFKD), drops combining diacritics,
/// lowercases, trims and collapses whitespace runs into a single space.
/// The result is a fixed point: normalizing it again returns it unchanged.
pub fn normalize(input: &str) -> String {
    let folded = strip_marks(input).to_lowercase();
    // Lowercasing may yield characters with a compatibility decomposition.
    let folded = strip_marks(&folded);
    folded
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unicode whitespace plus the byte order mark, which editors leave at the
/// start of copied text.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn strip_marks(input: &str) -> String {
    input.nfkd().filter(|c| !COMBINING_MARKS.contains(c)).collect()
}

/// Number of Unicode scalar values in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Levenshtein edit distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
