//! LaTeX accent sequences in author names → precomposed Unicode.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Háček: `\v{c}` → `č`.
pub const CARON: &[(char, &str)] = &[
    ('a', "ǎ"), ('A', "Ǎ"), ('c', "č"), ('C', "Č"), ('d', "ď"), ('D', "Ď"),
    ('e', "ě"), ('E', "Ě"), ('g', "ǧ"), ('G', "Ǧ"), ('h', "ȟ"), ('H', "Ȟ"),
    ('i', "ǐ"), ('I', "Ǐ"), ('j', "ǰ"), ('J', "J\u{30C}"), ('k', "ǩ"), ('K', "Ǩ"),
    ('l', "ľ"), ('L', "Ľ"), ('n', "ň"), ('N', "Ň"), ('o', "ǒ"), ('O', "Ǒ"),
    ('r', "ř"), ('R', "Ř"), ('s', "š"), ('S', "Š"), ('t', "ť"), ('T', "Ť"),
    ('u', "ǔ"), ('U', "Ǔ"), ('z', "ž"), ('Z', "Ž"),
];

/// Acute accent: `\'{e}` → `é`.
pub const ACUTE: &[(char, &str)] = &[
    ('a', "á"), ('A', "Á"), ('c', "ć"), ('C', "Ć"), ('e', "é"), ('E', "É"),
    ('i', "í"), ('I', "Í"), ('l', "ĺ"), ('L', "Ĺ"), ('n', "ń"), ('N', "Ń"),
    ('o', "ó"), ('O', "Ó"), ('r', "ŕ"), ('R', "Ŕ"), ('s', "ś"), ('S', "Ś"),
    ('u', "ú"), ('U', "Ú"), ('y', "ý"), ('Y', "Ý"), ('z', "ź"), ('Z', "Ź"),
];

/// Diaeresis: `\"{u}` → `ü`.
pub const UMLAUT: &[(char, &str)] = &[
    ('a', "ä"), ('A', "Ä"), ('e', "ë"), ('E', "Ë"), ('i', "ï"), ('I', "Ï"),
    ('o', "ö"), ('O', "Ö"), ('u', "ü"), ('U', "Ü"), ('y', "ÿ"), ('Y', "Ÿ"),
];

// Braced forms go first so `{\v{s}}` loses its outer braces too.
static ACCENT_RULES: Lazy<Vec<(Regex, &'static [(char, &'static str)])>> = Lazy::new(|| {
    [
        (r#"\{\\v\{([a-zA-Z])\}\}"#, CARON),
        (r#"\\v\{([a-zA-Z])\}"#, CARON),
        (r#"\{\\'\{([a-zA-Z])\}\}"#, ACUTE),
        (r#"\\?'\{([a-zA-Z])\}"#, ACUTE),
        (r#"\{\\"\{([a-zA-Z])\}\}"#, UMLAUT),
        (r#"\\"\{([a-zA-Z])\}"#, UMLAUT),
    ]
    .into_iter()
    .map(|(pattern, table)| {
        (
            Regex::new(pattern).expect("LaTeX accent pattern must compile"),
            table,
        )
    })
    .collect()
});

/// Replace the supported LaTeX accent sequences with Unicode letters.
/// Sequences whose letter has no precomposed form are left as they are.
pub fn latex_to_unicode(text: &str) -> Cow<'_, str> {
    let mut result = Cow::Borrowed(text);
    for (pattern, table) in ACCENT_RULES.iter() {
        if !pattern.is_match(&result) {
            continue;
        }
        let replaced = pattern
            .replace_all(&result, |caps: &Captures| {
                caps[1]
                    .chars()
                    .next()
                    .and_then(|letter| lookup(table, letter))
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned();
        result = Cow::Owned(replaced);
    }
    result
}

/// Whether `text` holds a sequence [`latex_to_unicode`] would rewrite.
pub fn has_latex_accents(text: &str) -> bool {
    matches!(latex_to_unicode(text), Cow::Owned(ref fixed) if fixed != text)
}

fn lookup(table: &[(char, &'static str)], letter: char) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == letter)
        .map(|(_, replacement)| *replacement)
}
