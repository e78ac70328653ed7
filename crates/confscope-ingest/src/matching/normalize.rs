//! Title normalization: raw title → order-insensitive comparison key.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Characters replaced before Unicode decomposition. Covers letters that do
/// not decompose to ASCII (ß, æ, ø, ł, ...) and typographic punctuation.
/// Umlauts fold to their base letter so `Gürbüz` and `Gurbuz` agree.
pub const SUBSTITUTIONS: &[(char, &str)] = &[
    ('ä', "a"), ('ö', "o"), ('ü', "u"),
    ('Ä', "A"), ('Ö', "O"), ('Ü', "U"),
    ('ß', "ss"), ('ẞ', "SS"),
    ('à', "a"), ('á', "a"), ('â', "a"), ('ã', "a"), ('å', "a"),
    ('ç', "c"),
    ('è', "e"), ('é', "e"), ('ê', "e"), ('ë', "e"),
    ('ì', "i"), ('í', "i"), ('î', "i"), ('ï', "i"), ('ı', "i"),
    ('ñ', "n"),
    ('ò', "o"), ('ó', "o"), ('ô', "o"), ('õ', "o"), ('ø', "o"), ('Ø', "O"),
    ('ù', "u"), ('ú', "u"), ('û', "u"),
    ('ý', "y"), ('ÿ', "y"),
    ('œ', "oe"), ('Œ', "OE"), ('æ', "ae"), ('Æ', "AE"),
    ('ł', "l"), ('Ł', "L"), ('đ', "d"), ('Đ', "D"), ('þ', "th"), ('Þ', "TH"),
    ('–', "-"), ('—', "-"),
    ('\u{201C}', "\""), ('\u{201D}', "\""), ('\u{2018}', "'"), ('\u{2019}', "'"),
    ('…', "..."),
    ('′', "'"), ('″', "\""), ('‴', "\""),
];

/// Words that carry no signal when comparing paper titles.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "before", "after", "above", "below",
    "between", "among", "within", "without", "toward", "against", "upon", "towards", "onto",
    "beneath", "under", "over", "via", "using", "based", "across", "amongst", "whilst", "while",
];

/// Tokens this short or shorter are dropped.
pub const MIN_TOKEN_LEN: usize = 3;

static SUBSTITUTION_MAP: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| SUBSTITUTIONS.iter().copied().collect());

static STOP_WORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORDS.iter().copied().collect());

/// Reduce a title to its comparison key.
///
/// The key is lowercase ASCII, free of punctuation, stop words and tokens
/// shorter than [`MIN_TOKEN_LEN`], with the remaining tokens sorted. An
/// empty key means the title has nothing to match on.
pub fn normalize(title: &str) -> String {
    let ascii = fold_to_ascii(title).to_ascii_lowercase();

    let cleaned: String = ascii
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_ascii_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|token| is_significant(token))
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Apply [`SUBSTITUTIONS`], decompose, and drop combining marks and every
/// character still outside ASCII. Case and punctuation are kept.
pub fn fold_to_ascii(text: &str) -> String {
    substitute(text)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .collect()
}

/// Missing titles normalize to the empty key.
pub fn normalize_opt(title: Option<&str>) -> String {
    title.map(normalize).unwrap_or_default()
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

fn is_significant(token: &str) -> bool {
    token.len() >= MIN_TOKEN_LEN && !is_stop_word(token)
}

fn substitute(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match SUBSTITUTION_MAP.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLES: &[&str] = &[
        "Deep Learning for NLP",
        "Neural  Machine Translation!!",
        "“Attention” Is All You Need — Revisited…",
        "Gürbüz: Über die Straße",
        "ÆSOP: Œuvres complètes",
        "A Study of x-vectors in 3D",
        "",
        "of the and",
    ];

    #[test]
    fn empty_and_missing_titles_normalize_to_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize_opt(Some("   ")), "");
    }

    #[test]
    fn only_stop_words_and_short_tokens_yield_empty_key() {
        assert_eq!(normalize("Of the and in a"), "");
        assert_eq!(normalize("AI & ML: an NN"), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for title in TITLES {
            let once = normalize(title);
            assert_eq!(normalize(&once), once, "title: {title}");
        }
    }

    #[test]
    fn normalize_ignores_word_order() {
        assert_eq!(
            normalize("Deep Learning for NLP"),
            normalize("NLP for Deep Learning")
        );
        assert_eq!(normalize("Deep Learning for NLP"), "deep learning nlp");
    }

    #[test]
    fn normalize_absorbs_punctuation_and_whitespace() {
        assert_eq!(
            normalize("Neural  Machine Translation!!"),
            normalize("Neural Machine Translation")
        );
        assert_eq!(normalize("Neural Machine Translation"), "machine neural translation");
    }

    #[test]
    fn diacritics_fold_to_ascii() {
        assert_eq!(normalize("Gürbüz"), normalize("Gurbuz"));
        assert_eq!(normalize("Straße"), "strasse");
        assert_eq!(normalize("Œuvres complètes"), "completes oeuvres");
        assert_eq!(normalize("Žluťoučký kůň"), "kun zlutoucky");
    }

    #[test]
    fn capital_umlauts_fold_to_single_letters() {
        assert_eq!(normalize("Über Sprachmodelle"), "sprachmodelle uber");
        assert_eq!(normalize("Öl und Äpfel"), normalize("Ol und Apfel"));
        assert_ne!(normalize("Über Sprachmodelle"), normalize("Ueber Sprachmodelle"));
    }

    #[test]
    fn fold_keeps_case_and_punctuation() {
        assert_eq!(fold_to_ascii("Glavaš, Goran"), "Glavas, Goran");
        assert_eq!(fold_to_ascii("Æsop – Ørsted"), "AEsop - Orsted");
    }

    #[test]
    fn non_latin_characters_are_dropped() {
        assert_eq!(normalize("Transformer 变换器 Models"), "models transformer");
    }

    #[test]
    fn typographic_punctuation_splits_tokens() {
        assert_eq!(normalize("Zero–Shot Parsing"), "parsing shot zero");
        assert_eq!(normalize("“Quoted” Title…"), "quoted title");
    }

    #[test]
    fn tables_are_consistent() {
        for (c, replacement) in SUBSTITUTIONS {
            assert!(!c.is_ascii(), "{c} needs no substitution");
            assert!(replacement.is_ascii(), "{c} maps to non-ASCII");
        }
        for word in STOP_WORDS {
            assert_eq!(*word, word.to_ascii_lowercase());
        }
        let unique: HashSet<_> = SUBSTITUTIONS.iter().map(|(c, _)| c).collect();
        assert_eq!(unique.len(), SUBSTITUTIONS.len());
    }
}
