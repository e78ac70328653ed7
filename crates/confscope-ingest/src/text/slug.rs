//! URL-safe identifiers for authors and papers.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use confscope_core::PaperAuthor;

use super::latex::latex_to_unicode;
use crate::matching::normalize::fold_to_ascii;

/// Characters of the title kept in a paper number.
const PAPER_TITLE_CHARS: usize = 50;

/// Slug for an author name: LaTeX decoded, accents stripped, lowercased,
/// punctuation dropped, whitespace and hyphen runs joined by a single `-`.
///
/// Letters without a decomposition (CJK, Cyrillic, ...) are kept as is.
pub fn author_slug(name: &str) -> String {
    let decoded = latex_to_unicode(name);
    let stripped: String = decoded
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    join_dashed(&stripped)
}

/// Slug of the first author's last name, with `-etal` for multi-author
/// papers and `unknown` when there are no authors.
pub fn first_author_slug(authors: &[PaperAuthor]) -> String {
    let Some(first) = authors.first() else {
        return "unknown".to_string();
    };

    let mut slug = ascii_slug(&first.last);
    if authors.len() > 1 {
        slug.push_str("-etal");
    }
    slug
}

/// Stable paper identifier: `{first-author}-{year}-{title prefix}`, limited
/// to `[a-z0-9-]`.
pub fn paper_number(authors: &[PaperAuthor], year: i32, title: &str) -> String {
    let title_part: String = fold_to_ascii(title)
        .to_ascii_lowercase()
        .replace(' ', "-")
        .chars()
        .take(PAPER_TITLE_CHARS)
        .collect();

    format!("{}-{year}-{title_part}", first_author_slug(authors))
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

fn ascii_slug(text: &str) -> String {
    let lowered = fold_to_ascii(text).to_ascii_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

fn join_dashed(text: &str) -> String {
    text.split(|c: char| c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
