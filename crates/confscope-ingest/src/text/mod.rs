//! Name and identifier text helpers.

pub mod latex;
pub mod slug;

pub use latex::{has_latex_accents, latex_to_unicode};
pub use slug::{author_slug, first_author_slug, paper_number};
