//! Per-author index built from papers, and LaTeX repair of author names.

use std::collections::btree_map::Entry;

use tracing::{debug, info};

use confscope_core::{AuthorEntry, AuthorIndex, AuthorPaper, Paper};

use crate::report::NameChange;
use crate::text::{author_slug, has_latex_accents, latex_to_unicode};

/// Group the authors of `papers` by slug.
///
/// Each entry keeps the papers in input order with their coauthors, the
/// union of coauthors across papers and the first non-empty affiliation.
pub fn build_author_index(papers: &[Paper]) -> AuthorIndex {
    let mut index = AuthorIndex::new();

    for paper in papers {
        for author in &paper.authors {
            let slug = author_slug(&author.full_name);
            if slug.is_empty() {
                debug!(paper = %paper.paper_number, "skipping author without usable name");
                continue;
            }

            let coauthors: Vec<String> = paper
                .authors
                .iter()
                .filter(|other| other.full_name != author.full_name)
                .map(|other| other.full_name.clone())
                .collect();

            let entry = index.entry(slug.clone()).or_insert_with(|| AuthorEntry {
                name: author.full_name.clone(),
                slug,
                ..Default::default()
            });

            if entry.affiliation.is_empty()
                && let Some(affiliation) = author.affiliation.as_deref()
            {
                entry.affiliation = affiliation.to_string();
            }

            for name in &coauthors {
                if !entry.coauthors.contains(name) {
                    entry.coauthors.push(name.clone());
                }
            }

            if !entry
                .papers
                .iter()
                .any(|p| p.paper_number == paper.paper_number)
            {
                entry.papers.push(AuthorPaper {
                    paper_number: paper.paper_number.clone(),
                    title: paper.title.clone(),
                    coauthors,
                });
            }
        }
    }

    info!(authors = index.len(), papers = papers.len(), "built author index");
    index
}

/// Entries whose name or coauthors still hold LaTeX accent sequences.
pub fn count_latex_entries(index: &AuthorIndex) -> usize {
    index
        .values()
        .filter(|entry| {
            has_latex_accents(&entry.name)
                || entry.coauthors.iter().any(|name| has_latex_accents(name))
        })
        .count()
}

/// Decode LaTeX accents in author names and re-key entries by the repaired
/// slug. Entries that end up on the same slug are merged.
pub fn fix_latex_authors(index: AuthorIndex) -> (AuthorIndex, Vec<NameChange>) {
    let mut fixed = AuthorIndex::new();
    let mut changes = Vec::new();

    for (old_slug, mut entry) in index {
        let old_name = entry.name.clone();
        let new_name = latex_to_unicode(&old_name).into_owned();
        let new_slug = Some(author_slug(&new_name))
            .filter(|slug| !slug.is_empty())
            .unwrap_or_else(|| old_slug.clone());

        for paper in &mut entry.papers {
            fix_names(&mut paper.coauthors);
        }
        fix_names(&mut entry.coauthors);
        entry.name = new_name.clone();
        entry.slug = new_slug.clone();

        if old_name != new_name || old_slug != new_slug {
            changes.push(NameChange {
                old_slug,
                new_slug: new_slug.clone(),
                old_name,
                new_name,
            });
        }

        match fixed.entry(new_slug) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(mut slot) => {
                debug!(slug = %slot.key(), "merging authors sharing a repaired slug");
                slot.get_mut().absorb(entry);
            }
        }
    }

    info!(changes = changes.len(), authors = fixed.len(), "repaired LaTeX author names");
    (fixed, changes)
}

/// Decode LaTeX accents in the author names of `papers`. Returns how many
/// papers changed.
pub fn fix_paper_authors(papers: &mut [Paper]) -> usize {
    let mut changed = 0;
    for paper in papers.iter_mut() {
        let mut touched = fix_names(&mut paper.author_names);
        for author in &mut paper.authors {
            touched |= fix_name(&mut author.first);
            touched |= fix_name(&mut author.last);
            touched |= fix_name(&mut author.full_name);
        }
        if touched {
            changed += 1;
        }
    }
    changed
}

fn fix_names(names: &mut [String]) -> bool {
    let mut touched = false;
    for name in names.iter_mut() {
        touched |= fix_name(name);
    }
    touched
}

fn fix_name(name: &mut String) -> bool {
    let fixed = latex_to_unicode(name);
    if fixed == name.as_str() {
        return false;
    }
    let fixed = fixed.into_owned();
    *name = fixed;
    true
}
