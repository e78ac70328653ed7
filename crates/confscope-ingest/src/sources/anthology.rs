//! ACL Anthology volume XML → papers.
//!
//! The anthology nests `<paper>` elements under `<volume>`s and marks up
//! titles with inline elements such as `<fixed-case>`, so the parser walks
//! the event stream and gathers all text inside each field element.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, info};

use confscope_core::{ConfscopeError, Paper, PaperAuthor};

use crate::error::Result;
use crate::text::paper_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Abstract,
    Pages,
    Url,
    Bibkey,
    Doi,
    First,
    Last,
    Affiliation,
}

impl Field {
    fn of_paper(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"abstract" => Some(Self::Abstract),
            b"pages" => Some(Self::Pages),
            b"url" => Some(Self::Url),
            b"bibkey" => Some(Self::Bibkey),
            b"doi" => Some(Self::Doi),
            _ => None,
        }
    }

    fn of_author(name: &[u8]) -> Option<Self> {
        match name {
            b"first" => Some(Self::First),
            b"last" => Some(Self::Last),
            b"affiliation" => Some(Self::Affiliation),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct PaperDraft {
    depth: usize,
    xml_id: String,
    title: String,
    abstract_text: String,
    pages: String,
    url: String,
    bibkey: String,
    doi: String,
    authors: Vec<PaperAuthor>,
}

#[derive(Debug, Default)]
struct AuthorDraft {
    depth: usize,
    first: String,
    last: String,
    affiliation: String,
}

impl AuthorDraft {
    fn finish(self) -> Option<PaperAuthor> {
        let first = collapse_whitespace(&self.first);
        let last = collapse_whitespace(&self.last);
        if first.is_empty() && last.is_empty() {
            return None;
        }
        let mut author = PaperAuthor::new(first, last);
        let affiliation = collapse_whitespace(&self.affiliation);
        if !affiliation.is_empty() {
            author.affiliation = Some(affiliation);
        }
        Some(author)
    }
}

impl PaperDraft {
    fn buffer<'a>(
        &'a mut self,
        field: Field,
        author: Option<&'a mut AuthorDraft>,
    ) -> Option<&'a mut String> {
        match (field, author) {
            (Field::First, Some(a)) => Some(&mut a.first),
            (Field::Last, Some(a)) => Some(&mut a.last),
            (Field::Affiliation, Some(a)) => Some(&mut a.affiliation),
            (Field::Title, _) => Some(&mut self.title),
            (Field::Abstract, _) => Some(&mut self.abstract_text),
            (Field::Pages, _) => Some(&mut self.pages),
            (Field::Url, _) => Some(&mut self.url),
            (Field::Bibkey, _) => Some(&mut self.bibkey),
            (Field::Doi, _) => Some(&mut self.doi),
            _ => None,
        }
    }

    fn finish(self, year: i32) -> Paper {
        let title = collapse_whitespace(&self.title);
        let mut paper = Paper::new(paper_number(&self.authors, year, &title), title);
        paper.abstract_text = collapse_whitespace(&self.abstract_text);
        paper.xml_id = non_empty(&self.xml_id);
        paper.pages = non_empty(&self.pages);
        paper.url = non_empty(&self.url);
        paper.bibkey = non_empty(&self.bibkey);
        paper.doi = non_empty(&self.doi);
        paper.year = Some(year);
        paper.author_names = self.authors.iter().map(|a| a.full_name.clone()).collect();
        paper.authors = self.authors;
        paper
    }
}

/// Parse every `<paper>` in an anthology document, at any depth.
pub fn parse_anthology(xml: &str, year: i32) -> Result<Vec<Paper>> {
    let mut reader = Reader::from_str(xml);

    let mut papers = Vec::new();
    let mut depth = 0usize;
    let mut paper: Option<PaperDraft> = None;
    let mut author: Option<AuthorDraft> = None;
    let mut capture: Option<(Field, usize)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = e.local_name();
                if paper.is_none() {
                    if name.as_ref() == b"paper" {
                        paper = Some(PaperDraft {
                            depth,
                            xml_id: attribute(&e, "id")?.unwrap_or_default(),
                            ..Default::default()
                        });
                    }
                } else if capture.is_none()
                    && let Some(draft) = paper.as_ref()
                {
                    if let Some(current) = author.as_ref() {
                        if depth == current.depth + 1 {
                            capture = Field::of_author(name.as_ref()).map(|f| (f, depth));
                        }
                    } else if depth == draft.depth + 1 {
                        if name.as_ref() == b"author" {
                            author = Some(AuthorDraft {
                                depth,
                                ..Default::default()
                            });
                        } else {
                            capture = Field::of_paper(name.as_ref()).map(|f| (f, depth));
                        }
                    }
                }
            }
            Event::End(_) => {
                if capture.is_some_and(|(_, at)| at == depth) {
                    capture = None;
                }
                if author.as_ref().is_some_and(|a| a.depth == depth)
                    && let (Some(done), Some(draft)) = (author.take(), paper.as_mut())
                    && let Some(finished) = done.finish()
                {
                    draft.authors.push(finished);
                }
                if paper.as_ref().is_some_and(|p| p.depth == depth)
                    && let Some(done) = paper.take()
                {
                    papers.push(done.finish(year));
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) => {
                if let (Some((field, _)), Some(draft)) = (capture, paper.as_mut()) {
                    let text = t.unescape()?;
                    if let Some(buffer) = draft.buffer(field, author.as_mut()) {
                        buffer.push_str(&text);
                    }
                }
            }
            Event::CData(c) => {
                if let (Some((field, _)), Some(draft)) = (capture, paper.as_mut())
                    && let Some(buffer) = draft.buffer(field, author.as_mut())
                {
                    buffer.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(papers = papers.len(), "parsed anthology document");
    Ok(papers)
}

/// Read and parse an anthology XML file.
pub fn load_anthology(path: &Path, year: i32) -> Result<Vec<Paper>> {
    if !path.exists() {
        return Err(ConfscopeError::FileNotFound(path.display().to_string()).into());
    }
    let xml = std::fs::read_to_string(path)?;
    let papers = parse_anthology(&xml, year)?;
    info!(path = %path.display(), papers = papers.len(), "loaded anthology");
    Ok(papers)
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    match element.try_get_attribute(name)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: &str) -> Option<String> {
    Some(collapse_whitespace(text)).filter(|value| !value.is_empty())
}
