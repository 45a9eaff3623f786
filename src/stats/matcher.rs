use rayon::prelude::*;
use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::{Author, Publication};

/// Case-insensitive "Last, First" search over a free-text author field.
/// The name must be delimited by non-alphanumerics (or the ends of the
/// field), so "Lee, Amy" matches neither "Klee, Amy" nor "Lee, Amyra".
/// Punctuation counts as a delimiter: "Smith-Lee, Amy" and "O'Lee, Amy"
/// both match "Lee, Amy".
#[derive(Debug, Clone)]
pub struct NamePattern {
    name: String,
    regex: Option<Regex>,
}

impl NamePattern {
    pub fn new(name: &str) -> Result<Self> {
        let body = name
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join(r"\s*,\s*");

        let regex = if body.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(
                r"(?i)(?:^|[^\p{{L}}\p{{N}}]){}(?:$|[^\p{{L}}\p{{N}}])",
                body
            ))?)
        };

        Ok(Self {
            name: name.trim().to_string(),
            regex,
        })
    }

    pub fn for_author(author: &Author) -> Result<Self> {
        Self::new(&author.display_name())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, authors_field: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|re| re.is_match(authors_field))
    }

    pub fn select<'p>(&self, publications: &'p [Publication]) -> Vec<&'p Publication> {
        publications
            .iter()
            .filter(|p| self.matches(&p.authors))
            .collect()
    }
}

/// Author -> matched publications, built once per aggregation call.
/// Entries keep the order of the author slice.
pub struct AuthorIndex<'a> {
    entries: Vec<(&'a Author, Vec<&'a Publication>)>,
}

impl<'a> AuthorIndex<'a> {
    pub fn build(authors: &'a [Author], publications: &'a [Publication]) -> Result<Self> {
        let entries = authors
            .par_iter()
            .map(|author| -> Result<(&'a Author, Vec<&'a Publication>)> {
                let pattern = NamePattern::for_author(author)?;
                Ok((author, pattern.select(publications)))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Indexed {} authors against {} publications",
            entries.len(),
            publications.len()
        );

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a Author, &[&'a Publication])> + '_ {
        self.entries
            .iter()
            .map(|(author, pubs)| (*author, pubs.as_slice()))
    }

    pub fn publications_of(&self, enid: u64) -> Option<&[&'a Publication]> {
        self.entries
            .iter()
            .find(|(author, _)| author.enid == enid)
            .map(|(_, pubs)| pubs.as_slice())
    }
}
