use crate::error::{Result, StatsError};
use crate::store::Store;
use crate::Author;

pub async fn resolve_by_email(store: &Store, email: &str) -> Result<Author> {
    store
        .author_by_email(email)
        .await?
        .ok_or_else(|| StatsError::AuthorNotFound(email.trim().to_string()))
}

pub async fn resolve_by_enid(store: &Store, enid: u64) -> Result<Author> {
    store
        .author_by_enid(enid)
        .await?
        .ok_or_else(|| StatsError::AuthorNotFound(enid.to_string()))
}

/// Case-insensitive exact match, ignoring surrounding whitespace.
pub fn find_by_email<'a>(authors: &'a [Author], email: &str) -> Option<&'a Author> {
    let email = email.trim();
    if email.is_empty() {
        return None;
    }
    authors
        .iter()
        .find(|a| a.email.trim().eq_ignore_ascii_case(email))
}

pub fn find_by_enid(authors: &[Author], enid: u64) -> Option<&Author> {
    authors.iter().find(|a| a.enid == enid)
}
