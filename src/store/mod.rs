//! Read access to the author and publication collections, either from a
//! snapshot directory or from the document API.

use clap::Args;
use std::path::PathBuf;
use tracing::info;

use crate::error::{Result, StatsError};
use crate::stats::resolver;
use crate::{Author, Publication};

mod files;
mod remote;
pub use files::{find_snapshot_files, read_jsonl, FileStore};
pub use remote::RemoteStore;

#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Snapshot directory holding authors*.jsonl[.gz] and publications*.jsonl[.gz]
    #[arg(short, long, conflicts_with = "api_url", required_unless_present = "api_url")]
    pub data: Option<PathBuf>,

    /// Document API base URL
    #[arg(short = 'u', long)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl SourceArgs {
    pub fn open(&self) -> Result<Store> {
        match (&self.data, &self.api_url) {
            (Some(dir), _) => Ok(Store::Files(FileStore::new(dir))),
            (None, Some(url)) => Ok(Store::Remote(RemoteStore::new(url.clone(), self.timeout)?)),
            (None, None) => Err(StatsError::Storage(
                "no data source given; pass --data or --api-url".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub authors: Vec<Author>,
    pub publications: Vec<Publication>,
}

pub enum Store {
    Files(FileStore),
    Remote(RemoteStore),
}

impl Store {
    pub async fn authors(&self) -> Result<Vec<Author>> {
        match self {
            Store::Files(files) => {
                let files = files.clone();
                blocking(move || files.read_authors()).await
            }
            Store::Remote(remote) => remote.authors().await,
        }
    }

    pub async fn publications(&self) -> Result<Vec<Publication>> {
        match self {
            Store::Files(files) => {
                let files = files.clone();
                blocking(move || files.read_publications()).await
            }
            Store::Remote(remote) => remote.publications().await,
        }
    }

    pub async fn author_by_email(&self, email: &str) -> Result<Option<Author>> {
        match self {
            Store::Files(_) => {
                let authors = self.authors().await?;
                Ok(resolver::find_by_email(&authors, email).cloned())
            }
            Store::Remote(remote) => remote.author_by_email(email).await,
        }
    }

    pub async fn author_by_enid(&self, enid: u64) -> Result<Option<Author>> {
        match self {
            Store::Files(_) => {
                let authors = self.authors().await?;
                Ok(resolver::find_by_enid(&authors, enid).cloned())
            }
            Store::Remote(remote) => remote.author_by_enid(enid).await,
        }
    }

    /// Both collections, read concurrently.
    pub async fn corpus(&self) -> Result<Corpus> {
        let (authors, publications) = tokio::try_join!(self.authors(), self.publications())?;
        info!(
            "Loaded {} authors and {} publications",
            authors.len(),
            publications.len()
        );
        Ok(Corpus {
            authors,
            publications,
        })
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StatsError::Storage(format!("snapshot reader failed: {}", e)))?
}
