//! Record source backed by the Hugging Face Hub.
//!
//! Every public dataset on the Hub has a Parquet conversion published under
//! the `refs/convert/parquet` revision, laid out as
//! `{config}/{split}/NNNN.parquet`. Shards are downloaded through the hub
//! client's local cache one at a time and decoded row by row into JSON
//! values, so a split is never held in memory as raw rows.

use std::fs::File;
use std::path::{Path, PathBuf};

use hf_hub::api::sync::{Api, ApiBuilder};
use hf_hub::{Repo, RepoType};
use parquet::errors::ParquetError;
use parquet::file::reader::SerializedFileReader;
use parquet::record::reader::RowIter;
use pp_core::core::{DatasetKind, RecordSource, RecordStream, SourceError, SplitName};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HubSettings {
    pub revision: String,
    pub config_name: String,
    pub cache_dir: Option<PathBuf>,
    pub token: Option<String>,
    pub progress: bool,
}

pub struct HubSource {
    api: Api,
    revision: String,
    config_name: String,
}

impl HubSource {
    pub fn new(settings: &HubSettings) -> Result<Self, anyhow::Error> {
        let mut builder = ApiBuilder::new().with_progress(settings.progress);
        if let Some(cache_dir) = &settings.cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        if let Some(token) = &settings.token {
            builder = builder.with_token(Some(token.clone()));
        }

        Ok(Self {
            api: builder.build()?,
            revision: settings.revision.clone(),
            config_name: settings.config_name.clone(),
        })
    }
}

impl RecordSource for HubSource {
    fn fetch(
        &self,
        dataset: DatasetKind,
        split: &SplitName,
    ) -> Result<RecordStream<'_>, SourceError> {
        let repo = self.api.repo(Repo::with_revision(
            dataset.hub_id().to_owned(),
            RepoType::Dataset,
            self.revision.clone(),
        ));
        let info = repo
            .info()
            .map_err(|err| fetch_error(dataset, split, err.to_string()))?;

        let shards = split_shards(
            info.siblings.into_iter().map(|s| s.rfilename),
            &self.config_name,
            split,
        );
        if shards.is_empty() {
            return Err(SourceError::MissingSplit {
                dataset: dataset.hub_id().to_owned(),
                split: split.clone(),
            });
        }

        let owned_split = split.clone();
        let download = move |shard: &str| {
            repo.get(shard)
                .map_err(|err| fetch_error(dataset, &owned_split, err.to_string()))
        };
        Ok(Box::new(ShardRows::new(dataset, split.clone(), shards, download)))
    }
}

fn fetch_error(dataset: DatasetKind, split: &SplitName, reason: String) -> SourceError {
    SourceError::Fetch {
        dataset: dataset.hub_id().to_owned(),
        split: split.clone(),
        reason,
    }
}

/// Selects the Parquet shards of one split from a repository file listing,
/// in shard order.
pub fn split_shards(
    files: impl IntoIterator<Item = String>,
    config_name: &str,
    split: &SplitName,
) -> Vec<String> {
    let prefix = format!("{config_name}/{split}/");
    let mut shards: Vec<String> = files
        .into_iter()
        .filter(|name| name.starts_with(&prefix) && name.ends_with(".parquet"))
        .collect();
    shards.sort();
    shards
}

// ---------------------------------------------------------------------------
// ShardRows — streams rows across shards, one open file at a time
// ---------------------------------------------------------------------------

/// Iterates the rows of `shards` in order. `resolve` turns a shard name into
/// a local file (downloading it if needed) right before it is read, so at most
/// one shard's row reader is live.
pub struct ShardRows<F> {
    dataset: DatasetKind,
    split: SplitName,
    pending: std::vec::IntoIter<String>,
    current: Option<(String, RowIter<'static>)>,
    resolve: F,
}

impl<F> ShardRows<F>
where
    F: FnMut(&str) -> Result<PathBuf, SourceError>,
{
    pub fn new(dataset: DatasetKind, split: SplitName, shards: Vec<String>, resolve: F) -> Self {
        Self {
            dataset,
            split,
            pending: shards.into_iter(),
            current: None,
            resolve,
        }
    }

    fn decode_error(&self, reason: String) -> SourceError {
        SourceError::Decode {
            dataset: self.dataset.hub_id().to_owned(),
            split: self.split.clone(),
            reason,
        }
    }
}

impl<F> Iterator for ShardRows<F>
where
    F: FnMut(&str) -> Result<PathBuf, SourceError>,
{
    type Item = Result<Value, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((shard, rows)) = self.current.as_mut() {
                match rows.next() {
                    Some(Ok(row)) => return Some(Ok(row.to_json_value())),
                    Some(Err(err)) => {
                        let reason = format!("{shard}: {err}");
                        self.current = None;
                        return Some(Err(self.decode_error(reason)));
                    }
                    None => {
                        tracing::debug!(shard = %shard, "finished shard");
                        self.current = None;
                    }
                }
                continue;
            }

            let shard = self.pending.next()?;
            tracing::info!(
                dataset = %self.dataset,
                split = %self.split,
                shard = %shard,
                "reading shard"
            );
            let path = match (self.resolve)(&shard) {
                Ok(path) => path,
                Err(err) => return Some(Err(err)),
            };
            match open_row_iter(&path) {
                Ok(rows) => self.current = Some((shard, rows)),
                Err(err) => return Some(Err(self.decode_error(format!("{shard}: {err}")))),
            }
        }
    }
}

fn open_row_iter(path: &Path) -> Result<RowIter<'static>, ParquetError> {
    let file = File::open(path).map_err(|err| ParquetError::External(Box::new(err)))?;
    let reader = SerializedFileReader::new(file)?;
    Ok(RowIter::from_file_into(Box::new(reader)))
}

/// Decodes every row of a Parquet file into a JSON object keyed by column.
pub fn read_parquet_rows(path: &Path) -> Result<Vec<Value>, ParquetError> {
    open_row_iter(path)?
        .map(|row| row.map(|row| row.to_json_value()))
        .collect()
}
