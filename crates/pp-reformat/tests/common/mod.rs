#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use pp_core::core::{DatasetKind, RecordSource, RecordStream, SourceError, SplitName};
use pp_export::OutputLayout;
use pp_reformat::bootstrap::{RunPlan, SeedSource};
use pp_reformat::hub::{read_parquet_rows, HubSettings};
use pp_reformat::logging::LogFormat;
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// InMemorySource — serves canned rows per (dataset, split)
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct InMemorySource {
    splits: HashMap<(DatasetKind, String), Vec<Value>>,
}

impl InMemorySource {
    pub fn with_split(mut self, dataset: DatasetKind, split: &str, rows: Vec<Value>) -> Self {
        self.splits.insert((dataset, split.to_owned()), rows);
        self
    }
}

impl RecordSource for InMemorySource {
    fn fetch(
        &self,
        dataset: DatasetKind,
        split: &SplitName,
    ) -> Result<RecordStream<'_>, SourceError> {
        self.splits
            .get(&(dataset, split.as_str().to_owned()))
            .map(|rows| Box::new(rows.iter().cloned().map(Ok)) as RecordStream<'_>)
            .ok_or_else(|| SourceError::MissingSplit {
                dataset: dataset.hub_id().to_owned(),
                split: split.clone(),
            })
    }
}

// ---------------------------------------------------------------------------
// FailingSource — every fetch fails as if the hub were unreachable
// ---------------------------------------------------------------------------

pub struct FailingSource;

impl RecordSource for FailingSource {
    fn fetch(
        &self,
        dataset: DatasetKind,
        split: &SplitName,
    ) -> Result<RecordStream<'_>, SourceError> {
        Err(SourceError::Fetch {
            dataset: dataset.hub_id().to_owned(),
            split: split.clone(),
            reason: "network unreachable".to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn ultrachat_row(prompt: &str, answer: &str) -> Value {
    json!({
        "prompt": prompt,
        "prompt_id": format!("id-{prompt}"),
        "messages": [
            {"role": "user", "content": prompt},
            {"role": "assistant", "content": answer}
        ]
    })
}

pub fn metamath_row(query: &str, response: &str) -> Value {
    json!({
        "query": query,
        "response": response,
        "type": "GSM_AnsAug",
        "original_question": query
    })
}

pub fn metamath_rows(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| metamath_row(&format!("q{i}"), &format!("a{i}")))
        .collect()
}

pub fn make_plan(dataset: DatasetKind, dir: &Path) -> RunPlan {
    RunPlan {
        dataset,
        layout: OutputLayout::new(dir),
        seed: 42,
        seed_source: SeedSource::Configured,
        test_size: 1000,
        keep_json: false,
        hub: HubSettings {
            revision: "refs/convert/parquet".to_owned(),
            config_name: "default".to_owned(),
            cache_dir: None,
            token: None,
            progress: false,
        },
        log_level: "info".to_owned(),
        log_format: LogFormat::Pretty,
    }
}

/// User prompts of every row in a Parquet shard, in file order.
pub fn parquet_prompts(path: &Path) -> Vec<String> {
    read_parquet_rows(path)
        .expect("readable parquet")
        .into_iter()
        .map(|row| {
            row["chosen"][0]["content"]
                .as_str()
                .expect("prompt string")
                .to_owned()
        })
        .collect()
}
