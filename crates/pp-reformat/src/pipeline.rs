use std::io::ErrorKind;
use std::path::PathBuf;

use pp_core::core::{
    holdout_split, DatasetKind, LoadError, Partition, PreferencePair, RecordSource, SplitName,
    SplitOutcome, SplitPlan,
};
use pp_export::{json_to_parquet, write_json, ExportError, OutputLayout};

use crate::bootstrap::RunPlan;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to load {dataset} split {split}")]
    Load {
        dataset: DatasetKind,
        split: SplitName,
        #[source]
        source: LoadError,
    },
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionSummary {
    pub partition: Partition,
    pub rows: usize,
    pub parquet_path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub dataset: DatasetKind,
    pub train: PartitionSummary,
    pub test: PartitionSummary,
}

/// Runs the whole conversion: load and map, split, write JSON, convert each
/// JSON file to a Parquet shard, then remove the JSON files.
///
/// Intermediate JSON is removed after the conversion stage whether or not it
/// succeeded, unless `keep_json` is set.
pub fn run(plan: &RunPlan, source: &dyn RecordSource) -> Result<RunSummary, PipelineError> {
    plan.layout.ensure_dir()?;

    let outcome = load_and_split(plan, source)?;
    if outcome.train.is_empty() {
        tracing::warn!(dataset = %plan.dataset, "train split is empty");
    }
    if outcome.test.is_empty() {
        tracing::warn!(dataset = %plan.dataset, "test split is empty");
    }

    let written = write_outputs(&plan.layout, &outcome);
    if plan.keep_json {
        tracing::info!(dir = %plan.layout.dir().display(), "keeping intermediate JSON");
    } else {
        remove_intermediate(&plan.layout);
    }
    let (train, test) = written?;

    tracing::info!(
        dataset = %plan.dataset,
        train_rows = train.rows,
        test_rows = test.rows,
        dir = %plan.layout.dir().display(),
        "conversion finished"
    );

    Ok(RunSummary {
        dataset: plan.dataset,
        train,
        test,
    })
}

/// Loads the dataset's provider split(s) and produces the train/test
/// partition according to its split plan.
pub fn load_and_split(
    plan: &RunPlan,
    source: &dyn RecordSource,
) -> Result<SplitOutcome<PreferencePair>, PipelineError> {
    match plan.dataset.split_plan() {
        SplitPlan::Predefined { train, test } => {
            let train = load(plan.dataset, source, &train)?;
            let test = load(plan.dataset, source, &test)?;
            Ok(SplitOutcome::new(train, test))
        }
        SplitPlan::Holdout { source: split } => {
            let records = load(plan.dataset, source, &split)?;
            tracing::info!(
                seed = plan.seed,
                seed_source = ?plan.seed_source,
                test_size = plan.test_size,
                records = records.len(),
                "shuffling for holdout split"
            );
            if records.len() <= plan.test_size {
                tracing::warn!(
                    records = records.len(),
                    test_size = plan.test_size,
                    "dataset smaller than holdout, all records go to test"
                );
            }
            Ok(holdout_split(records, plan.test_size, plan.seed))
        }
    }
}

fn load(
    dataset: DatasetKind,
    source: &dyn RecordSource,
    split: &SplitName,
) -> Result<Vec<PreferencePair>, PipelineError> {
    tracing::info!(dataset = %dataset, split = %split, "loading split");
    let pairs = dataset
        .load_split(source, split)
        .map_err(|source| PipelineError::Load {
            dataset,
            split: split.clone(),
            source,
        })?;
    tracing::info!(dataset = %dataset, split = %split, records = pairs.len(), "mapped split");
    Ok(pairs)
}

fn write_outputs(
    layout: &OutputLayout,
    outcome: &SplitOutcome<PreferencePair>,
) -> Result<(PartitionSummary, PartitionSummary), ExportError> {
    write_json(&outcome.train, &layout.json_path(Partition::Train))?;
    write_json(&outcome.test, &layout.json_path(Partition::Test))?;

    // Both shards are attempted so a failed train write never leaves a
    // stale test shard behind.
    let train = convert(layout, Partition::Train);
    let test = convert(layout, Partition::Test);
    Ok((train?, test?))
}

fn convert(layout: &OutputLayout, partition: Partition) -> Result<PartitionSummary, ExportError> {
    let json_path = layout.json_path(partition);
    let parquet_path = layout.parquet_path(partition);

    let rows = json_to_parquet(&json_path, &parquet_path)?;
    tracing::info!(
        partition = %partition,
        rows,
        path = %parquet_path.display(),
        "wrote parquet shard"
    );

    Ok(PartitionSummary {
        partition,
        rows,
        parquet_path,
    })
}

/// Best-effort removal of the intermediate JSON files.
pub fn remove_intermediate(layout: &OutputLayout) {
    for partition in Partition::ALL {
        let path = layout.json_path(partition);
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed intermediate JSON"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                error = %err,
                path = %path.display(),
                "failed to remove intermediate JSON"
            ),
        }
    }
}
