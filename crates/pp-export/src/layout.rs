use std::path::{Path, PathBuf};

use pp_core::core::Partition;

use crate::error::ExportError;

/// Every split is written as a single shard.
pub const SHARD_COUNT: usize = 1;

/// `train_prefs-00000-of-00001.parquet` style shard file name.
pub fn shard_file_name(partition: Partition, index: usize, total: usize) -> String {
    format!("{partition}_prefs-{index:05}-of-{total:05}.parquet")
}

/// File locations inside the output directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn json_path(&self, partition: Partition) -> PathBuf {
        self.dir.join(format!("{partition}.json"))
    }

    pub fn parquet_path(&self, partition: Partition) -> PathBuf {
        self.dir.join(shard_file_name(partition, 0, SHARD_COUNT))
    }

    pub fn ensure_dir(&self) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| ExportError::io(&self.dir, err))
    }
}
