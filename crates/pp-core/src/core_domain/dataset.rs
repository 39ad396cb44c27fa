use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::core::{
    ConversationTurn, DatasetError, LoadError, MapError, PreferencePair, RecordSource, Role,
    SplitName,
};

// ---------------------------------------------------------------------------
// DatasetKind — the supported source datasets
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Ultrachat,
    MetaMath,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Ultrachat, DatasetKind::MetaMath];

    /// Repository id on the Hugging Face Hub.
    pub fn hub_id(&self) -> &'static str {
        match self {
            DatasetKind::Ultrachat => "HuggingFaceH4/ultrachat_200k",
            DatasetKind::MetaMath => "meta-math/MetaMathQA",
        }
    }

    pub fn split_plan(&self) -> SplitPlan {
        match self {
            DatasetKind::Ultrachat => SplitPlan::Predefined {
                train: SplitName::new("train_sft"),
                test: SplitName::new("test_sft"),
            },
            DatasetKind::MetaMath => SplitPlan::Holdout {
                source: SplitName::new("train"),
            },
        }
    }

    /// Maps one raw source record into a preference pair. `index` is the
    /// record's position within its split and only used for error reporting.
    pub fn map_record(&self, index: usize, record: Value) -> Result<PreferencePair, MapError> {
        match self {
            DatasetKind::Ultrachat => map_ultrachat(index, record),
            DatasetKind::MetaMath => map_metamath(index, record),
        }
    }

    pub fn map_records(&self, records: Vec<Value>) -> Result<Vec<PreferencePair>, MapError> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| self.map_record(index, record))
            .collect()
    }

    /// Fetches one provider split from `source` and maps each record as it
    /// is decoded, so only the mapped pairs are held in memory.
    pub fn load_split(
        &self,
        source: &dyn RecordSource,
        split: &SplitName,
    ) -> Result<Vec<PreferencePair>, LoadError> {
        let mut pairs = Vec::new();
        for (index, record) in source.fetch(*self, split)?.enumerate() {
            pairs.push(self.map_record(index, record?)?);
        }
        Ok(pairs)
    }

    fn supported_ids() -> String {
        Self::ALL
            .iter()
            .map(DatasetKind::hub_id)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for DatasetKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.hub_id() == s)
            .ok_or_else(|| DatasetError::UnknownDataset {
                name: s.to_owned(),
                supported: Self::supported_ids(),
            })
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hub_id())
    }
}

// ---------------------------------------------------------------------------
// SplitPlan — where train/test records come from
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitPlan {
    /// The provider ships separate train and test splits.
    Predefined { train: SplitName, test: SplitName },
    /// A single provider split is shuffled and a test holdout carved off.
    Holdout { source: SplitName },
}

// ---------------------------------------------------------------------------
// Record mappers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct UltrachatRecord {
    messages: Vec<ConversationTurn>,
}

#[derive(Deserialize)]
struct MetaMathRecord {
    query: String,
    response: String,
}

fn map_ultrachat(index: usize, record: Value) -> Result<PreferencePair, MapError> {
    let record: UltrachatRecord =
        serde_json::from_value(record).map_err(|err| MapError::Malformed {
            index,
            reason: err.to_string(),
        })?;

    let found = record.messages.len();
    let mut messages = record.messages.into_iter();
    let (Some(prompt), Some(answer)) = (messages.next(), messages.next()) else {
        return Err(MapError::TooFewMessages { index, found });
    };

    for (position, turn, expected) in [(0, &prompt, Role::User), (1, &answer, Role::Assistant)] {
        if turn.role != expected {
            return Err(MapError::UnexpectedRole {
                index,
                position,
                expected,
                found: turn.role,
            });
        }
    }

    Ok(PreferencePair::new(prompt.content, answer.content))
}

fn map_metamath(index: usize, record: Value) -> Result<PreferencePair, MapError> {
    let record: MetaMathRecord =
        serde_json::from_value(record).map_err(|err| MapError::Malformed {
            index,
            reason: err.to_string(),
        })?;

    Ok(PreferencePair::new(record.query, record.response))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::{RecordStream, SourceError};

    #[test]
    fn test_parse_known_datasets() {
        assert_eq!(
            "HuggingFaceH4/ultrachat_200k".parse::<DatasetKind>(),
            Ok(DatasetKind::Ultrachat)
        );
        assert_eq!(
            "meta-math/MetaMathQA".parse::<DatasetKind>(),
            Ok(DatasetKind::MetaMath)
        );
    }

    #[test]
    fn test_parse_unknown_dataset_is_explicit_error() {
        let err = "tatsu-lab/alpaca".parse::<DatasetKind>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown dataset \"tatsu-lab/alpaca\", expected one of: \
             HuggingFaceH4/ultrachat_200k, meta-math/MetaMathQA"
        );
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.to_string().parse::<DatasetKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_split_plans() {
        assert_eq!(
            DatasetKind::Ultrachat.split_plan(),
            SplitPlan::Predefined {
                train: SplitName::new("train_sft"),
                test: SplitName::new("test_sft"),
            }
        );
        assert_eq!(
            DatasetKind::MetaMath.split_plan(),
            SplitPlan::Holdout {
                source: SplitName::new("train"),
            }
        );
    }

    #[test]
    fn test_ultrachat_scenario() {
        let record = json!({
            "messages": [
                {"role": "user", "content": "Hi"},
                {"role": "assistant", "content": "Hello"}
            ]
        });

        let pair = DatasetKind::Ultrachat.map_record(0, record).unwrap();

        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            json!({
                "chosen": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello"}
                ],
                "rejected": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": ""}
                ]
            })
        );
    }

    #[test]
    fn test_ultrachat_uses_first_two_messages_only() {
        let record = json!({
            "prompt": "Explain rust",
            "prompt_id": "abc123",
            "messages": [
                {"role": "user", "content": "Explain rust"},
                {"role": "assistant", "content": "A systems language."},
                {"role": "user", "content": "More?"},
                {"role": "assistant", "content": "Ownership."}
            ]
        });

        let pair = DatasetKind::Ultrachat.map_record(0, record).unwrap();

        assert_eq!(pair.chosen()[0], ConversationTurn::user("Explain rust"));
        assert_eq!(
            pair.chosen()[1],
            ConversationTurn::assistant("A systems language.")
        );
        assert_eq!(pair.rejected()[1].content, "");
    }

    #[test]
    fn test_ultrachat_too_few_messages() {
        let record = json!({"messages": [{"role": "user", "content": "Hi"}]});
        let err = DatasetKind::Ultrachat.map_record(4, record).unwrap_err();
        assert_eq!(err, MapError::TooFewMessages { index: 4, found: 1 });

        let empty = json!({"messages": []});
        let err = DatasetKind::Ultrachat.map_record(5, empty).unwrap_err();
        assert_eq!(err, MapError::TooFewMessages { index: 5, found: 0 });
    }

    #[test]
    fn test_ultrachat_unexpected_role() {
        let record = json!({
            "messages": [
                {"role": "user", "content": "Hi"},
                {"role": "user", "content": "Anyone?"}
            ]
        });
        let err = DatasetKind::Ultrachat.map_record(0, record).unwrap_err();
        assert_eq!(
            err,
            MapError::UnexpectedRole {
                index: 0,
                position: 1,
                expected: Role::Assistant,
                found: Role::User,
            }
        );
    }

    #[test]
    fn test_ultrachat_missing_messages_field() {
        let err = DatasetKind::Ultrachat
            .map_record(9, json!({"text": "nope"}))
            .unwrap_err();
        assert!(matches!(err, MapError::Malformed { index: 9, .. }));
    }

    #[test]
    fn test_metamath_scenario() {
        let record = json!({
            "query": "2+2?",
            "response": "4",
            "type": "GSM_Rephrased",
            "original_question": "What is 2+2?"
        });

        let pair = DatasetKind::MetaMath.map_record(0, record).unwrap();

        assert_eq!(
            pair.chosen(),
            &[ConversationTurn::user("2+2?"), ConversationTurn::assistant("4")]
        );
        assert_eq!(pair.rejected()[0].content, "2+2?");
        assert_eq!(pair.rejected()[1].content, "");
    }

    #[test]
    fn test_metamath_missing_response() {
        let err = DatasetKind::MetaMath
            .map_record(1, json!({"query": "2+2?"}))
            .unwrap_err();
        match err {
            MapError::Malformed { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("response"));
            }
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_map_records_reports_failing_index() {
        let records = vec![
            json!({"query": "a", "response": "b"}),
            json!({"query": "c"}),
        ];
        let err = DatasetKind::MetaMath.map_records(records).unwrap_err();
        assert!(matches!(err, MapError::Malformed { index: 1, .. }));
    }

    struct FixedSource(Vec<Value>);

    impl RecordSource for FixedSource {
        fn fetch(
            &self,
            _dataset: DatasetKind,
            _split: &SplitName,
        ) -> Result<RecordStream<'_>, SourceError> {
            Ok(Box::new(self.0.iter().cloned().map(Ok)))
        }
    }

    struct FailingSource;

    impl RecordSource for FailingSource {
        fn fetch(
            &self,
            dataset: DatasetKind,
            split: &SplitName,
        ) -> Result<RecordStream<'_>, SourceError> {
            Err(SourceError::Fetch {
                dataset: dataset.hub_id().to_owned(),
                split: split.clone(),
                reason: "offline".into(),
            })
        }
    }

    #[test]
    fn test_load_split_maps_all_records() {
        let source = FixedSource(vec![
            json!({"query": "1+1?", "response": "2"}),
            json!({"query": "2+2?", "response": "4"}),
        ]);

        let pairs = DatasetKind::MetaMath
            .load_split(&source, &SplitName::new("train"))
            .unwrap();

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].answer(), "4");
    }

    #[test]
    fn test_load_split_propagates_source_failure() {
        let err = DatasetKind::Ultrachat
            .load_split(&FailingSource, &SplitName::new("train_sft"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Source(SourceError::Fetch { .. })));
    }

    struct BrokenRowSource;

    impl RecordSource for BrokenRowSource {
        fn fetch(
            &self,
            dataset: DatasetKind,
            split: &SplitName,
        ) -> Result<RecordStream<'_>, SourceError> {
            let rows = vec![
                Ok(json!({"query": "1+1?", "response": "2"})),
                Err(SourceError::Decode {
                    dataset: dataset.hub_id().to_owned(),
                    split: split.clone(),
                    reason: "0000.parquet: truncated page".into(),
                }),
                Ok(json!({"query": "2+2?", "response": "4"})),
            ];
            Ok(Box::new(rows.into_iter()))
        }
    }

    #[test]
    fn test_load_split_stops_at_row_error() {
        let err = DatasetKind::MetaMath
            .load_split(&BrokenRowSource, &SplitName::new("train"))
            .unwrap_err();
        assert!(matches!(err, LoadError::Source(SourceError::Decode { .. })));
    }

    #[test]
    fn test_load_split_reports_index_within_stream() {
        let source = FixedSource(vec![
            json!({"messages": [
                {"role": "user", "content": "Hi"},
                {"role": "assistant", "content": "Hello"}
            ]}),
            json!({"messages": [{"role": "user", "content": "alone"}]}),
        ]);
        let err = DatasetKind::Ultrachat
            .load_split(&source, &SplitName::new("train_sft"))
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Map(MapError::TooFewMessages { index: 1, found: 1 })
        ));
    }

    #[test]
    fn test_load_split_empty_source_is_ok() {
        let pairs = DatasetKind::Ultrachat
            .load_split(&FixedSource(Vec::new()), &SplitName::new("test_sft"))
            .unwrap();
        assert!(pairs.is_empty());
    }
}
