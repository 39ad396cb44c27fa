use serde::{Deserialize, Serialize};

use crate::core::{ConversationTurn, PairError, Role};

/// A chosen/rejected conversation pair sharing one user prompt.
///
/// Both sides are always `[user, assistant]`. The rejected assistant turn is
/// an empty placeholder answer, so the only preference signal is "answer"
/// versus "no answer". Fields are private; [`PreferencePair::new`] and the
/// validating `Deserialize` impl are the only ways to build one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPreferencePair")]
pub struct PreferencePair {
    chosen: [ConversationTurn; 2],
    rejected: [ConversationTurn; 2],
}

impl PreferencePair {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self {
            chosen: [
                ConversationTurn::user(prompt.clone()),
                ConversationTurn::assistant(answer),
            ],
            rejected: [
                ConversationTurn::user(prompt),
                ConversationTurn::assistant(String::new()),
            ],
        }
    }

    pub fn chosen(&self) -> &[ConversationTurn; 2] {
        &self.chosen
    }

    pub fn rejected(&self) -> &[ConversationTurn; 2] {
        &self.rejected
    }

    pub fn prompt(&self) -> &str {
        &self.chosen[0].content
    }

    pub fn answer(&self) -> &str {
        &self.chosen[1].content
    }
}

#[derive(Deserialize)]
struct RawPreferencePair {
    chosen: [ConversationTurn; 2],
    rejected: [ConversationTurn; 2],
}

impl TryFrom<RawPreferencePair> for PreferencePair {
    type Error = PairError;

    fn try_from(raw: RawPreferencePair) -> Result<Self, Self::Error> {
        for (side, turns) in [("chosen", &raw.chosen), ("rejected", &raw.rejected)] {
            if turns[0].role != Role::User || turns[1].role != Role::Assistant {
                return Err(PairError::RoleOrder {
                    side,
                    first: turns[0].role,
                    second: turns[1].role,
                });
            }
        }
        if raw.chosen[0] != raw.rejected[0] {
            return Err(PairError::PromptMismatch);
        }
        if !raw.rejected[1].content.is_empty() {
            return Err(PairError::RejectedNotEmpty);
        }

        Ok(Self {
            chosen: raw.chosen,
            rejected: raw.rejected,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
