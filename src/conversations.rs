use serde::{Deserialize, Serialize};

pub const HUMAN: &str = "human";
pub const GPT: &str = "gpt";

/// One turn of a training conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub from: String,
    pub value: String,
}

impl Turn {
    pub fn human(value: impl Into<String>) -> Self {
        Turn {
            from: HUMAN.to_string(),
            value: value.into(),
        }
    }

    pub fn gpt(value: impl Into<String>) -> Self {
        Turn {
            from: GPT.to_string(),
            value: value.into(),
        }
    }
}

/// A human/gpt conversation record consumed by the fine-tuning pipeline.
///
/// Unknown fields (such as the trainer's `id`) are ignored on input, and
/// both fields default to empty so partially-filled entries still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub conversations: Vec<Turn>,
}

impl TrainingRecord {
    /// Value of the first `gpt` turn, or empty when there is none.
    pub fn ground_truth(&self) -> &str {
        self.conversations
            .iter()
            .find(|turn| turn.from == GPT)
            .map(|turn| turn.value.as_str())
            .unwrap_or("")
    }
}

/// Raw annotation record as exported by the labeling pipeline.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    pub video: Option<String>,
    pub video_path: Option<String>,
    #[serde(default)]
    pub labels_descriptive: Labels,
}

impl RawRecord {
    /// The video reference. `video` wins over `video_path`; missing both
    /// yields the empty string.
    pub fn video_ref(&self) -> &str {
        self.video
            .as_deref()
            .or(self.video_path.as_deref())
            .unwrap_or("")
    }
}

/// Descriptive label field: a single string or a list of strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    One(String),
    Many(Vec<String>),
}

impl Default for Labels {
    fn default() -> Self {
        Labels::Many(Vec::new())
    }
}

impl Labels {
    /// Single string verbatim, list joined by single spaces in order.
    pub fn joined(&self) -> String {
        match self {
            Labels::One(label) => label.clone(),
            Labels::Many(labels) => labels.join(" "),
        }
    }
}
