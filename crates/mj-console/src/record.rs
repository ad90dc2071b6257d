use serde::{Deserialize, Serialize};

/// Task-type tag carried on each log record. Unrecognized wire values
/// deserialize to `Unknown` so a newer gateway never breaks the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskAction {
    Imagine,
    Upscale,
    Variation,
    HighVariation,
    LowVariation,
    Pan,
    Describe,
    Blend,
    Upload,
    Shorten,
    Reroll,
    Inpaint,
    Zoom,
    CustomZoom,
    Modal,
    SwapFace,
    #[serde(other)]
    Unknown,
}

impl Default for TaskAction {
    fn default() -> Self {
        TaskAction::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Success,
    NotStart,
    Submitted,
    InProgress,
    Failure,
    Modal,
    #[serde(other)]
    Unknown,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Unknown
    }
}

/// Submit result code returned by the upstream on task submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitCode {
    NotSubmitted,
    Submitted,
    Queued,
    Duplicate,
    Unknown,
}

impl SubmitCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => SubmitCode::NotSubmitted,
            1 => SubmitCode::Submitted,
            21 => SubmitCode::Queued,
            22 => SubmitCode::Duplicate,
            _ => SubmitCode::Unknown,
        }
    }
}

/// One task log row as returned by `/api/mj/`. Immutable once fetched;
/// `id` is the stable sort key on the server side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    #[serde(default)]
    pub mj_id: String,
    #[serde(default)]
    pub channel_id: i64,
    /// Epoch millis.
    #[serde(default)]
    pub submit_time: Option<i64>,
    /// Epoch millis; absent while the task is still running.
    #[serde(default)]
    pub finish_time: Option<i64>,
    #[serde(default)]
    pub action: TaskAction,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub status: TaskStatus,
    /// Upstream progress string, e.g. "100%".
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub prompt_en: String,
    #[serde(default)]
    pub fail_reason: Option<String>,
}
