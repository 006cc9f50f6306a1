use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single version of a prompt's text.
///
/// Index 0 of a prompt's iteration list is the original submission; every
/// regeneration appends one more entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Iteration {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// One conversational thread under iterative refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub iterations: Vec<Iteration>,
    pub thumbs_up: u64,
    pub thumbs_down: u64,
    pub comments: Vec<Comment>,
}

impl Prompt {
    /// Create a new prompt whose sole iteration holds `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            iterations: vec![Iteration {
                text: text.into(),
                timestamp: now,
            }],
            thumbs_up: 0,
            thumbs_down: 0,
            comments: Vec::new(),
        }
    }

    /// Text of the most recent iteration. A prompt always has at least one.
    pub fn latest_text(&self) -> &str {
        self.iterations
            .last()
            .map(|i| i.text.as_str())
            .unwrap_or_default()
    }

    pub fn push_iteration(&mut self, text: impl Into<String>) {
        self.iterations.push(Iteration {
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn push_comment(&mut self, text: impl Into<String>) {
        self.comments.push(Comment {
            text: text.into(),
            timestamp: Utc::now(),
        });
    }
}
