//! Dispatch outcome model
//!
//! Every agent invocation produces a [`DispatchResult`]. On the wire it is a
//! flat JSON object whose `status` field (`"success"` or `"failed"`) is
//! authoritative; consumers branch on it before trusting any payload field.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Free-form keyword parameters handed to an agent.
pub type Kwargs = Map<String, Value>;

/// Keys owned by the result envelope; never taken from a payload.
pub const RESERVED_KEYS: [&str; 3] = ["status", "task", "error"];

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Tagged outcome of one agent invocation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchResult {
    /// The agent completed the task
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task: Option<String>,
        /// Agent-specific result fields
        #[serde(flatten)]
        payload: Map<String, Value>,
    },

    /// The agent (or the coordinator on its behalf) reported a failure
    #[serde(rename = "failed")]
    Failure {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        task: Option<String>,
        error: String,
    },
}

impl DispatchResult {
    /// Successful result for `task` with an empty payload
    pub fn success(task: impl Into<String>) -> Self {
        Self::Success {
            task: Some(task.into()),
            payload: Map::new(),
        }
    }

    /// Successful result carrying only `payload`. Reserved keys are dropped.
    pub fn from_payload(mut payload: Map<String, Value>) -> Self {
        payload.retain(|key, _| {
            let reserved = is_reserved(key);
            if reserved {
                tracing::warn!("Dropping reserved key '{}' from result payload", key);
            }
            !reserved
        });
        Self::Success { task: None, payload }
    }

    /// Failed result attributed to `task`
    pub fn failure(task: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Failure {
            task: Some(task.into()),
            error: error.into(),
        }
    }

    /// Failed result not attributed to any task
    pub fn error(error: impl Into<String>) -> Self {
        Self::Failure {
            task: None,
            error: error.into(),
        }
    }

    /// Add a payload field. No-op on a failure or for a reserved key.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if is_reserved(&key) {
            tracing::warn!("Ignoring reserved key '{}' in result payload", key);
            return self;
        }
        if let Self::Success { payload, .. } = &mut self {
            payload.insert(key, value.into());
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Status tag as it appears on the wire
    pub fn status(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure { .. } => "failed",
        }
    }

    pub fn task(&self) -> Option<&str> {
        match self {
            Self::Success { task, .. } | Self::Failure { task, .. } => task.as_deref(),
        }
    }

    /// Error message of a failed result
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { error, .. } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Payload field of a successful result
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Success { payload, .. } => payload.get(key),
            Self::Failure { .. } => None,
        }
    }

    /// JSON object form, as forwarded to the next chain step.
    ///
    /// Envelope keys are written last, so the status tag always wins over
    /// anything left in the payload.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        if let Self::Success { payload, .. } = self {
            for (key, value) in payload.iter().filter(|(key, _)| !is_reserved(key)) {
                object.insert(key.clone(), value.clone());
            }
        }
        object.insert("status".to_string(), Value::from(self.status()));
        if let Some(task) = self.task() {
            object.insert("task".to_string(), Value::from(task));
        }
        if let Some(error) = self.error_message() {
            object.insert("error".to_string(), Value::from(error));
        }
        Value::Object(object)
    }
}

impl Serialize for DispatchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
