//! Wire contract with the script engine worker.
//!
//! The engine is an external collaborator reachable only through message
//! passing. A request carries a mapping of named numeric bindings (the seed,
//! the tick, and a uniquely-named correlation-token binding) plus the program
//! text; the engine exposes the bindings to the program through an importable
//! `host` module and reports exactly one message per program run:
//!
//! - `{"results": [token, value]}` — the program's result pair, where `value`
//!   is the serialized scene tree. The engine-side serializer emits a
//!   lower-cased `type` tag per shape, recurses into child items, and
//!   resolves random/distribution values to their sampled scalars, so the
//!   value decodes as plain [`crate::Shape`] data.
//! - `{"error": "..."}` — the program raised; the text is the engine's
//!   diagnostic.
//! - `{"ready": true}` — sent exactly once per worker lifetime, when the
//!   engine has finished initializing.

use std::collections::BTreeMap;

use serde_json::Value;

/// A request sent to the script engine.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineRequest {
    /// Named numeric bindings, importable from the engine's `host` module.
    #[serde(flatten)]
    pub bindings: BTreeMap<String, i64>,
    /// The program to execute.
    pub program: String,
}

/// A message received from the script engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineMessage {
    /// The engine finished initializing. Sent exactly once per worker.
    Ready,
    /// A program run completed: the correlation token paired with the
    /// serialized scene value.
    Results {
        /// Correlation token echoed from the request's token binding.
        token: u64,
        /// Serialized scene tree.
        value: Value,
    },
    /// A program run failed. Carries no token: the channel has no per-request
    /// error attribution.
    Error {
        /// The engine's diagnostic text.
        message: String,
    },
}

#[derive(Default, serde::Serialize, serde::Deserialize)]
struct MessageRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    results: Option<(u64, Value)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl serde::Serialize for EngineMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let repr = match self {
            EngineMessage::Ready => MessageRepr {
                ready: Some(true),
                ..MessageRepr::default()
            },
            EngineMessage::Results { token, value } => MessageRepr {
                results: Some((*token, value.clone())),
                ..MessageRepr::default()
            },
            EngineMessage::Error { message } => MessageRepr {
                error: Some(message.clone()),
                ..MessageRepr::default()
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for EngineMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = MessageRepr::deserialize(deserializer)?;
        if repr.ready == Some(true) {
            return Ok(EngineMessage::Ready);
        }
        if let Some((token, value)) = repr.results {
            return Ok(EngineMessage::Results { token, value });
        }
        if let Some(message) = repr.error {
            return Ok(EngineMessage::Error { message });
        }
        Err(serde::de::Error::custom(
            "engine message must carry one of ready/results/error",
        ))
    }
}
