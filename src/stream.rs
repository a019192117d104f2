//! Model content stream boundary.
//!
//! Typed payloads for the chunks the conversational model emits, plus an
//! observer registry. Handlers are identified by a [`HandlerId`] so
//! teardown can deregister exactly the handler it registered, keeping
//! nothing alive across reconnects.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// One part of a model turn; only text parts matter to extraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// The model's side of a turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelTurn {
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

/// A content chunk from the model stream (camelCase on the wire).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_turn: Option<ModelTurn>,
}

impl ServerContent {
    /// Convenience constructor for a single-text-part turn.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            model_turn: Some(ModelTurn {
                parts: vec![ContentPart::text(text)],
            }),
        }
    }
}

/// Identifies one registered content handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerId(u64);

type Handler = Box<dyn Fn(&ServerContent) + Send + Sync>;

/// Observer registry for the model content stream.
///
/// `publish` invokes handlers in registration order while holding the
/// registry lock; handlers must not subscribe or unsubscribe reentrantly.
#[derive(Default)]
pub struct ContentBus {
    handlers: Mutex<Vec<(HandlerId, Handler)>>,
    next_id: AtomicU64,
}

impl ContentBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and returns the id needed to remove it.
    pub fn subscribe(
        &self,
        handler: impl Fn(&ServerContent) + Send + Sync + 'static,
    ) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.handlers
            .lock()
            .unwrap()
            .push((id, Box::new(handler)));
        id
    }

    /// Removes exactly the handler registered under `id`.
    ///
    /// Returns whether it was still registered.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock().unwrap();
        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != id);
        handlers.len() != before
    }

    /// Delivers a content chunk to every registered handler.
    pub fn publish(&self, content: &ServerContent) {
        for (_, handler) in self.handlers.lock().unwrap().iter() {
            handler(content);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }
}
