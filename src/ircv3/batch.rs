//! Reconstruction of IRCv3 batches on the receiving side.
//!
//! Lines tagged `batch=<id>` for an open batch are held back and handed out,
//! in arrival order, when the batch closes. A `BATCH +child` line that is
//! itself buffered does not open anything yet: the child opens only when the
//! line is replayed. Until then, lines already tagged with the child id are
//! held in the enclosing batch so that relative order is preserved.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::message::Message;

/// An open batch and the lines buffered for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Batch {
    /// Batch type, e.g. `chathistory` or `netsplit`.
    pub kind: String,
    /// Optional batch target (a channel or nick for history batches).
    pub target: Option<String>,
    /// Buffered lines in arrival order.
    pub messages: Vec<Message>,
}

/// Result of offering a line to the [`BatchBuffer`].
#[derive(Debug)]
#[must_use]
pub enum Route {
    /// The line was held back for an open batch.
    Buffered,
    /// The line is not part of an open batch; dispatch it now.
    Dispatch(Message),
}

/// Buffer of currently open batches.
#[derive(Clone, Debug, Default)]
pub struct BatchBuffer {
    open: HashMap<String, Batch>,
    /// Child ids whose opening line sits unreplayed in an open batch,
    /// mapped to that batch.
    pending: HashMap<String, String>,
}

impl BatchBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a batch. Re-opening an id that is still open keeps the buffered lines.
    pub fn open(&mut self, id: &str, kind: &str, target: Option<&str>) {
        self.pending.remove(id);
        debug!(id, kind, "batch opened");
        self.open.entry(id.to_string()).or_insert_with(|| Batch {
            kind: kind.to_string(),
            target: target.map(str::to_string),
            messages: Vec::new(),
        });
    }

    /// Close a batch and return its buffered lines in arrival order.
    ///
    /// Closing an unknown id returns an empty sequence.
    pub fn close(&mut self, id: &str) -> Vec<Message> {
        match self.open.remove(id) {
            Some(batch) => {
                self.pending.retain(|_, holder| holder != id);
                debug!(id, buffered = batch.messages.len(), "batch closed");
                batch.messages
            }
            None => {
                warn!(id, "close marker for unknown batch");
                Vec::new()
            }
        }
    }

    /// Offer a line to the buffer.
    pub fn route(&mut self, msg: Message) -> Route {
        let marker = batch_marker(&msg);
        let holder = msg
            .batch_ref()
            .and_then(|id| self.holder_of(id))
            .or_else(|| match marker {
                // An untagged close for a child that has not been replayed yet
                // belongs after the child's lines.
                Some(Marker::Close(id)) => self.pending.get(id).cloned(),
                _ => None,
            });
        let Some(holder) = holder else {
            return Route::Dispatch(msg);
        };

        // A batch cannot be closed from inside itself.
        let closes_holder = matches!(marker, Some(Marker::Close(id)) if id == holder);
        if let Some(Marker::Open(child)) = marker {
            self.pending.insert(child.to_string(), holder.clone());
        }
        if closes_holder {
            return Route::Dispatch(msg);
        }

        if let Some(batch) = self.open.get_mut(&holder) {
            batch.messages.push(msg);
        }
        Route::Buffered
    }

    /// Whether `id` names an open batch.
    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains_key(id)
    }

    /// Look up an open batch.
    pub fn get(&self, id: &str) -> Option<&Batch> {
        self.open.get(id)
    }

    /// Number of open batches.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Whether no batch is open.
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Drop every open batch and its buffered lines.
    pub fn clear(&mut self) {
        self.open.clear();
        self.pending.clear();
    }

    fn holder_of(&self, id: &str) -> Option<String> {
        if self.open.contains_key(id) {
            Some(id.to_string())
        } else {
            self.pending.get(id).cloned()
        }
    }
}

#[derive(Clone, Copy)]
enum Marker<'a> {
    Open(&'a str),
    Close(&'a str),
}

fn batch_marker(msg: &Message) -> Option<Marker<'_>> {
    if msg.command != "BATCH" {
        return None;
    }
    let reference = msg.param(0)?;
    if let Some(id) = reference.strip_prefix('+') {
        Some(Marker::Open(id))
    } else {
        reference.strip_prefix('-').map(Marker::Close)
    }
}
