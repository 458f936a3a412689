//! Host shim around the pure core. The surrounding application serializes
//! its two asynchronous sources (stream chunks and history changes) into
//! `EngineEvent`s; the engine applies them in arrival order and publishes
//! view updates over an optional channel, leaving rendering to the caller.

use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;

use crate::extract::Extractor;
use crate::logging;
use crate::timeline::{derive, Mode, TimelineNavigator, ToolCallSnapshot};
use crate::types::{Message, ToolInvocation};

#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The accumulated buffer for a still-streaming assistant message. Full
    /// buffer, not a delta; lengths must be non-decreasing per message.
    StreamChunk { message_id: String, buffer: String },
    /// A message was finalized, added, or removed. Always the full current
    /// history, never a diff.
    HistoryChanged { history: Vec<Message> },
}

#[derive(Debug, Clone)]
pub enum TimelineUpdate {
    /// Fresh best-effort view of the invocation currently streaming.
    LivePreview {
        message_id: String,
        invocation: ToolInvocation,
    },
    /// The snapshot list was re-derived.
    TimelineChanged { snapshot_count: usize },
    /// The navigator's position or mode changed.
    PositionChanged { index: usize, mode: Mode },
}

pub struct TimelineEngine {
    extractor: Extractor,
    navigator: TimelineNavigator,
    /// Latest accumulated buffer per still-streaming message.
    stream_buffers: HashMap<String, String>,
    update_tx: Option<mpsc::UnboundedSender<TimelineUpdate>>,
}

impl TimelineEngine {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor,
            navigator: TimelineNavigator::new(),
            stream_buffers: HashMap::new(),
            update_tx: None,
        }
    }

    pub fn with_update_channel(
        extractor: Extractor,
        update_tx: mpsc::UnboundedSender<TimelineUpdate>,
    ) -> Self {
        Self {
            update_tx: Some(update_tx),
            ..Self::new(extractor)
        }
    }

    /// The single mutation entry point. Callers must not invoke this from
    /// more than one task; the navigator state has exactly one writer.
    pub fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::StreamChunk { message_id, buffer } => {
                self.on_stream_chunk(message_id, buffer);
            }
            EngineEvent::HistoryChanged { history } => self.on_history_changed(&history),
        }
    }

    fn on_stream_chunk(&mut self, message_id: String, buffer: String) {
        if let Some(kept) = self.stream_buffers.get(&message_id) {
            if buffer.len() < kept.len() {
                // A shorter buffer after a longer one would make previews
                // flicker backwards; drop it.
                logging::emit_buffer_regression(&message_id, kept.len(), buffer.len());
                return;
            }
        }

        if logging::debug_markup_enabled() {
            logging::emit_markup_trace(
                &message_id,
                buffer.len(),
                crate::util::first_line(&buffer),
            );
        }

        let preview = self.extractor.extract(&buffer);
        self.stream_buffers.insert(message_id.clone(), buffer);

        if let Some(invocation) = preview {
            self.emit(TimelineUpdate::LivePreview {
                message_id,
                invocation,
            });
        }
    }

    fn on_history_changed(&mut self, history: &[Message]) {
        // Messages present in history are finalized; their live buffers are
        // done.
        let finalized: HashSet<&str> = history.iter().map(|m| m.id.as_str()).collect();
        self.stream_buffers
            .retain(|id, _| !finalized.contains(id.as_str()));

        let snapshots = derive(history, &self.extractor);
        let snapshot_count = snapshots.len();
        self.navigator.apply_snapshots(snapshots);

        self.emit(TimelineUpdate::TimelineChanged { snapshot_count });
        self.emit_position();
    }

    /// In-progress view for a still-streaming message, recomputed from the
    /// retained buffer.
    pub fn live_preview(&self, message_id: &str) -> Option<ToolInvocation> {
        let buffer = self.stream_buffers.get(message_id)?;
        self.extractor.extract(buffer)
    }

    pub fn current_snapshot(&self) -> Option<&ToolCallSnapshot> {
        self.navigator.current_snapshot()
    }

    pub fn mode(&self) -> Mode {
        self.navigator.mode()
    }

    pub fn select_snapshot(&mut self, id: &str) {
        self.navigator.select_snapshot(id);
        self.emit_position();
    }

    pub fn jump_to_latest(&mut self) {
        self.navigator.jump_to_latest();
        self.emit_position();
    }

    pub fn navigator(&self) -> &TimelineNavigator {
        &self.navigator
    }

    fn emit_position(&self) {
        self.emit(TimelineUpdate::PositionChanged {
            index: self.navigator.current_index(),
            mode: self.navigator.mode(),
        });
    }

    fn emit(&self, update: TimelineUpdate) {
        if let Some(tx) = &self.update_tx {
            let _ = tx.send(update);
        }
    }
}
