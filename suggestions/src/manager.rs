//! Sequencing of a walkthrough session.
//!
//! `SuggestionsManager` is an explicit session handle: it owns the queue,
//! the completion callback and the orchestrator for the one active session.
//! Applying a new set of suggestions replaces any session already running,
//! so at most one overlay exists at a time by construction.

use std::{
    collections::VecDeque,
    sync::Arc,
    time::Instant,
};

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    config::SuggestionsConfig,
    geometry::Point,
    object::{OverlayEnvironment, OverlaySnapshot, SuggestionsObject, TapOutcome},
    suggestion::Suggestion,
};

pub struct SuggestionsManager {
    env: OverlayEnvironment,
    queue: VecDeque<Suggestion>,
    overlay: Option<Arc<RwLock<SuggestionsObject>>>,
    completion: Option<Box<dyn FnOnce() + Send>>,
}

impl SuggestionsManager {
    pub fn new(env: OverlayEnvironment) -> Self {
        Self {
            env,
            queue: VecDeque::new(),
            overlay: None,
            completion: None,
        }
    }

    /// Replaces the queue (and any active session) with a new set of
    /// suggestions. Entries whose view is already gone and that carry no
    /// explicit frame are dropped up front.
    pub fn apply(&mut self, suggestions: Vec<Suggestion>, now: Instant) {
        if let Some(overlay) = &self.overlay {
            overlay.write().suggestions_finished(now);
        }
        self.overlay = None;
        self.completion = None;
        let total = suggestions.len();
        self.queue = suggestions.into_iter().filter(Suggestion::is_valid).collect();
        debug!(
            kept = self.queue.len(),
            dropped = total - self.queue.len(),
            "suggestions applied"
        );
    }

    /// Sets the callback invoked exactly once when the queue empties
    /// naturally.
    pub fn completion(&mut self, block: impl FnOnce() + Send + 'static) {
        self.completion = Some(Box::new(block));
    }

    /// Starts presenting the queue with the given configuration.
    pub fn start_showing(&mut self, config: SuggestionsConfig, now: Instant) {
        let object = SuggestionsObject::new(config, &self.env, now);
        self.overlay = Some(Arc::new(RwLock::new(object)));
        self.update_suggestion(true, now);
    }

    /// Stops the session: hides the overlay without invoking the completion
    /// callback.
    pub fn stop_showing(&mut self, now: Instant) {
        self.queue.clear();
        self.update_suggestion(false, now);
    }

    /// Whether a session is currently presenting.
    pub fn is_active(&self) -> bool {
        self.overlay.is_some()
    }

    /// The orchestrator for the active session, shared with the host's
    /// render loop.
    pub fn overlay(&self) -> Option<Arc<RwLock<SuggestionsObject>>> {
        self.overlay.clone()
    }

    /// Per-run-loop-turn maintenance: flushes the coalesced re-layout.
    pub fn tick(&mut self, now: Instant) {
        if let Some(overlay) = &self.overlay {
            overlay.write().tick(now);
        }
    }

    /// Renderable state of the active overlay.
    pub fn snapshot(&self, now: Instant) -> Option<OverlaySnapshot> {
        self.overlay.as_ref().and_then(|o| o.read().snapshot(now))
    }

    /// Routes a tap. A tap on the hole or bubble advances the queue with the
    /// completion callback eligible; a background tap advances it silently,
    /// suppressing the completion for that step.
    pub fn handle_tap(&mut self, point: Point, now: Instant) -> TapOutcome {
        let Some(overlay) = self.overlay.clone() else {
            return TapOutcome::Ignored;
        };
        let outcome = overlay.write().handle_tap(point, now);
        match outcome {
            TapOutcome::Suggestion => self.advance(true, now),
            TapOutcome::Background => self.advance(false, now),
            TapOutcome::Ignored => {}
        }
        outcome
    }

    fn advance(&mut self, with_completion: bool, now: Instant) {
        if self.queue.pop_front().is_some() {
            self.update_suggestion(with_completion, now);
        }
    }

    /// Presents the next valid suggestion, or ends the session when the
    /// queue is exhausted. Suggestions whose view detached while waiting in
    /// the queue are skipped.
    fn update_suggestion(&mut self, with_completion: bool, now: Instant) {
        while let Some(front) = self.queue.front() {
            if front.is_valid() {
                break;
            }
            debug!("skipping suggestion with detached target");
            self.queue.pop_front();
        }

        match self.queue.front().cloned() {
            Some(suggestion) => {
                if let Some(overlay) = &self.overlay {
                    overlay.write().update_for_suggestion(Some(suggestion), now);
                }
            }
            None => {
                if let Some(overlay) = self.overlay.take() {
                    overlay.write().update_for_suggestion(None, now);
                }
                if with_completion
                    && let Some(completion) = self.completion.take()
                {
                    completion();
                }
                self.completion = None;
            }
        }
    }
}
