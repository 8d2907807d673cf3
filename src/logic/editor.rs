//! Bracket editor: the pick / save / lock state machine for one user's bracket.
//!
//! Picks can only change while `Editable` and before the deadline; anything
//! else is ignored. Saving and locking go through a [`PredictionSink`]; when
//! the sink fails the editor returns to the state it was in before the call.

use crate::logic::cascade::{remove_pick, set_pick};
use crate::logic::pickable::is_pickable;
use crate::models::{BracketError, BracketStatus, Predictions, TOTAL_GAMES};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Where the editor persists picks (HTTP client, database, test double).
pub trait PredictionSink {
    /// Replace the stored prediction set.
    fn save(&mut self, predictions: &Predictions) -> Result<(), BracketError>;
    /// Lock the stored bracket; returns the lock time.
    fn lock(&mut self) -> Result<DateTime<Utc>, BracketError>;
    /// Current stored predictions and lock status.
    fn load(&mut self) -> Result<(Predictions, BracketStatus), BracketError>;
}

/// Editor state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorState {
    #[default]
    Editable,
    /// A save is in flight.
    Saving,
    /// A lock is in flight (after flushing unsaved picks).
    Locking,
    /// Terminal until an admin unlock is picked up by [`BracketEditor::refresh`].
    Locked,
}

#[derive(Clone, Debug)]
pub struct BracketEditor {
    predictions: Predictions,
    /// Last prediction set known to be stored.
    saved: Predictions,
    state: EditorState,
    deadline: DateTime<Utc>,
    locked_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl BracketEditor {
    /// Empty, unlocked bracket.
    pub fn new(deadline: DateTime<Utc>) -> Self {
        Self::from_stored(Predictions::new(), BracketStatus::default(), deadline)
    }

    /// Editor over an already stored bracket.
    pub fn from_stored(predictions: Predictions, status: BracketStatus, deadline: DateTime<Utc>) -> Self {
        Self {
            saved: predictions.clone(),
            predictions,
            state: if status.is_locked {
                EditorState::Locked
            } else {
                EditorState::Editable
            },
            deadline,
            locked_at: status.locked_at,
            last_error: None,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn predictions(&self) -> &Predictions {
        &self.predictions
    }

    pub fn locked_at(&self) -> Option<DateTime<Utc>> {
        self.locked_at
    }

    /// Message of the last failed save or lock, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True if there are picks not yet saved.
    pub fn is_dirty(&self) -> bool {
        self.predictions != self.saved
    }

    pub fn is_complete(&self) -> bool {
        self.predictions.len() == TOTAL_GAMES
    }

    /// Picks may change only while editable and before the deadline.
    pub fn can_edit(&self, now: DateTime<Utc>) -> bool {
        self.state == EditorState::Editable && now < self.deadline
    }

    /// Pick `player_id` to win `game_id`, clearing downstream picks that
    /// depended on the replaced pick. Returns false (and changes nothing) when
    /// editing is closed or the player cannot play in that game.
    pub fn set_prediction(&mut self, game_id: &str, player_id: &str, now: DateTime<Utc>) -> bool {
        if !self.can_edit(now) || !is_pickable(game_id, player_id, &self.predictions) {
            return false;
        }
        let cleared = set_pick(&mut self.predictions, game_id, player_id);
        if !cleared.is_empty() {
            log::debug!("pick {} -> {} cleared {:?}", game_id, player_id, cleared);
        }
        true
    }

    /// Remove the pick for `game_id` and its dependents. Returns false when editing is closed.
    pub fn remove_prediction(&mut self, game_id: &str, now: DateTime<Utc>) -> bool {
        if !self.can_edit(now) {
            return false;
        }
        remove_pick(&mut self.predictions, game_id);
        true
    }

    /// Persist the current picks. A no-op once locked; refused from the
    /// deadline on, so picks made before the cutoff are never written after it.
    pub fn save(&mut self, sink: &mut dyn PredictionSink, now: DateTime<Utc>) -> Result<(), BracketError> {
        if self.state == EditorState::Locked {
            return Ok(());
        }
        if now >= self.deadline {
            return Err(BracketError::DeadlinePassed);
        }
        let before = self.state;
        self.state = EditorState::Saving;
        match sink.save(&self.predictions) {
            Ok(()) => {
                self.saved = self.predictions.clone();
                self.state = EditorState::Editable;
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(before, e)),
        }
    }

    /// Flush unsaved picks, then lock. Needs all 15 picks and an open deadline.
    /// A no-op once locked.
    pub fn lock(&mut self, sink: &mut dyn PredictionSink, now: DateTime<Utc>) -> Result<(), BracketError> {
        if self.state == EditorState::Locked {
            return Ok(());
        }
        if now >= self.deadline {
            return Err(BracketError::DeadlinePassed);
        }
        if !self.is_complete() {
            return Err(BracketError::IncompletePicks {
                picked: self.predictions.len(),
            });
        }
        let before = self.state;
        self.state = EditorState::Locking;
        if self.is_dirty() {
            if let Err(e) = sink.save(&self.predictions) {
                return Err(self.fail(before, e));
            }
            self.saved = self.predictions.clone();
        }
        match sink.lock() {
            Ok(at) => {
                self.state = EditorState::Locked;
                self.locked_at = Some(at);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(before, e)),
        }
    }

    /// Reload picks and lock status from the sink (e.g. after an admin unlock).
    pub fn refresh(&mut self, sink: &mut dyn PredictionSink) -> Result<(), BracketError> {
        let (predictions, status) = sink.load()?;
        *self = Self::from_stored(predictions, status, self.deadline);
        Ok(())
    }

    fn fail(&mut self, before: EditorState, e: BracketError) -> BracketError {
        log::warn!("bracket update failed: {}", e);
        self.state = before;
        self.last_error = Some(e.to_string());
        e
    }
}
