//! Presentation-side board for two-player Coup.
//!
//! The board sits between a rule engine and a frontend. Each engine pass is
//! decoded into player views, the engine's legal ids are resolved into
//! control enablement, and card picks are tracked locally until they are
//! confirmed into a single id. The board never judges legality itself; it
//! presents exactly what the engine reports, and a pass that violates the
//! contract leaves the last good frame on screen.

pub mod action;
pub mod obs;
pub mod present;
pub mod replay;
pub mod resolve;
pub mod select;

pub use action::{ActionId, Control, Family, CATALOG, NUM_CONTROLS};
pub use obs::{decode, Character, Meta, ObsError, ObsField, PlayerView, HUMAN, OPPONENT};
pub use present::{Outcome, Presentation, SelectPrompt};
pub use replay::{Frame, ObsBuilder, ReplayEngine, Transcript};
pub use resolve::{resolve, Controls, Resolved};
pub use select::{SelectPhase, Selection};

use std::fmt::{Debug, Formatter};

use thiserror::Error;

use crate::action::selection_action;

/// The rule engine across the boundary. It owns all game state and
/// legality; the board only mirrors what it reports.
pub trait Engine {
    /// The current observation vector, laid out as [`obs`] documents.
    fn observation(&self) -> Vec<ObsField>;

    /// Ids the acting player may submit right now.
    fn legal_actions(&self) -> Vec<String>;

    /// Submit one id and get the vector that follows it.
    fn step(&mut self, id: &str) -> Vec<ObsField>;
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("malformed engine pass: {0}")]
    MalformedObservation(#[from] ObsError),
    #[error("{0} cards selected, expected 1 or 2")]
    InvalidSelectionCount(usize),
    #[error("engine id {0:?} is outside the vocabulary")]
    UnknownEngineId(String),
}

/// Presentation state for one seated human against one opponent.
///
/// State only ever changes by applying a whole engine pass; a pass either
/// commits in full or not at all.
pub struct Board<E: Engine> {
    engine: E,
    views: [PlayerView; 2],
    meta: Meta,
    controls: Controls,
    selection: Selection,
}

impl<E: Engine> Debug for Board<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("turn P{} | over {}\n", self.meta.whose_action, self.meta.game_over).as_str())?;
        for (player_idx, view) in self.views.iter().enumerate() {
            f.write_str(format!("\tP {player_idx}: ${} | {:?}\n", view.coins, view.cards).as_str())?;
        }
        Ok(())
    }
}

impl<E: Engine> Board<E> {
    /// Seat the human against `engine` and apply its opening pass.
    pub fn new(engine: E) -> Result<Board<E>, BoardError> {
        let mut board = Board {
            engine,
            views: Default::default(),
            meta: Meta::default(),
            controls: Controls::default(),
            selection: Selection::default(),
        };
        board.sync()?;
        Ok(board)
    }

    /// Re-read the engine and apply its current pass. Call after the engine
    /// progressed on its own, an opponent move for instance.
    pub fn sync(&mut self) -> Result<(), BoardError> {
        let obs = self.engine.observation();
        self.apply(&obs)
    }

    /// Press a control by label. A dead or unknown label is a quiet no-op;
    /// a live one submits its bound id and applies the following pass.
    pub fn activate(&mut self, label: &str) -> Result<bool, BoardError> {
        if self.meta.game_over {
            return Ok(false);
        }

        let id = match self.controls.binding(label) {
            Some(id) => id,
            None => {
                tracing::debug!(label, "press on a dead control");
                return Ok(false);
            }
        };

        tracing::info!(id = id.as_str(), "submitting action");
        self.selection.disarm();
        let obs = self.engine.step(id.as_str());
        self.apply(&obs)?;
        Ok(true)
    }

    /// Flip one of the human's card positions in the open pick round.
    pub fn toggle_card(&mut self, card_idx: usize) -> bool {
        if self.meta.game_over {
            return false;
        }
        self.selection.toggle(card_idx)
    }

    /// Submit the completed pick. Rejected while the round is short of its
    /// quota, so a partial pick can never reach the engine.
    pub fn confirm(&mut self) -> Result<(), BoardError> {
        if self.selection.phase() != SelectPhase::Ready {
            return Err(BoardError::InvalidSelectionCount(self.selection.chosen().len()));
        }

        let id = selection_action(self.selection.chosen())?;
        tracing::info!(id = id.as_str(), "submitting selection");
        self.selection.disarm();
        let obs = self.engine.step(id.as_str());
        self.apply(&obs)
    }

    /// Everything a renderer needs for the current frame.
    pub fn presentation(&self) -> Presentation {
        Presentation::project(&self.views, &self.meta, &self.controls, &self.selection)
    }

    pub fn game_over(&self) -> bool {
        self.meta.game_over
    }

    /// Winning seat once the game is over, `None` while it runs.
    pub fn winner(&self) -> Option<usize> {
        if self.meta.game_over {
            obs::winner(&self.views)
        } else {
            None
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn apply(&mut self, obs: &[ObsField]) -> Result<(), BoardError> {
        match self.next_state(obs) {
            Ok((views, meta, controls, selection)) => {
                self.views = views;
                self.meta = meta;
                self.controls = controls;
                self.selection = selection;
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, "rejecting engine pass, keeping the last good frame");
                Err(err)
            }
        }
    }

    fn next_state(
        &self,
        obs: &[ObsField],
    ) -> Result<([PlayerView; 2], Meta, Controls, Selection), BoardError> {
        let (views, meta) = decode(obs)?;

        // a finished game has nothing left to resolve
        let resolved = if meta.game_over {
            Resolved::default()
        } else {
            resolve(&self.engine.legal_actions(), meta.whose_action)?
        };

        let mut selection = Selection::default();
        if resolved.selection_required > 0 {
            selection.arm(
                resolved.selection_required,
                views[HUMAN].active_card_indices().collect(),
            );
        }

        Ok((views, meta, resolved.controls, selection))
    }
}
