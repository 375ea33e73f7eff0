//! Canned engine passes for demos, tests, and benches.
//!
//! A [`Transcript`] is a recorded session: one [`Frame`] per engine pass.
//! [`ReplayEngine`] plays it back behind the [`Engine`] trait and keeps every
//! id it was handed, so a test can assert exactly what reached the engine.

use serde::{Deserialize, Serialize};

use crate::obs::{ObsField, CARD_SLOTS, MAX_FIELDS, NONE_SENTINEL};
use crate::Engine;

/// One engine pass: the observation vector and the legal ids reported with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub obs: Vec<ObsField>,
    #[serde(default)]
    pub legal: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub frames: Vec<Frame>,
}

impl Transcript {
    pub fn from_json(raw: &str) -> Result<Transcript, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Plays a [`Transcript`] back one frame per submitted id.
pub struct ReplayEngine {
    frames: Vec<Frame>,
    cursor: usize,
    received: Vec<String>,
}

impl ReplayEngine {
    /// The transcript must hold at least one frame; frame zero is the
    /// opening position.
    pub fn new(transcript: Transcript) -> ReplayEngine {
        ReplayEngine {
            frames: transcript.frames,
            cursor: 0,
            received: Vec::new(),
        }
    }

    /// Every id submitted so far, oldest first.
    pub fn received(&self) -> &[String] {
        &self.received
    }

    /// Move to the next frame without an id going in. Stands in for the
    /// engine progressing on its own, an opponent move for instance.
    pub fn advance(&mut self) {
        if self.cursor + 1 < self.frames.len() {
            self.cursor += 1;
        } else {
            tracing::warn!("transcript exhausted, holding the last frame");
        }
    }
}

impl Engine for ReplayEngine {
    fn observation(&self) -> Vec<ObsField> {
        self.frames[self.cursor].obs.clone()
    }

    fn legal_actions(&self) -> Vec<String> {
        self.frames[self.cursor].legal.clone()
    }

    fn step(&mut self, id: &str) -> Vec<ObsField> {
        self.received.push(id.to_string());
        self.advance();
        self.observation()
    }
}

/// Assembles observation vectors slot by slot, so tests and benches never
/// hand-count field offsets.
#[derive(Clone, Debug, Default)]
pub struct ObsBuilder {
    cards: [Vec<(String, bool)>; 2],
    coins: [u32; 2],
    last: [Option<String>; 2],
    whose_action: u32,
    game_over: bool,
    pending_attack: Option<String>,
}

impl ObsBuilder {
    pub fn new() -> ObsBuilder {
        ObsBuilder::default()
    }

    /// Cards are `(name, eliminated)` pairs in slot order.
    pub fn player(
        mut self,
        player_idx: usize,
        cards: &[(&str, bool)],
        coins: u32,
        last: Option<&str>,
    ) -> ObsBuilder {
        self.cards[player_idx] = cards
            .iter()
            .map(|&(name, eliminated)| (name.to_string(), eliminated))
            .collect();
        self.coins[player_idx] = coins;
        self.last[player_idx] = last.map(|id| id.to_string());
        self
    }

    pub fn turn(mut self, player_idx: u32) -> ObsBuilder {
        self.whose_action = player_idx;
        self
    }

    pub fn game_over(mut self) -> ObsBuilder {
        self.game_over = true;
        self
    }

    pub fn pending_attack(mut self, id: &str) -> ObsBuilder {
        self.pending_attack = Some(id.to_string());
        self
    }

    pub fn build(&self) -> Vec<ObsField> {
        let mut obs = Vec::with_capacity(MAX_FIELDS);

        for hand in &self.cards {
            for slot in 0..CARD_SLOTS {
                let name = hand
                    .get(slot)
                    .map(|card| card.0.clone())
                    .unwrap_or_else(|| NONE_SENTINEL.to_string());
                obs.push(ObsField::Text(name));
            }
        }
        for hand in &self.cards {
            for slot in 0..CARD_SLOTS {
                let eliminated = hand.get(slot).map(|card| card.1).unwrap_or(false);
                obs.push(ObsField::Num(eliminated as u32));
            }
        }
        for coins in self.coins {
            obs.push(ObsField::Num(coins));
        }
        for last in &self.last {
            let id = last.clone().unwrap_or_else(|| NONE_SENTINEL.to_string());
            obs.push(ObsField::Text(id));
        }
        obs.push(ObsField::Num(self.whose_action));
        obs.push(ObsField::Num(self.game_over as u32));
        if let Some(id) = &self.pending_attack {
            obs.push(ObsField::Text(id.clone()));
        }

        obs
    }
}
