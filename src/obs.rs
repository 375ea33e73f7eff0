//! Observation decoding.
//!
//! The engine reports game state as a flat, fixed-layout vector of
//! heterogeneous fields. Layout (0-indexed, by contract with the engine):
//!
//! - **[0-3]** player-A card slots: character name or `"none"`
//! - **[4-7]** player-B card slots
//! - **[8-11]** player-A eliminated flags, aligned to [0-3]
//! - **[12-15]** player-B eliminated flags, aligned to [4-7]
//! - **[16]** player-A coins, **[17]** player-B coins
//! - **[18]** player-A last-action id, **[19]** player-B last-action id
//! - **[20]** whose-action index (0 = human, 1 = opponent)
//! - **[21]** game-over flag
//! - **[22]** pending-attack id (`"none"` when idle). Optional; when the
//!   field is absent the opponent's last attack stands in.
//!
//! [`decode`] is a pure transform: it builds both [`PlayerView`]s and the
//! pass [`Meta`] fresh on every call and never touches anything else, so the
//! synchronization loop can be tested on canned vectors without an engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::{display_label, ActionId};
use crate::Character::{Ambassador, Assassin, Captain, Contessa, Duke};

/// The human always sits at player index 0, the opponent at 1.
pub const HUMAN: usize = 0;
pub const OPPONENT: usize = 1;

/// Card slots reserved per player in the vector.
pub const CARD_SLOTS: usize = 4;

/// Slot value meaning "nothing here".
pub const NONE_SENTINEL: &str = "none";

const SLOT_BASE: [usize; 2] = [0, 4];
const FLAG_BASE: [usize; 2] = [8, 12];
const COIN_BASE: usize = 16;
const LAST_ACTION_BASE: usize = 18;
const WHOSE_ACTION_FIELD: usize = 20;
const GAME_OVER_FIELD: usize = 21;
const PENDING_ATTACK_FIELD: usize = 22;

/// Accepted vector lengths: the pending-attack field is the only optional one.
pub const MIN_FIELDS: usize = 22;
pub const MAX_FIELDS: usize = 23;

/// One field of the observation vector, as the engine wires it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObsField {
    Num(u32),
    Text(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Character {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static CHARACTER_VARIANTS: [Character; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];

impl Character {
    pub fn name(&self) -> &'static str {
        match self {
            Duke => "Duke",
            Assassin => "Assassin",
            Captain => "Captain",
            Ambassador => "Ambassador",
            Contessa => "Contessa",
        }
    }

    pub fn parse(name: &str) -> Option<Character> {
        CHARACTER_VARIANTS.iter().find(|c| c.name() == name).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ObsError {
    #[error("observation has {0} fields, expected 22 or 23")]
    Length(usize),
    #[error("observation field {index} is not a {expected}")]
    Field { index: usize, expected: &'static str },
    #[error("unknown card name {0:?}")]
    UnknownCard(String),
    #[error("engine reported no legal actions on the human's turn")]
    NoLegalActions,
}

/// What one player's side of the board looks like this pass.
///
/// `cards` keeps the slot order of the vector; card-selection indices are
/// positional over this sequence, so the order is load-bearing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerView {
    pub cards: Vec<(Character, bool)>, // (character, eliminated)
    pub coins: u32,
    pub last_move: Option<String>,
}

impl PlayerView {
    /// Positions of the cards that are still face down.
    pub fn active_card_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cards.iter().enumerate().filter_map(|(idx, card)| {
            if card.1 {
                None
            } else {
                Some(idx)
            }
        })
    }

    pub fn has_live_card(&self) -> bool {
        self.cards.iter().any(|card| !card.1)
    }
}

/// Per-pass facts that are not tied to one player.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Meta {
    pub whose_action: usize,
    pub game_over: bool,
    pub pending_attack: Option<ActionId>,
}

/// Decode an observation vector into both player views plus pass meta.
///
/// Every documented offset is type-checked, including flags for empty slots;
/// a vector that does not match the layout is rejected outright rather than
/// partially read.
pub fn decode(obs: &[ObsField]) -> Result<([PlayerView; 2], Meta), ObsError> {
    if obs.len() < MIN_FIELDS || obs.len() > MAX_FIELDS {
        return Err(ObsError::Length(obs.len()));
    }

    let mut views: [PlayerView; 2] = Default::default();

    for (player_idx, view) in views.iter_mut().enumerate() {
        for slot in 0..CARD_SLOTS {
            let name = text_at(obs, SLOT_BASE[player_idx] + slot)?;
            let eliminated = flag_at(obs, FLAG_BASE[player_idx] + slot)?;

            if name == NONE_SENTINEL {
                continue;
            }

            let character = match Character::parse(name) {
                Some(character) => character,
                None => return Err(ObsError::UnknownCard(name.to_string())),
            };
            view.cards.push((character, eliminated));
        }

        view.coins = num_at(obs, COIN_BASE + player_idx)?;

        let last = text_at(obs, LAST_ACTION_BASE + player_idx)?;
        if last != NONE_SENTINEL {
            view.last_move = Some(display_label(last));
        }
    }

    let whose_action = num_at(obs, WHOSE_ACTION_FIELD)? as usize;
    if whose_action > OPPONENT {
        return Err(ObsError::Field {
            index: WHOSE_ACTION_FIELD,
            expected: "player index",
        });
    }

    let game_over = flag_at(obs, GAME_OVER_FIELD)?;

    let pending_attack = if obs.len() > PENDING_ATTACK_FIELD {
        match text_at(obs, PENDING_ATTACK_FIELD)? {
            NONE_SENTINEL => None,
            id => {
                let parsed = ActionId::parse(id);
                if parsed.is_none() {
                    tracing::debug!(id, "ignoring pending attack outside the vocabulary");
                }
                parsed
            }
        }
    } else {
        match text_at(obs, LAST_ACTION_BASE + OPPONENT)? {
            NONE_SENTINEL => None,
            id => ActionId::parse(id).filter(|action| action.is_attack()),
        }
    };

    Ok((
        views,
        Meta {
            whose_action,
            game_over,
            pending_attack,
        },
    ))
}

/// Index of the player still holding a live card, the human checked first.
/// Only meaningful once the game-over flag is set.
pub fn winner(views: &[PlayerView; 2]) -> Option<usize> {
    views.iter().position(|view| view.has_live_card())
}

fn num_at(obs: &[ObsField], index: usize) -> Result<u32, ObsError> {
    match &obs[index] {
        ObsField::Num(n) => Ok(*n),
        ObsField::Text(_) => Err(ObsError::Field {
            index,
            expected: "number",
        }),
    }
}

fn text_at(obs: &[ObsField], index: usize) -> Result<&str, ObsError> {
    match &obs[index] {
        ObsField::Text(text) => Ok(text.as_str()),
        ObsField::Num(_) => Err(ObsError::Field {
            index,
            expected: "name",
        }),
    }
}

fn flag_at(obs: &[ObsField], index: usize) -> Result<bool, ObsError> {
    match num_at(obs, index)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(ObsError::Field {
            index,
            expected: "0/1 flag",
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::action::ActionId;
    use crate::obs::{decode, winner, Character, ObsError, ObsField};
    use crate::replay::ObsBuilder;

    #[test]
    fn slot_counts_carry_through() {
        let hands: [&[(&str, bool)]; 5] = [
            &[],
            &[("Duke", false)],
            &[("Duke", false), ("Captain", true)],
            &[("Duke", false), ("Captain", false), ("Contessa", false)],
            &[
                ("Duke", false),
                ("Captain", false),
                ("Contessa", true),
                ("Ambassador", false),
            ],
        ];

        for hand in hands {
            let obs = ObsBuilder::new()
                .player(0, hand, 2, None)
                .player(1, &[("Assassin", false)], 2, None)
                .build();
            let (views, _) = decode(&obs).unwrap();

            assert_eq!(views[0].cards.len(), hand.len());
            for (slot, &(name, eliminated)) in hand.iter().enumerate() {
                assert_eq!(views[0].cards[slot].0.name(), name);
                assert_eq!(views[0].cards[slot].1, eliminated);
            }
        }
    }

    #[test]
    fn empty_slots_are_skipped_in_order() {
        // a "none" slot in the middle must not shift later cards out of order
        let mut obs = ObsBuilder::new()
            .player(0, &[("Duke", false), ("Captain", false)], 2, None)
            .player(1, &[("Assassin", false)], 2, None)
            .build();
        obs[1] = ObsField::Text("none".to_string());

        let (views, _) = decode(&obs).unwrap();
        assert_eq!(views[0].cards, vec![(Character::Duke, false)]);
    }

    #[test]
    fn coins_and_last_move_are_per_player() {
        let obs = ObsBuilder::new()
            .player(0, &[("Duke", false)], 7, Some("block_steal"))
            .player(1, &[("Contessa", false)], 1, Some("steal"))
            .build();
        let (views, _) = decode(&obs).unwrap();

        assert_eq!(views[0].coins, 7);
        assert_eq!(views[1].coins, 1);
        assert_eq!(views[0].last_move.as_deref(), Some("Block"));
        assert_eq!(views[1].last_move.as_deref(), Some("Steal"));
    }

    #[test]
    fn none_last_move_stays_unset() {
        let obs = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .build();
        let (views, _) = decode(&obs).unwrap();
        assert_eq!(views[0].last_move, None);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let obs = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .build();

        assert_eq!(decode(&obs[..21]), Err(ObsError::Length(21)));

        let mut long = obs.clone();
        long.push(ObsField::Text("none".to_string()));
        long.push(ObsField::Num(0));
        assert_eq!(decode(&long), Err(ObsError::Length(24)));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let mut obs = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .build();
        obs[16] = ObsField::Text("five".to_string());

        assert_eq!(
            decode(&obs),
            Err(ObsError::Field {
                index: 16,
                expected: "number"
            })
        );
    }

    #[test]
    fn unknown_card_is_rejected() {
        let obs = ObsBuilder::new()
            .player(0, &[("Joker", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .build();

        assert_eq!(decode(&obs), Err(ObsError::UnknownCard("Joker".to_string())));
    }

    #[test]
    fn out_of_range_turn_index_is_rejected() {
        let obs = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .turn(2)
            .build();

        assert_eq!(
            decode(&obs),
            Err(ObsError::Field {
                index: 20,
                expected: "player index"
            })
        );
    }

    #[test]
    fn pending_attack_field_is_optional() {
        let bare = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .build();
        assert_eq!(bare.len(), 22);
        let (_, meta) = decode(&bare).unwrap();
        assert_eq!(meta.pending_attack, None);

        let pending = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, Some("assassinate"))
            .pending_attack("assassinate")
            .build();
        assert_eq!(pending.len(), 23);
        let (_, meta) = decode(&pending).unwrap();
        assert_eq!(meta.pending_attack, Some(ActionId::Assassinate));

        // without the field, an attacking last action stands in
        let fallback = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, Some("assassinate"))
            .build();
        assert_eq!(fallback.len(), 22);
        let (_, meta) = decode(&fallback).unwrap();
        assert_eq!(meta.pending_attack, Some(ActionId::Assassinate));

        let quiet = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, Some("tax"))
            .build();
        let (_, meta) = decode(&quiet).unwrap();
        assert_eq!(meta.pending_attack, None);

        // ids outside the vocabulary are ignored, not fatal
        let odd = ObsBuilder::new()
            .player(0, &[("Duke", false)], 2, None)
            .player(1, &[("Contessa", false)], 2, None)
            .pending_attack("meteor_strike")
            .build();
        let (_, meta) = decode(&odd).unwrap();
        assert_eq!(meta.pending_attack, None);
    }

    #[test]
    fn game_over_and_winner() {
        let obs = ObsBuilder::new()
            .player(0, &[("Duke", false), ("Captain", true)], 2, Some("challenge"))
            .player(1, &[("Contessa", true), ("Assassin", true)], 5, None)
            .game_over()
            .build();
        let (views, meta) = decode(&obs).unwrap();

        assert!(meta.game_over);
        assert_eq!(winner(&views), Some(0));

        let obs = ObsBuilder::new()
            .player(0, &[("Duke", true), ("Captain", true)], 2, None)
            .player(1, &[("Contessa", false)], 5, None)
            .game_over()
            .build();
        let (views, _) = decode(&obs).unwrap();
        assert_eq!(winner(&views), Some(1));
    }
}
