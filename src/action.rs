//! The engine's action vocabulary and the fixed control strip it maps onto.
//!
//! Ids cross the boundary as snake_case strings. Labels are derived, never
//! stored, so the two sides cannot drift.

use std::fmt::{Display, Formatter};

use crate::BoardError;

/// Every id the engine may report. The vocabulary is closed; anything else
/// on the wire is a contract violation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionId {
    Income,
    ForeignAid,
    Coup,
    Tax,
    Assassinate,
    Exchange,
    Steal,
    Pass,
    BlockForeignAid,
    BlockAssassinate,
    BlockSteal,
    Challenge,
    LoseCard1,
    LoseCard2,
    ExchangeReturn12,
    ExchangeReturn13,
    ExchangeReturn14,
    ExchangeReturn23,
    ExchangeReturn24,
    ExchangeReturn34,
}

pub static ACTION_VARIANTS: [ActionId; 20] = [
    ActionId::Income,
    ActionId::ForeignAid,
    ActionId::Coup,
    ActionId::Tax,
    ActionId::Assassinate,
    ActionId::Exchange,
    ActionId::Steal,
    ActionId::Pass,
    ActionId::BlockForeignAid,
    ActionId::BlockAssassinate,
    ActionId::BlockSteal,
    ActionId::Challenge,
    ActionId::LoseCard1,
    ActionId::LoseCard2,
    ActionId::ExchangeReturn12,
    ActionId::ExchangeReturn13,
    ActionId::ExchangeReturn14,
    ActionId::ExchangeReturn23,
    ActionId::ExchangeReturn24,
    ActionId::ExchangeReturn34,
];

impl ActionId {
    /// The wire form the engine speaks.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Income => "income",
            ActionId::ForeignAid => "foreign_aid",
            ActionId::Coup => "coup",
            ActionId::Tax => "tax",
            ActionId::Assassinate => "assassinate",
            ActionId::Exchange => "exchange",
            ActionId::Steal => "steal",
            ActionId::Pass => "pass",
            ActionId::BlockForeignAid => "block_foreign_aid",
            ActionId::BlockAssassinate => "block_assassinate",
            ActionId::BlockSteal => "block_steal",
            ActionId::Challenge => "challenge",
            ActionId::LoseCard1 => "lose_card_1",
            ActionId::LoseCard2 => "lose_card_2",
            ActionId::ExchangeReturn12 => "exchange_return_12",
            ActionId::ExchangeReturn13 => "exchange_return_13",
            ActionId::ExchangeReturn14 => "exchange_return_14",
            ActionId::ExchangeReturn23 => "exchange_return_23",
            ActionId::ExchangeReturn24 => "exchange_return_24",
            ActionId::ExchangeReturn34 => "exchange_return_34",
        }
    }

    pub fn parse(id: &str) -> Option<ActionId> {
        ACTION_VARIANTS.iter().find(|a| a.as_str() == id).copied()
    }

    pub fn is_lose_card(&self) -> bool {
        matches!(self, ActionId::LoseCard1 | ActionId::LoseCard2)
    }

    /// Attacks are the ids the target may still be responding to.
    pub fn is_attack(&self) -> bool {
        matches!(self, ActionId::Coup | ActionId::Assassinate | ActionId::Steal)
    }

    pub fn is_exchange_return(&self) -> bool {
        matches!(
            self,
            ActionId::ExchangeReturn12
                | ActionId::ExchangeReturn13
                | ActionId::ExchangeReturn14
                | ActionId::ExchangeReturn23
                | ActionId::ExchangeReturn24
                | ActionId::ExchangeReturn34
        )
    }
}

impl Display for ActionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label for an engine id: underscores become spaces, the
/// first letter is raised, and the Pass/Block/Challenge variants collapse to
/// their family word so all three blocks share one button.
pub fn display_label(id: &str) -> String {
    let mut label = String::with_capacity(id.len());
    for (pos, ch) in id.replace('_', " ").trim().char_indices() {
        if pos == 0 {
            label.extend(ch.to_uppercase());
        } else {
            label.extend(ch.to_lowercase());
        }
    }

    if matches!(label.get(0..4), Some("Pass" | "Bloc" | "Chal")) {
        if let Some(family_word) = label.split_whitespace().next() {
            return family_word.to_string();
        }
    }
    label
}

/// Collapse a legal-id list into `(label, id)` bindings. When several ids
/// share a label the earliest id in engine order wins the binding.
pub fn fold_family(legal: &[ActionId]) -> Vec<(String, ActionId)> {
    let mut bindings: Vec<(String, ActionId)> = Vec::with_capacity(legal.len());
    for id in legal {
        let label = display_label(id.as_str());
        if !bindings.iter().any(|(bound, _)| *bound == label) {
            bindings.push((label, *id));
        }
    }
    bindings
}

/// Which row of the control strip a button sits in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    Main,
    Counter,
}

/// One button of the fixed control strip.
#[derive(Debug, PartialEq, Eq)]
pub struct Control {
    pub label: &'static str,
    pub family: Family,
}

pub const NUM_CONTROLS: usize = 10;

/// The control strip never changes shape; only enablement does.
pub static CATALOG: [Control; NUM_CONTROLS] = [
    Control { label: "Income", family: Family::Main },
    Control { label: "Foreign aid", family: Family::Main },
    Control { label: "Coup", family: Family::Main },
    Control { label: "Tax", family: Family::Main },
    Control { label: "Assassinate", family: Family::Main },
    Control { label: "Exchange", family: Family::Main },
    Control { label: "Steal", family: Family::Main },
    Control { label: "Pass", family: Family::Counter },
    Control { label: "Block", family: Family::Counter },
    Control { label: "Challenge", family: Family::Counter },
];

/// Map confirmed card positions (0-indexed) to the engine id that names them
/// (1-indexed). One position is a card loss, two are an exchange return.
pub fn selection_action(chosen: &[usize]) -> Result<ActionId, BoardError> {
    match chosen {
        [i] => match i + 1 {
            1 => Ok(ActionId::LoseCard1),
            2 => Ok(ActionId::LoseCard2),
            n => Err(BoardError::UnknownEngineId(format!("lose_card_{n}"))),
        },
        [i, j] => {
            let id = format!("exchange_return_{}{}", i + 1, j + 1);
            match ActionId::parse(&id) {
                Some(action) if action.is_exchange_return() => Ok(action),
                _ => Err(BoardError::UnknownEngineId(id)),
            }
        }
        _ => Err(BoardError::InvalidSelectionCount(chosen.len())),
    }
}
