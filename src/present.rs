//! Projection of board state into renderable form.
//!
//! Everything a frontend needs for one frame lives in [`Presentation`]:
//! flags instead of widget calls, so any renderer (or a test) can consume it.

use std::fmt::{Display, Formatter};

use crate::action::{ActionId, Family};
use crate::obs::{winner, Character, Meta, PlayerView, HUMAN, OPPONENT};
use crate::resolve::Controls;
use crate::select::{SelectPhase, Selection};

/// One card slot as shown. `face` is `None` when the back is up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub face: Option<Character>,
    pub eliminated: bool,
    pub selectable: bool,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerPanel {
    pub cards: Vec<CardView>,
    pub coins: u32,
    pub last_move: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlView {
    pub label: &'static str,
    pub family: Family,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    HumanWon,
    HumanLost,
}

impl Outcome {
    pub fn banner(&self) -> &'static str {
        match self {
            Outcome::HumanWon => "You Won!",
            Outcome::HumanLost => "You Lost",
        }
    }
}

/// Instruction text shown while a pick round is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectPrompt {
    LoseCardOrCounter,
    LoseCard,
    ReturnCards,
}

impl SelectPrompt {
    pub fn instruction(&self) -> &'static str {
        match self {
            SelectPrompt::LoseCardOrCounter => {
                "Choose a card to be eliminated and press Confirm\nOR\nBlock or Challenge the assassination"
            }
            SelectPrompt::LoseCard => "Choose a card to be eliminated and press Confirm.",
            SelectPrompt::ReturnCards => "Choose 2 cards to return to the deck and press Confirm.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub panels: [PlayerPanel; 2],
    pub controls: Vec<ControlView>,
    pub prompt: Option<SelectPrompt>,
    pub confirm_enabled: bool,
    pub outcome: Option<Outcome>,
}

impl Presentation {
    /// Pure projection; reads board state, changes nothing.
    pub fn project(
        views: &[PlayerView; 2],
        meta: &Meta,
        controls: &Controls,
        selection: &Selection,
    ) -> Presentation {
        let panels = [
            panel_for(HUMAN, &views[HUMAN], selection),
            panel_for(OPPONENT, &views[OPPONENT], selection),
        ];

        let control_views = controls
            .iter()
            .map(|(control, binding)| ControlView {
                label: control.label,
                family: control.family,
                enabled: binding.is_some(),
            })
            .collect();

        let prompt = if meta.game_over {
            None
        } else {
            match selection.required() {
                0 => None,
                1 => {
                    let counter_live =
                        controls.is_enabled("Block") || controls.is_enabled("Challenge");
                    if meta.pending_attack == Some(ActionId::Assassinate) && counter_live {
                        Some(SelectPrompt::LoseCardOrCounter)
                    } else {
                        Some(SelectPrompt::LoseCard)
                    }
                }
                _ => Some(SelectPrompt::ReturnCards),
            }
        };

        let outcome = if meta.game_over {
            match winner(views) {
                Some(HUMAN) => Some(Outcome::HumanWon),
                _ => Some(Outcome::HumanLost),
            }
        } else {
            None
        };

        Presentation {
            panels,
            controls: control_views,
            prompt,
            confirm_enabled: !meta.game_over && selection.phase() == SelectPhase::Ready,
            outcome,
        }
    }
}

fn panel_for(player_idx: usize, view: &PlayerView, selection: &Selection) -> PlayerPanel {
    let own = player_idx == HUMAN;
    let cards = view
        .cards
        .iter()
        .enumerate()
        .map(|(idx, &(character, eliminated))| {
            let selected = own && selection.is_selected(idx);
            CardView {
                // opponent cards stay face down until eliminated
                face: if own || eliminated { Some(character) } else { None },
                eliminated,
                selectable: own
                    && selection.is_eligible(idx)
                    && (selected || selection.can_select_more()),
                selected,
            }
        })
        .collect();

    PlayerPanel {
        cards,
        coins: view.coins,
        last_move: view.last_move.clone(),
    }
}

fn card_tag(card: &CardView) -> String {
    let name = match card.face {
        Some(character) => character.name(),
        None => "hidden",
    };
    let mut tag = format!("[{name}");
    if card.eliminated {
        tag.push_str(" out");
    }
    if card.selected {
        tag.push('*');
    }
    tag.push(']');
    tag
}

impl Display for Presentation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // opponent on top, like sitting across the table
        for (idx, panel) in self.panels.iter().enumerate().rev() {
            let who = if idx == HUMAN { "You" } else { "Opponent" };
            f.write_fmt(format_args!("{who:>8} ${}", panel.coins))?;
            if let Some(last) = &panel.last_move {
                f.write_fmt(format_args!("  last: {last}"))?;
            }
            f.write_str("\n         ")?;
            for card in &panel.cards {
                f.write_fmt(format_args!(" {}", card_tag(card)))?;
            }
            f.write_str("\n")?;
        }

        if let Some(outcome) = &self.outcome {
            return f.write_fmt(format_args!("{}\n", outcome.banner()));
        }

        let live: Vec<&str> = self
            .controls
            .iter()
            .filter(|control| control.enabled)
            .map(|control| control.label)
            .collect();
        if !live.is_empty() {
            f.write_fmt(format_args!(" actions: {}\n", live.join(" | ")))?;
        }
        if let Some(prompt) = &self.prompt {
            f.write_fmt(format_args!("{}\n", prompt.instruction()))?;
        }
        if self.confirm_enabled {
            f.write_str(" [Confirm]\n")?;
        }
        Ok(())
    }
}
