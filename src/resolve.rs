//! Per-pass control enablement.
//!
//! Legality is the engine's verdict alone. The resolver never re-derives
//! rules from coins or cards; a button is live exactly when the engine put a
//! matching id in the legal list for this pass.

use crate::action::{fold_family, ActionId, Control, CATALOG, NUM_CONTROLS};
use crate::obs::{ObsError, HUMAN};

/// Enablement state of the control strip, parallel to [`CATALOG`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    bound: [Option<ActionId>; NUM_CONTROLS],
}

impl Controls {
    /// The engine id a live button would submit.
    pub fn binding(&self, label: &str) -> Option<ActionId> {
        CATALOG
            .iter()
            .position(|control| control.label == label)
            .and_then(|pos| self.bound[pos])
    }

    pub fn is_enabled(&self, label: &str) -> bool {
        self.binding(label).is_some()
    }

    pub fn any_enabled(&self) -> bool {
        self.bound.iter().any(|binding| binding.is_some())
    }

    /// Catalog-order walk over every button and its binding.
    pub fn iter(&self) -> impl Iterator<Item = (&'static Control, Option<ActionId>)> + '_ {
        CATALOG.iter().zip(self.bound.iter().copied())
    }
}

/// What one legal-id list means for the presentation: which buttons are
/// live and how many cards the human owes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolved {
    pub controls: Controls,
    pub selection_required: u8,
}

/// Resolve the engine's legal ids for this pass.
///
/// Off the human's turn everything stays disabled. On the human's turn an
/// empty list is a contract violation; ids outside the vocabulary are logged
/// and skipped so one stray id cannot take the whole strip down.
pub fn resolve(legal: &[String], active_player: usize) -> Result<Resolved, ObsError> {
    if active_player != HUMAN {
        return Ok(Resolved::default());
    }
    if legal.is_empty() {
        return Err(ObsError::NoLegalActions);
    }

    let mut known: Vec<ActionId> = Vec::with_capacity(legal.len());
    for id in legal {
        match ActionId::parse(id) {
            Some(action) => known.push(action),
            None => tracing::warn!(id = id.as_str(), "ignoring legal id outside the vocabulary"),
        }
    }

    // a pending card loss outranks an exchange return
    let selection_required = if known.iter().any(|id| id.is_lose_card()) {
        1
    } else if known.iter().any(|id| id.is_exchange_return()) {
        2
    } else {
        0
    };

    let buttons: Vec<ActionId> = known
        .iter()
        .copied()
        .filter(|id| !id.is_lose_card() && !id.is_exchange_return())
        .collect();

    let mut controls = Controls::default();
    for (label, id) in fold_family(&buttons) {
        if let Some(pos) = CATALOG.iter().position(|control| control.label == label) {
            controls.bound[pos] = Some(id);
        }
    }

    Ok(Resolved {
        controls,
        selection_required,
    })
}

#[cfg(test)]
mod tests {
    use crate::action::ActionId;
    use crate::obs::{ObsError, HUMAN, OPPONENT};
    use crate::resolve::resolve;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn enablement_is_pure_membership() {
        let resolved = resolve(&ids(&["tax", "income", "foreign_aid"]), HUMAN).unwrap();

        assert_eq!(resolved.controls.binding("Tax"), Some(ActionId::Tax));
        assert_eq!(resolved.controls.binding("Income"), Some(ActionId::Income));
        assert_eq!(
            resolved.controls.binding("Foreign aid"),
            Some(ActionId::ForeignAid)
        );

        // absent ids stay dead no matter what the rest of the board says
        for label in ["Coup", "Assassinate", "Exchange", "Steal", "Pass", "Block", "Challenge"] {
            assert!(!resolved.controls.is_enabled(label), "{label} should be dead");
        }
        assert_eq!(resolved.selection_required, 0);
    }

    #[test]
    fn counter_ids_share_the_family_buttons() {
        let resolved = resolve(&ids(&["pass", "block_steal", "challenge"]), HUMAN).unwrap();

        assert_eq!(resolved.controls.binding("Pass"), Some(ActionId::Pass));
        assert_eq!(resolved.controls.binding("Block"), Some(ActionId::BlockSteal));
        assert_eq!(
            resolved.controls.binding("Challenge"),
            Some(ActionId::Challenge)
        );
        assert!(!resolved.controls.is_enabled("Income"));
    }

    #[test]
    fn first_block_variant_wins_the_binding() {
        let resolved = resolve(&ids(&["block_foreign_aid", "block_steal"]), HUMAN).unwrap();
        assert_eq!(
            resolved.controls.binding("Block"),
            Some(ActionId::BlockForeignAid)
        );
    }

    #[test]
    fn lose_card_ids_arm_a_single_pick() {
        let resolved = resolve(
            &ids(&["pass", "block_assassinate", "challenge", "lose_card_1", "lose_card_2"]),
            HUMAN,
        )
        .unwrap();

        assert_eq!(resolved.selection_required, 1);
        assert!(resolved.controls.is_enabled("Pass"));
        assert!(resolved.controls.is_enabled("Block"));
        assert!(resolved.controls.is_enabled("Challenge"));
    }

    #[test]
    fn exchange_return_ids_arm_a_pair_pick() {
        let resolved = resolve(
            &ids(&[
                "exchange_return_12",
                "exchange_return_13",
                "exchange_return_14",
                "exchange_return_23",
                "exchange_return_24",
                "exchange_return_34",
            ]),
            HUMAN,
        )
        .unwrap();

        assert_eq!(resolved.selection_required, 2);
        assert!(!resolved.controls.any_enabled());
    }

    #[test]
    fn card_loss_outranks_exchange_return() {
        let resolved = resolve(&ids(&["lose_card_1", "exchange_return_12"]), HUMAN).unwrap();
        assert_eq!(resolved.selection_required, 1);
    }

    #[test]
    fn opponent_turn_disables_everything() {
        let resolved = resolve(&ids(&["income", "tax", "lose_card_1"]), OPPONENT).unwrap();
        assert!(!resolved.controls.any_enabled());
        assert_eq!(resolved.selection_required, 0);
    }

    #[test]
    fn empty_legal_list_on_human_turn_is_an_error() {
        assert_eq!(resolve(&[], HUMAN), Err(ObsError::NoLegalActions));
        assert!(resolve(&[], OPPONENT).is_ok());
    }

    #[test]
    fn unknown_ids_are_skipped_not_fatal() {
        let resolved = resolve(&ids(&["tax", "meteor_strike"]), HUMAN).unwrap();
        assert!(resolved.controls.is_enabled("Tax"));
        assert!(!resolved.controls.is_enabled("Coup"));

        let resolved = resolve(&ids(&["meteor_strike"]), HUMAN).unwrap();
        assert!(!resolved.controls.any_enabled());
    }

    #[test]
    fn iteration_follows_catalog_order() {
        let resolved = resolve(&ids(&["income", "coup"]), HUMAN).unwrap();
        let labels: Vec<&str> = resolved
            .controls
            .iter()
            .map(|(control, _)| control.label)
            .collect();
        assert_eq!(labels[0], "Income");
        assert_eq!(labels[2], "Coup");
        assert_eq!(labels.len(), 10);
    }
}
