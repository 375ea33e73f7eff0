//! Card pick tracking for the loss and exchange-return flows.
//!
//! The engine never sees partial picks. Picks accumulate here until the
//! quota is met, and only a confirmed full set leaves the board.

/// Where the picker currently stands. `Armed(n)` carries how many cards are
/// still missing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectPhase {
    Idle,
    Armed(u8),
    Ready,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    required: u8,
    eligible: Vec<usize>,
    selected: Vec<usize>,
}

impl Selection {
    /// Open a pick round: `required` cards out of the `eligible` positions.
    /// Any picks from a previous round are dropped.
    pub fn arm(&mut self, required: u8, eligible: Vec<usize>) {
        self.required = required;
        self.eligible = eligible;
        self.selected.clear();
    }

    pub fn disarm(&mut self) {
        self.required = 0;
        self.eligible.clear();
        self.selected.clear();
    }

    pub fn phase(&self) -> SelectPhase {
        if self.required == 0 {
            SelectPhase::Idle
        } else if self.selected.len() >= self.required as usize {
            SelectPhase::Ready
        } else {
            SelectPhase::Armed(self.required - self.selected.len() as u8)
        }
    }

    /// Flip one card position. Ineligible positions never react, and once
    /// the quota is met further picks bounce while deselection still works.
    /// Returns whether anything changed.
    pub fn toggle(&mut self, card_idx: usize) -> bool {
        if !self.is_eligible(card_idx) {
            return false;
        }
        // selected stays sorted, so position lookups can bisect
        match self.selected.binary_search(&card_idx) {
            Ok(pos) => {
                self.selected.remove(pos);
                true
            }
            Err(pos) if self.can_select_more() => {
                self.selected.insert(pos, card_idx);
                true
            }
            Err(_) => false,
        }
    }

    /// Picked positions in ascending order.
    pub fn chosen(&self) -> &[usize] {
        &self.selected
    }

    pub fn required(&self) -> u8 {
        self.required
    }

    pub fn is_eligible(&self, card_idx: usize) -> bool {
        self.eligible.contains(&card_idx)
    }

    pub fn is_selected(&self, card_idx: usize) -> bool {
        self.selected.contains(&card_idx)
    }

    pub fn can_select_more(&self) -> bool {
        self.selected.len() < self.required as usize
    }
}
