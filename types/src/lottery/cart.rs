use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::BetType;

/// Result code of the per-number sale-cap check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CheckOutcome {
    /// Number sells at the nominal multiplier.
    Ok,
    /// Number sells at a reduced multiplier.
    Reduced,
    /// Sale cap reached; no further stake accepted.
    CapReached,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown check outcome code: {0}")]
pub struct UnknownOutcomeCode(pub u8);

impl From<CheckOutcome> for u8 {
    fn from(outcome: CheckOutcome) -> u8 {
        match outcome {
            CheckOutcome::Ok => 1,
            CheckOutcome::Reduced => 2,
            CheckOutcome::CapReached => 99,
        }
    }
}

impl TryFrom<u8> for CheckOutcome {
    type Error = UnknownOutcomeCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CheckOutcome::Ok),
            2 => Ok(CheckOutcome::Reduced),
            99 => Ok(CheckOutcome::CapReached),
            other => Err(UnknownOutcomeCode(other)),
        }
    }
}

/// Server-reported sale-cap bookkeeping for a special number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleCap {
    pub sold_amount: u64,
    pub remaining_amount: u64,
    pub max_sale_amount: u64,
    pub outcome: CheckOutcome,
}

/// One cart row: a wagered number under one bet type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: u64,
    pub bet_type: BetType,
    pub number: String,
    pub amount: u64,
    pub multiply: f64,
    /// Always `amount × multiply`; recomputed on every mutation of either factor.
    pub potential_win: f64,
    /// Add-action sequence this row belongs to, for undo.
    pub batch: u64,
    pub is_duplicate: bool,
    pub sale_cap: Option<SaleCap>,
}

impl LineItem {
    fn recompute(&mut self) {
        self.potential_win = self.amount as f64 * self.multiply;
    }

    /// Cap metadata present, nothing left to sell.
    pub fn is_sold_out(&self) -> bool {
        matches!(
            self.sale_cap,
            Some(cap) if cap.remaining_amount == 0 && cap.outcome == CheckOutcome::CapReached
        )
    }

    /// Stake exceeds the remaining sellable amount for a capped number.
    pub fn exceeds_limit(&self) -> bool {
        matches!(self.sale_cap, Some(cap) if self.amount > cap.remaining_amount)
    }
}

/// Input for a cart insertion; id, batch, and potential win are assigned by the cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineDraft {
    pub bet_type: BetType,
    pub number: String,
    pub amount: u64,
    pub multiply: f64,
    pub sale_cap: Option<SaleCap>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddResult {
    Added(u64),
    /// The (bet type, number) pair was already present; the existing row was
    /// flagged instead of inserting a second one.
    Duplicate,
}

/// Partial update of a cart row. Touching either factor recomputes the
/// potential win.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineUpdate {
    pub amount: Option<u64>,
    pub multiply: Option<f64>,
}

/// The in-progress bet list for one period.
///
/// Invariants: at most one row per (bet type, number) pair; `potential_win` is
/// never stale; the batch counter advances only when an add action appends at
/// least one row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<LineItem>,
    next_id: u64,
    last_batch: u64,
}

impl Cart {
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, bet_type: BetType, number: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.bet_type == bet_type && item.number == number)
    }

    pub fn last_batch(&self) -> u64 {
        self.last_batch
    }

    /// Reserve the batch id for one user add action. The id is committed to the
    /// counter by the first row actually appended under it; a duplicate-only
    /// action leaves the counter untouched.
    pub fn begin_batch(&self) -> u64 {
        self.last_batch + 1
    }

    pub fn add_in_batch(&mut self, batch: u64, draft: LineDraft) -> AddResult {
        if self.contains(draft.bet_type, &draft.number) {
            for item in &mut self.items {
                if item.bet_type == draft.bet_type && item.number == draft.number {
                    item.is_duplicate = true;
                }
            }
            return AddResult::Duplicate;
        }
        let id = self.next_id;
        self.next_id += 1;
        let mut item = LineItem {
            id,
            bet_type: draft.bet_type,
            number: draft.number,
            amount: draft.amount,
            multiply: draft.multiply,
            potential_win: 0.0,
            batch,
            is_duplicate: false,
            sale_cap: draft.sale_cap,
        };
        item.recompute();
        self.items.push(item);
        self.last_batch = batch;
        AddResult::Added(id)
    }

    /// Single-row add action.
    pub fn add(&mut self, draft: LineDraft) -> AddResult {
        let batch = self.begin_batch();
        self.add_in_batch(batch, draft)
    }

    pub fn update(&mut self, id: u64, update: LineUpdate) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        if let Some(amount) = update.amount {
            item.amount = amount;
        }
        if let Some(multiply) = update.multiply {
            item.multiply = multiply;
        }
        item.recompute();
        true
    }

    pub fn set_amount(&mut self, id: u64, amount: u64) -> bool {
        self.update(
            id,
            LineUpdate {
                amount: Some(amount),
                ..LineUpdate::default()
            },
        )
    }

    /// Apply one stake to every row (the bulk-price action).
    pub fn set_amount_all(&mut self, amount: u64) {
        for item in &mut self.items {
            item.amount = amount;
            item.recompute();
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return false;
        }
        self.recheck_duplicates();
        true
    }

    /// Remove every row added by the most recent add action. Returns how many
    /// rows were removed; a no-op when nothing has been added.
    pub fn undo_last(&mut self) -> usize {
        if self.last_batch == 0 {
            return 0;
        }
        let before = self.items.len();
        let last = self.last_batch;
        self.items.retain(|item| item.batch != last);
        self.recheck_duplicates();
        self.last_batch -= 1;
        // The undone rows held the most recently assigned ids; rewind the
        // counter so undo is exactly inverse to the add.
        self.next_id = self.items.iter().map(|item| item.id + 1).max().unwrap_or(0);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.next_id = 0;
        self.last_batch = 0;
    }

    /// Recompute every duplicate flag from scratch, as if the removed rows had
    /// never been added.
    fn recheck_duplicates(&mut self) {
        let pairs: Vec<(BetType, String)> = self
            .items
            .iter()
            .map(|item| (item.bet_type, item.number.clone()))
            .collect();
        for item in &mut self.items {
            let count = pairs
                .iter()
                .filter(|(t, n)| *t == item.bet_type && *n == item.number)
                .count();
            item.is_duplicate = count > 1;
        }
    }

    pub fn total_amount(&self) -> u64 {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn total_potential_win(&self) -> f64 {
        self.items.iter().map(|item| item.potential_win).sum()
    }

    /// Rows grouped under the cart view's digit-count headings, in display
    /// order. Empty groups are omitted.
    pub fn grouped(&self) -> Vec<(&'static str, Vec<&LineItem>)> {
        let mut groups: Vec<(&'static str, Vec<&LineItem>)> = Vec::new();
        for category in ["four-digit", "three-digit", "two-digit", "running"] {
            let rows: Vec<&LineItem> = self
                .items
                .iter()
                .filter(|item| item.bet_type.category() == category)
                .collect();
            if !rows.is_empty() {
                groups.push((category, rows));
            }
        }
        groups
    }

    /// Rows that block submission: sold out or staked beyond the remaining
    /// sellable amount.
    pub fn blockers(&self) -> Vec<&LineItem> {
        self.items
            .iter()
            .filter(|item| item.is_sold_out() || item.exceeds_limit())
            .collect()
    }

    /// True when any row still has no stake entered.
    pub fn missing_stake(&self) -> bool {
        self.items.iter().any(|item| item.amount == 0)
    }
}
