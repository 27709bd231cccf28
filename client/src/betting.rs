//! The member-facing betting flow for one period.
//!
//! [`PeriodView::open`] resolves a period into either a closed view (with its
//! settled result, when filed) or a live [`BettingFlow`]. The flow owns the
//! session state machine, talks to the backend for sale-cap checks and
//! submission, and writes the cart through to the local store after every
//! mutation.

use std::collections::BTreeMap;

use chrono::Utc;
use huay_types::api::{
    BetOrder, BulkBetRequest, CheckMultiplyRequest, LotteryRules, SaveTemplateRequest, Template,
};
use huay_types::lottery::{
    BetRate, BetSession, BetType, Cart, CheckOutcome, InputMode, LineDraft, LineItem,
    LotteryResult, Period,
};

use crate::client::Client;
use crate::storage::LocalStore;
use crate::{Error, Result};

/// A period as the member sees it: open for betting, or closed and showing
/// its result.
pub enum PeriodView {
    Open(BettingFlow),
    Closed {
        period: Period,
        result: Option<LotteryResult>,
    },
}

impl PeriodView {
    /// Resolve `period_id` against the active-period list and build the
    /// matching view. The result lookup for a closed period is best effort;
    /// a missing result renders as awaiting-result.
    pub async fn open(client: Client, store: LocalStore, period_id: &str) -> Result<Self> {
        let periods = client.active_periods().await?;
        let period = periods
            .into_iter()
            .find(|period| period.id == period_id)
            .ok_or_else(|| Error::PeriodNotFound(period_id.to_string()))?;

        if period.is_closed(Utc::now()) {
            let result = match client.results(&period.result_date()).await {
                Ok(page) => page
                    .lotteries
                    .into_iter()
                    .find(|result| result.huay_code == period.huay_code),
                Err(err) => {
                    tracing::warn!(?err, huay = %period.huay_code, "result lookup failed");
                    None
                }
            };
            return Ok(Self::Closed { period, result });
        }

        BettingFlow::start(client, store, period).await.map(Self::Open)
    }
}

/// Outcome of one add action: how many rows were appended, how many entries
/// collapsed onto existing rows, and any advisory texts from sale-cap checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddReport {
    pub added: usize,
    pub duplicates: usize,
    pub notices: Vec<String>,
}

/// Snapshot of a successful bulk submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitReceipt {
    pub poy_id: String,
    pub poy_number: String,
    pub bets: Vec<LineItem>,
    pub total_amount: u64,
    pub total_potential_win: f64,
    pub note: String,
}

pub struct BettingFlow {
    client: Client,
    store: LocalStore,
    period: Period,
    rates: BTreeMap<BetType, BetRate>,
    session: BetSession,
}

impl BettingFlow {
    async fn start(client: Client, store: LocalStore, period: Period) -> Result<Self> {
        let configs = client.huay_config(period.lottery_id).await?;
        let rates: BTreeMap<BetType, BetRate> = configs
            .iter()
            .filter(|config| config.is_default == 1 && config.status == 1)
            .filter_map(|config| BetRate::from_config(config))
            .map(|rate| (rate.bet_type, rate))
            .collect();

        let mut session = store.load_session(&period.id);
        // Restored selections may predate a config change; keep only types
        // this period still pays out on.
        let selected: Vec<BetType> = session
            .selected()
            .iter()
            .copied()
            .filter(|bet_type| rates.contains_key(bet_type))
            .collect();
        if selected.is_empty() {
            let fallback = if rates.contains_key(&BetType::TopThree) {
                Some(BetType::TopThree)
            } else {
                rates.keys().next().copied()
            };
            session.set_selected(fallback.into_iter().collect());
        } else {
            session.set_selected(selected);
        }

        Ok(Self {
            client,
            store,
            period,
            rates,
            session,
        })
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn rates(&self) -> &BTreeMap<BetType, BetRate> {
        &self.rates
    }

    pub fn rate(&self, bet_type: BetType) -> Option<&BetRate> {
        self.rates.get(&bet_type)
    }

    pub fn session(&self) -> &BetSession {
        &self.session
    }

    pub fn cart(&self) -> &Cart {
        self.session.cart()
    }

    // -----------------------------------------------------------------------
    // Entry state
    // -----------------------------------------------------------------------

    pub fn toggle_bet_type(&mut self, bet_type: BetType) -> bool {
        if !self.rates.contains_key(&bet_type) {
            return false;
        }
        let changed = self.session.toggle_bet_type(bet_type);
        if changed {
            self.store.save_selected(self.session.selected());
        }
        changed
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.session.set_input_mode(mode);
        self.store.save_input_mode(mode);
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.session.set_shuffle(enabled);
    }

    /// Feed one keypad digit; returns the completed number once the buffer
    /// reaches the primary type's length.
    pub fn push_digit(&mut self, digit: char) -> Option<String> {
        self.session.push_digit(digit)
    }

    pub fn backspace(&mut self) {
        self.session.backspace();
    }

    // -----------------------------------------------------------------------
    // Cart mutation
    // -----------------------------------------------------------------------

    /// Add `number` under every selected bet type, expanding through the
    /// shuffle toggle and checking each new candidate's sale cap. A failed
    /// check degrades to the nominal rate rather than dropping the entry.
    pub async fn add_number(&mut self, number: &str) -> Result<AddReport> {
        let plans: Vec<(BetRate, Vec<String>)> = self
            .session
            .selected()
            .iter()
            .filter_map(|bet_type| self.rates.get(bet_type).cloned())
            .map(|rate| {
                let candidates = self.session.candidates(rate.bet_type, number);
                (rate, candidates)
            })
            .collect();

        let mut report = AddReport::default();
        let batch = self.session.cart().begin_batch();
        for (rate, candidates) in plans {
            for candidate in candidates {
                if self.session.cart().contains(rate.bet_type, &candidate) {
                    // Flags the existing row; no remote check, no new row.
                    self.session.cart_mut().add_in_batch(
                        batch,
                        LineDraft {
                            bet_type: rate.bet_type,
                            number: candidate,
                            amount: 0,
                            multiply: rate.multiply,
                            sale_cap: None,
                        },
                    );
                    report.duplicates += 1;
                    continue;
                }

                let draft = match self.check_candidate(&rate, &candidate).await {
                    Ok((draft, notice)) => {
                        if let Some(notice) = notice {
                            report.notices.push(notice);
                        }
                        draft
                    }
                    Err(err) => {
                        tracing::warn!(?err, number = %candidate, "sale-cap check failed");
                        LineDraft {
                            bet_type: rate.bet_type,
                            number: candidate,
                            amount: rate.min_bet.max(1),
                            multiply: rate.multiply,
                            sale_cap: None,
                        }
                    }
                };
                self.session.cart_mut().add_in_batch(batch, draft);
                report.added += 1;
            }
        }

        self.persist_cart();
        Ok(report)
    }

    async fn check_candidate(
        &self,
        rate: &BetRate,
        number: &str,
    ) -> Result<(LineDraft, Option<String>)> {
        let response = self
            .client
            .check_multiply(&CheckMultiplyRequest {
                huay_id: self.period.lottery_id,
                stock_type: self.period.stock_type().to_string(),
                huay_option: rate.bet_type,
                poy_number: number.to_string(),
                multiply: rate.multiply,
                value: 1,
            })
            .await?;
        let notice = if response.result != CheckOutcome::Ok {
            response.condition.clone()
        } else {
            None
        };
        let draft = LineDraft {
            bet_type: rate.bet_type,
            number: number.to_string(),
            amount: rate.min_bet.max(1),
            multiply: response.multiply,
            sale_cap: response.sale_cap(),
        };
        Ok((draft, notice))
    }

    /// Add a pre-built special set (gate, sweep, or grid picks) under one bet
    /// type, with no stake yet and no per-number check.
    pub fn add_numbers(&mut self, bet_type: BetType, numbers: &[String]) -> AddReport {
        let Some(rate) = self.rates.get(&bet_type).cloned() else {
            return AddReport::default();
        };
        let mut report = AddReport::default();
        let batch = self.session.cart().begin_batch();
        for number in numbers {
            let before = self.session.cart().len();
            self.session.cart_mut().add_in_batch(
                batch,
                LineDraft {
                    bet_type,
                    number: number.clone(),
                    amount: 0,
                    multiply: rate.multiply,
                    sale_cap: None,
                },
            );
            if self.session.cart().len() > before {
                report.added += 1;
            } else {
                report.duplicates += 1;
            }
        }
        self.persist_cart();
        report
    }

    /// Load a saved template's items into the cart, keeping their stakes.
    /// Returns how many rows were appended.
    pub fn load_template(&mut self, template: &Template) -> usize {
        let items = template.items.as_deref().unwrap_or_default();
        let mut added = 0;
        let batch = self.session.cart().begin_batch();
        for item in items {
            let Some(rate) = self.rates.get(&item.bet_type).cloned() else {
                continue;
            };
            let before = self.session.cart().len();
            self.session.cart_mut().add_in_batch(
                batch,
                LineDraft {
                    bet_type: item.bet_type,
                    number: item.number.clone(),
                    amount: item.amount,
                    multiply: rate.multiply,
                    sale_cap: None,
                },
            );
            if self.session.cart().len() > before {
                added += 1;
            }
        }
        self.persist_cart();
        added
    }

    pub fn set_stake(&mut self, id: u64, amount: u64) -> bool {
        let changed = self.session.cart_mut().set_amount(id, amount);
        if changed {
            self.persist_cart();
        }
        changed
    }

    /// Apply one stake to every row.
    pub fn apply_bulk_stake(&mut self, amount: u64) {
        self.session.cart_mut().set_amount_all(amount);
        self.persist_cart();
    }

    pub fn remove_line(&mut self, id: u64) -> bool {
        let removed = self.session.cart_mut().remove(id);
        if removed {
            self.persist_cart();
        }
        removed
    }

    /// Remove the rows appended by the most recent add action.
    pub fn undo(&mut self) -> usize {
        let removed = self.session.cart_mut().undo_last();
        if removed > 0 {
            self.persist_cart();
        }
        removed
    }

    pub fn clear_cart(&mut self) {
        self.session.cart_mut().clear();
        self.persist_cart();
    }

    fn persist_cart(&self) {
        self.store.save_cart(&self.period.id, self.session.cart());
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Submit the whole cart as one bulk order. Validation happens before any
    /// request: every row staked, no row over a sale cap. On success the cart
    /// is cleared and a receipt snapshot returned.
    pub async fn submit(&mut self, note: &str) -> Result<SubmitReceipt> {
        let cart = self.session.cart();
        if cart.is_empty() {
            return Err(Error::EmptyCart);
        }
        if cart.missing_stake() {
            return Err(Error::MissingStake);
        }
        let blockers: Vec<String> = cart
            .blockers()
            .iter()
            .map(|item| item.number.clone())
            .collect();
        if !blockers.is_empty() {
            return Err(Error::SaleLimitExceeded { numbers: blockers });
        }
        let stock_id: u64 = self
            .period
            .id
            .parse()
            .map_err(|_| Error::InvalidPeriodId(self.period.id.clone()))?;

        let bets: Vec<BetOrder> = cart
            .items()
            .iter()
            .map(|item| BetOrder {
                bet_type: item.bet_type,
                number: item.number.clone(),
                amount: item.amount,
            })
            .collect();
        let snapshot = cart.items().to_vec();
        let total_amount = cart.total_amount();
        let total_potential_win = cart.total_potential_win();

        let response = self
            .client
            .place_bulk_bets(&BulkBetRequest {
                stock_id,
                bets,
                note: note.to_string(),
            })
            .await?;

        self.session.cart_mut().clear();
        self.persist_cart();
        tracing::info!(
            poy_id = %response.poy_id,
            bets = snapshot.len(),
            total_amount,
            "bulk bet placed"
        );
        if let Err(err) = self.client.refresh_profile().await {
            tracing::warn!(?err, "credit refresh after submit failed");
        }

        Ok(SubmitReceipt {
            poy_id: response.poy_id,
            poy_number: response.poy_number,
            bets: snapshot,
            total_amount,
            total_potential_win,
            note: note.to_string(),
        })
    }

    // -----------------------------------------------------------------------
    // Rules and templates
    // -----------------------------------------------------------------------

    pub async fn rules(&self) -> Result<LotteryRules> {
        self.client.lottery_rules(&self.period.huay_code).await
    }

    /// Save the current cart as a named template.
    pub async fn save_template(&self, name: &str, description: Option<&str>) -> Result<Template> {
        let cart = self.session.cart();
        if cart.is_empty() {
            return Err(Error::EmptyCart);
        }
        let items: Vec<BetOrder> = cart
            .items()
            .iter()
            .map(|item| BetOrder {
                bet_type: item.bet_type,
                number: item.number.clone(),
                amount: item.amount,
            })
            .collect();
        self.client
            .save_template(&SaveTemplateRequest {
                name: name.to_string(),
                description: description.map(str::to_string),
                items,
            })
            .await
    }
}
