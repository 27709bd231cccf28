use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One timed betting window for a lottery draw, as served by the backend.
/// Read-only on the client; the running totals are display-only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    pub lottery_id: u64,
    pub huay_code: String,
    pub huay_name: String,
    pub huay_group: u32,
    pub period_name: String,
    /// Calendar date of the draw, `YYYY-MM-DD`.
    #[serde(default)]
    pub period_date: String,
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub result_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_time: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(default)]
    pub total_bet_amount: f64,
    #[serde(default)]
    pub total_payout_amount: f64,
    #[serde(default)]
    pub total_profit: f64,
    /// Set when the betting window spans midnight: the close timestamp then
    /// belongs to the day after the open timestamp.
    #[serde(default)]
    pub flag_nextday: bool,
}

impl Period {
    /// The close time adjusted for the midnight-spanning flag. When the flag is
    /// set and the raw close timestamp precedes the open timestamp, the window
    /// closes on the following day.
    pub fn effective_close(&self) -> DateTime<Utc> {
        if self.flag_nextday && self.close_time < self.open_time {
            self.close_time + Duration::days(1)
        } else {
            self.close_time
        }
    }

    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now > self.effective_close()
    }

    /// Stock-type code sent with sale-cap checks: `g` for government-group
    /// lotteries, `s` for stock-group ones.
    pub fn stock_type(&self) -> &'static str {
        if self.huay_code.starts_with('g') {
            "g"
        } else {
            "s"
        }
    }

    /// The `YYYY-MM-DD` date the settled result is filed under. The date
    /// string is server-supplied; anything that does not cleanly truncate to
    /// ten bytes falls back to the draw (or close) timestamp.
    pub fn result_date(&self) -> String {
        if let Some(date) = self.period_date.get(..10) {
            return date.to_string();
        }
        let fallback = self.draw_time.unwrap_or(self.close_time);
        fallback.format("%Y-%m-%d").to_string()
    }
}

/// Settled result for one lottery on one date. Every field is optional; a draw
/// without a filed result renders as awaiting-result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryResult {
    pub huay_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub huay_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result3_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result2_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result2_low: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result4_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result3_front: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result3_down: Option<String>,
}
