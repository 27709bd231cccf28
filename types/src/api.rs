//! Wire types for the portal's REST API (`/api/v1`).
//!
//! Field names mirror the backend's JSON: most payloads are camelCase, the
//! legacy rate/history rows are snake_case. The backend is the source of truth
//! for all of these; the client only reads and echoes them.

use serde::{Deserialize, Serialize};

use crate::lottery::{BetType, CheckOutcome, SaleCap};

/// Error envelope returned with non-2xx statuses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Payout configuration
// ---------------------------------------------------------------------------

/// One payout-config row for a lottery. Only rows with `default == 1` and
/// `status == 1` apply to member betting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HuayConfig {
    pub id: u64,
    pub huay_id: u64,
    pub huay_type: String,
    pub option_type: String,
    pub min_price: u64,
    pub max_price: u64,
    pub multiply: f64,
    pub status: u8,
    #[serde(rename = "default")]
    pub is_default: u8,
    pub max_price_per_num: u64,
    #[serde(default)]
    pub max_price_per_user: u64,
    #[serde(default)]
    pub type_config: u8,
}

// ---------------------------------------------------------------------------
// Sale-cap check
// ---------------------------------------------------------------------------

/// Per-number pre-insertion check, consulted once per candidate number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMultiplyRequest {
    pub huay_id: u64,
    pub stock_type: String,
    pub huay_option: BetType,
    pub poy_number: String,
    pub multiply: f64,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMultiplyResponse {
    /// The multiplier actually applicable to this number; may be lower than the
    /// nominal one for special numbers.
    pub multiply: f64,
    #[serde(default)]
    pub is_special_number: bool,
    #[serde(default)]
    pub sold_amount: u64,
    #[serde(default)]
    pub remaining_amount: u64,
    #[serde(default)]
    pub max_sale_amount: u64,
    pub result: CheckOutcome,
    /// Advisory text shown when the outcome is not `Ok`. The wire name keeps
    /// the backend's spelling.
    #[serde(default, rename = "codition")]
    pub condition: Option<String>,
}

impl CheckMultiplyResponse {
    /// The sale-cap metadata to attach to the cart row, when the number is
    /// cap-tracked.
    pub fn sale_cap(&self) -> Option<SaleCap> {
        if !self.is_special_number {
            return None;
        }
        Some(SaleCap {
            sold_amount: self.sold_amount,
            remaining_amount: self.remaining_amount,
            max_sale_amount: self.max_sale_amount,
            outcome: self.result,
        })
    }
}

// ---------------------------------------------------------------------------
// Bet placement
// ---------------------------------------------------------------------------

/// One (bet type, number, stake) triple; shared by bulk submission and saved
/// templates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetOrder {
    pub bet_type: BetType,
    pub number: String,
    pub amount: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkBetRequest {
    pub stock_id: u64,
    pub bets: Vec<BetOrder>,
    pub note: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkBetResponse {
    pub poy_id: String,
    #[serde(default)]
    pub poy_number: String,
    #[serde(default)]
    pub total_bets: u32,
    #[serde(default)]
    pub total_price: f64,
}

/// One settled or pending bet row from the member's history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetRecord {
    pub id: String,
    pub lottery_name: String,
    pub period_name: String,
    pub bet_type: BetType,
    pub number: String,
    pub amount: u64,
    pub payout_rate: f64,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_amount: Option<f64>,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Rules and saved templates
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LotteryRules {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    pub id: String,
    pub template_id: String,
    pub bet_type: BetType,
    pub number: String,
    pub amount: u64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub member_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TemplateItem>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTemplateRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub items: Vec<BetOrder>,
}

// ---------------------------------------------------------------------------
// Authentication and member profile
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Account-creation payload. Registration does not log the member in; the new
/// account signs in through the normal login flow.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub bank_name: String,
    pub bank_account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    pub agree_to_terms: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub id: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub credit: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub member: MemberProfile,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    pub amount: u64,
    pub bank_code: String,
    pub service_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositTicket {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_id: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub status: String,
    pub created_at: String,
}

// ---------------------------------------------------------------------------
// Game lobby
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameItem {
    pub game_code: String,
    pub game_name: String,
    pub provider: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLaunchRequest {
    pub game_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub platform: String,
    pub language: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameLaunch {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Affiliate and chat
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateStats {
    #[serde(default)]
    pub referral_code: String,
    #[serde(default)]
    pub total_members: u32,
    #[serde(default)]
    pub total_commission: f64,
    #[serde(default)]
    pub pending_commission: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: u64,
    pub sender: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Lottery results
// ---------------------------------------------------------------------------

/// The settled-results page for one date.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsPage {
    #[serde(default)]
    pub lotteries: Vec<crate::lottery::LotteryResult>,
}
