use serde::{Deserialize, Serialize};

use crate::api::HuayConfig;

/// One wagering mode. Serialized as the backend's option-type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BetType {
    #[serde(rename = "teng_bon_4")]
    TopFour,
    #[serde(rename = "tode_4")]
    TodeFour,
    #[serde(rename = "teng_bon_3")]
    TopThree,
    #[serde(rename = "teng_lang_3")]
    BottomThree,
    #[serde(rename = "tode_3")]
    TodeThree,
    #[serde(rename = "teng_bon_2")]
    TopTwo,
    #[serde(rename = "teng_lang_2")]
    BottomTwo,
    #[serde(rename = "teng_bon_1")]
    TopOne,
    #[serde(rename = "teng_lang_1")]
    BottomOne,
}

impl BetType {
    /// Every bet type, in payout-table display order (4-digit first).
    pub const ALL: [BetType; 9] = [
        BetType::TopFour,
        BetType::TodeFour,
        BetType::TopThree,
        BetType::BottomThree,
        BetType::TodeThree,
        BetType::TopTwo,
        BetType::BottomTwo,
        BetType::TopOne,
        BetType::BottomOne,
    ];

    /// Selector rows: a straight type paired with its any-order variant where one exists.
    pub const DISPLAY_GROUPS: [(BetType, Option<BetType>); 7] = [
        (BetType::TopFour, Some(BetType::TodeFour)),
        (BetType::TopThree, Some(BetType::TodeThree)),
        (BetType::BottomThree, None),
        (BetType::TopTwo, None),
        (BetType::BottomTwo, None),
        (BetType::TopOne, None),
        (BetType::BottomOne, None),
    ];

    /// The backend's option-type code for this bet type.
    pub fn code(&self) -> &'static str {
        match self {
            BetType::TopFour => "teng_bon_4",
            BetType::TodeFour => "tode_4",
            BetType::TopThree => "teng_bon_3",
            BetType::BottomThree => "teng_lang_3",
            BetType::TodeThree => "tode_3",
            BetType::TopTwo => "teng_bon_2",
            BetType::BottomTwo => "teng_lang_2",
            BetType::TopOne => "teng_bon_1",
            BetType::BottomOne => "teng_lang_1",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// How many digits a wagered number for this type carries.
    pub fn digit_count(&self) -> usize {
        match self {
            BetType::TopFour | BetType::TodeFour => 4,
            BetType::TopThree | BetType::BottomThree | BetType::TodeThree => 3,
            BetType::TopTwo | BetType::BottomTwo => 2,
            BetType::TopOne | BetType::BottomOne => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BetType::TopFour => "4 straight",
            BetType::TodeFour => "4 any order",
            BetType::TopThree => "3 top",
            BetType::BottomThree => "3 bottom",
            BetType::TodeThree => "3 any order",
            BetType::TopTwo => "2 top",
            BetType::BottomTwo => "2 bottom",
            BetType::TopOne => "1 top run",
            BetType::BottomOne => "1 bottom run",
        }
    }

    /// True for the "tode" variants, which settle regardless of digit order.
    pub fn is_any_order(&self) -> bool {
        matches!(self, BetType::TodeFour | BetType::TodeThree)
    }

    /// Category heading the cart view groups items under.
    pub fn category(&self) -> &'static str {
        match self.digit_count() {
            4 => "four-digit",
            3 => "three-digit",
            2 => "two-digit",
            _ => "running",
        }
    }
}

impl Default for BetType {
    fn default() -> Self {
        BetType::TopThree
    }
}

impl std::fmt::Display for BetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-type stake limits and payout multiplier, as configured server-side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetRate {
    pub bet_type: BetType,
    pub multiply: f64,
    pub min_bet: u64,
    pub max_bet: u64,
    pub max_per_number: u64,
    pub is_active: bool,
}

impl BetRate {
    /// Build the client-side rate row from a payout-config entry. Returns `None` for
    /// rows whose option type the catalog does not know.
    pub fn from_config(config: &HuayConfig) -> Option<Self> {
        let bet_type = BetType::from_code(&config.option_type)?;
        Some(Self {
            bet_type,
            multiply: config.multiply,
            min_bet: config.min_price,
            max_bet: config.max_price,
            max_per_number: config.max_price_per_num,
            is_active: config.status == 1,
        })
    }
}
