pub mod api;
pub mod lottery;

pub use lottery::{
    BetRate, BetSession, BetType, Cart, CheckOutcome, InputMode, LineItem, Period, SaleCap,
};
