//! Lottery betting domain.
//!
//! Defines the bet-type catalog, the combinatorial number generators, the cart and
//! session state machines, and the betting-period model used by the client layer.

mod bet_type;
mod cart;
pub mod generate;
mod period;
mod session;

pub use bet_type::*;
pub use cart::*;
pub use period::*;
pub use session::*;

#[cfg(test)]
mod tests;
