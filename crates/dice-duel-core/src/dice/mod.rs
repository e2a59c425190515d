//! Dice and the catalog they are chosen from.

mod catalog;
mod die;

pub use catalog::{Catalog, MIN_DICE};
pub use die::Dice;
