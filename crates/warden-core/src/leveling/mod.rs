//! Leveling curve - XP thresholds and their inverse
//!
//! The curve is quadratic: reaching level `L >= 2` takes
//! `B + round(B * M / 100 * (L - 2)) * (L - 2)` total XP, where `B` is the
//! guild's base and `M` its modifier in percent. Levels 0 and 1 share the
//! pre-level-2 baseline `B`; every member starts at level 1.

mod curve;

pub use curve::{LevelCurve, MAX_LEVEL};
