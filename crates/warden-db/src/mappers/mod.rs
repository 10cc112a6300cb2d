//! Model to entity mappers
//!
//! Conversions between database rows and domain entities (warden-core).
//! Ids are stored as `BIGINT`; the `u64 <-> i64` conversion is a bit cast.

mod log_override;
mod moderation;
mod settings;
