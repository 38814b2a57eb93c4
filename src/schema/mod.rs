//! Strict schema module
//!
//! Typed endpoint inventory entities and the strict decoder behind them.
//!
//! # Overview
//!
//! Every entity lists its accepted attributes in a field table. A single
//! generic routine applies that table to a JSON attribute map: known keys
//! are type-checked and stored, unknown keys fail the decode. Upstream
//! schema drift therefore surfaces as an error instead of lost data.

mod decoder;
mod entities;
mod types;

pub use decoder::decode_strict;
pub use entities::{
    EndpointRecord, EventRecord, HostRecord, PageResponse, UserRecord, MIN_PAYLOAD_LEN,
};
pub use types::{Field, Setter, StrictEntity};
