//! Host-side persistence contracts and time helpers for the desktop core.
//!
//! This crate is the boundary between the in-memory stores and whatever
//! durability the embedding host provides (localStorage, IndexedDB, a plain
//! map in tests). Stores treat persistence as best-effort: adapters report
//! failures as strings and callers log and continue.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod envelope;
pub mod kv;
pub mod time;

pub use envelope::{build_envelope, decode_envelope, StateEnvelope, STATE_ENVELOPE_VERSION};
pub use kv::{
    load_typed, save_typed, KeyValueFuture, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore,
};
pub use time::{next_monotonic_ms, unix_time_ms_now};
