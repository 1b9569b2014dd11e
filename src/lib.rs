//! Daily air-quality report service for Korean place names.
//!
//! Callers name a place ("성남시 분당구 정자1동"); the service resolves it
//! to a real monitoring station, fetches the latest reading and an AI
//! activity guide, applies safety overrides for the child's profile and
//! labels how trustworthy the result is. Upstream failures never surface
//! as errors: the report degrades into substitute content and says so in
//! its reliability record.
//!
//! Module map:
//!   - `model`: shared types and wire mappings
//!   - `stations`: place-name candidates and the hint table
//!   - `sentinel`: unknown-station signature detection
//!   - `ingest`: upstream HTTP clients and the station-fallback fetch
//!   - `view`: raw-reading to caller-view projection
//!   - `decision`: grades, risk adjustment, reliability, freshness
//!   - `report`: per-request orchestration
//!   - `config` / `logging`: process environment and tracing setup

pub mod config;
pub mod decision;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod sentinel;
pub mod stations;
pub mod view;
