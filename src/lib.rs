//! galaxycache - offline cache worker for the TeamGalaxy site.
//!
//! Keeps navigation possible without a network: a fixed core asset set is
//! seeded into a version-named cache bucket at install time, buckets left
//! over from older versions are swept at activate time, and GET requests
//! are served network-first with cache and offline-page fallback.

pub mod cache;
pub mod config;
pub mod net;
pub mod worker;
