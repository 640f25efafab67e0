#![doc(test(attr(deny(warnings))))]

//! Money Challenge turns a savings target in Tunisian dinars into a shuffled
//! list of cash batches that can be set aside one at a time.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod generator;
pub mod goal;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Money challenge tracing initialized.");
    });
}
