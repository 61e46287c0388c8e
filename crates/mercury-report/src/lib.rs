//! Codec, signer recovery and validation for Mercury price reports.
//!
//! Mercury reports travel as a "full report": an ABI-encoded bundle of the OCR report context,
//! the report itself and the oracle signatures over it. This crate decodes that bundle, picks
//! the report schema from the feed id, flattens reports into a dynamically typed map and checks
//! that map the way downstream consumers expect.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod error;
pub use error::*;

mod feed;
pub use feed::*;

mod full;
pub use full::*;

mod report;
pub use report::*;

mod validate;
pub use validate::*;

mod value;
pub use value::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use alloy_primitives::aliases::{I192, U192};
