//! # kvstage Testkit
//!
//! Testing utilities for kvstage.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known XOR outputs that every chain must reproduce
//! - **Generators**: Proptest strategies for payloads, secrets and configs
//! - **Fixtures**: A shared store with helpers for building chains over it
//!
//! ## Golden Vectors
//!
//! ```rust
//! use kvstage_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok, masked) in verify_all_vectors() {
//!     assert!(ok, "{name}: {masked}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use kvstage_testkit::generators::{secret, text_payload};
//!
//! proptest! {
//!     #[test]
//!     fn round_trips(payload in text_payload(), secret in secret()) {
//!         // build a chain with `secret`, write `payload`, read it back
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use kvstage::Stage;
//! use kvstage_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let chain = fixture.text_chain("k", "secret");
//! chain.write("hola".to_string()).unwrap();
//! assert_eq!(chain.read().unwrap().as_deref(), Some("hola"));
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::TestFixture;
pub use generators::{pipeline_config, secret, text_payload};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
