//! Core library surface for the word-cards flashcard application.
//!
//! The store and its models carry no terminal dependencies, so the `bin`
//! target and any other front end drive the same vocabulary contract.
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Typed failures of the vocabulary store.
pub use error::StoreError;

/// The domain types passed between the store and the front end.
pub use models::{Entry, ExamplePair};

/// The indexed, persistent vocabulary collection.
pub use store::WordStore;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
