//! `nodes` crate — the `ExecutableNode` trait and built-in node implementations.
//!
//! Built-in nodes:
//! - [`ValidatorNode`] — checks configured fields per item and annotates or
//!   gates the items.
//! - [`WebhookTrigger`] — turns an inbound POST into workflow input.
//!
//! The validation engine itself lives in [`validation`] and is usable on its
//! own.

pub mod error;
pub mod traits;
pub mod validation;
pub mod validator;
pub mod webhook;

pub use error::NodeError;
pub use traits::{ExecutableNode, ExecutionContext};
pub use validator::{ValidatorMode, ValidatorNode};
pub use webhook::WebhookTrigger;
