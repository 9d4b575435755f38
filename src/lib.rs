// src/lib.rs

pub mod action;
pub mod config;
pub mod error;
pub mod request;
pub mod result;
pub mod sys;

pub use action::SecretFetchAction;
pub use result::{ActionResult, FailureKind};
