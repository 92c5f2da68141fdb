//! `batch_cancel` crate.
//!
//! A worker that polls one task queue and, when dispatched, asks Temporal to
//! cancel or terminate every workflow execution matching a visibility query
//! by starting a server-side batch operation.

pub mod activities;
pub mod request;
pub mod service;
pub mod worker;
