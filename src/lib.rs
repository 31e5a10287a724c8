//! Payroll Computation and Finalization Engine
//!
//! This crate reconciles raw attendance swipes against official schedules,
//! computes gross and net pay for draft payroll rows, tracks which rows are
//! eligible for batch export, and finalizes them into immutable records with
//! at-most-once semantics per employee and pay period.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod finalization;
pub mod models;
pub mod selection;
pub mod store;
