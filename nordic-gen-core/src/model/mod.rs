//! Top-level module for the character-level Markov model.
//!
//! This module provides:
//! - Training records and name normalization (`TrainingRecord`)
//! - The weighted transition table with back-off levels (`TransitionTable`)
//! - Internal state management (`State`, `ContextModel`)
//! - Generation constraints (`GenConstraints`)
//! - A high-level generation interface (`Generator`)
//! - Statistics over a trained table (`ModelStats`)

/// High-level interface drawing names from a trained table.
///
/// Handles context fallback, length bounds, prefix seeding, suffix and
/// duplicate checks, bounded retries and batches.
pub mod generator;

/// Transition table built from weighted training records.
///
/// Supports sequential and parallel construction, merging and
/// back-off lookup.
pub mod table;

/// All contexts of one length of the transition table.
pub mod context_model;

/// A single context and its weighted outgoing transitions.
pub mod state;

/// Validated, lowercase training names and display capitalization.
pub mod record;

/// Length, prefix and suffix constraints of a generation run.
pub mod constraints;

/// Bounded retry combinator.
pub mod retry;

/// Read-only statistics of a trained table.
pub mod stats;
