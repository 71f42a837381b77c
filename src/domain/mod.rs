//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `nutrition` - Profile snapshot and daily target calculation
//! - `plan` - Reading generated weekly plans, metric lines and recipes
//! - `prompts` - Prompt text sent to the text generator

pub mod foundation;
pub mod nutrition;
pub mod plan;
pub mod prompts;
