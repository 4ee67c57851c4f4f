//! Will module - the draft a user edits before the create-will transaction is built.

mod will_draft;
mod will_model;

pub use will_draft::WillDraft;
pub use will_model::{ApprovalRequest, CreateWillRequest, DeathCondition};
