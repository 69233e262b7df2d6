pub mod account;
pub mod evaluator;
pub mod experience;
pub mod import;
pub mod outbox;
pub mod report;
