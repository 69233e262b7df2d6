pub mod answer;
pub mod claim;
pub mod email;
pub mod question;
pub mod report;
pub mod user;
