pub mod hasher;
pub mod mailer;
pub mod repository;
pub mod tokener;
