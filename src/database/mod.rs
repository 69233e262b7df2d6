#[cfg(test)]
pub mod memory;
pub mod rows;
pub mod sqlx;
