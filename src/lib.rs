pub mod error;
pub mod generator;
pub mod kernel;
pub mod matcher;
pub mod rule;

#[cfg(test)]
mod tests;
