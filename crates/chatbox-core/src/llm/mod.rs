pub mod box_provider;
pub mod client;
pub mod prompt;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;
