pub mod directory;
pub mod engine;
pub mod locks;
pub mod repository;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
