pub mod credentials;
pub mod repository;
pub mod resolver;
pub mod service;
