pub mod abstract_trait;
pub mod app;
pub mod config;
pub mod dispatcher;
pub mod kafka;
pub mod processor;
