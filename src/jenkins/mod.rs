pub mod client;
pub mod error;
pub mod fetcher;
pub mod parser;
pub mod resolver;

pub use client::JenkinsClient;
pub use error::FetchError;
