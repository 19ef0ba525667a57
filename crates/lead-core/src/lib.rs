pub mod artifact;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod util;
pub mod vectorizer;
