pub mod banner;
pub mod error;
pub mod logger;
pub mod validation;
