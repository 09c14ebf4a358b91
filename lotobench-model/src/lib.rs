pub mod combinations;
pub mod error;
pub mod load;
pub mod models;

pub use error::{Error, Result};
