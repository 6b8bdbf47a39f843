pub mod day_key;
pub mod error;
#[cfg(feature = "api")]
pub mod fetch;
pub mod format;
pub mod observation;
pub mod well;
