pub mod memory;

#[cfg(feature = "browser")]
pub mod browser;
