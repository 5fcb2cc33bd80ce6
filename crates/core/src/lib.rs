pub mod config;
pub mod error;
pub mod navigation;
pub mod types;

pub use config::AppConfig;
pub use error::{CrmError, CrmResult};
pub use navigation::Screen;
