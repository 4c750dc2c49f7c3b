//! Application composition
//!
//! - [`pages`]: the page views and route table
//! - [`root`]: the application root, mounted instances and render output

pub mod error;
pub mod pages;
pub mod root;

pub use error::{AppError, AppResult};
pub use pages::{app_routes, Page, NOT_FOUND_MESSAGE};
pub use root::{AppContext, AppRoot, MountedApp, RenderTree};
