pub mod browser;
pub mod cache;
pub mod classes;
pub mod sdk;
pub mod search;
pub mod service;
pub mod util;

pub use browser::{SdkBrowser, SdkSnapshot};
pub use service::SdkBrowserService;
