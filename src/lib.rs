pub mod category;
pub mod config;
pub mod engine;
pub mod extract;
pub mod logging;
pub mod scanner;
pub mod test_support;
pub mod timeline;
pub mod types;
pub mod util;
