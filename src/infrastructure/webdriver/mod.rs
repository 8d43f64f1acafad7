//! W3C WebDriver adapter
//!
//! Drives the real translator page in a browser through any W3C WebDriver
//! endpoint (chromedriver, geckodriver, Selenium):
//! - `client`: HTTP wire protocol over reqwest
//! - `surface`: input and output surfaces, re-located on every call
//! - `exchange`: backend exchange watch via the Resource Timing buffer
//! - `page`: the translator page and browser capabilities

pub mod client;
pub mod errors;
pub mod exchange;
pub mod page;
pub mod surface;

pub use client::{WebDriverClient, ELEMENT_KEY};
pub use errors::WebDriverError;
pub use exchange::ResourceTimingWatcher;
pub use page::{capabilities, WebDriverPage};
pub use surface::{ReadMode, WebDriverSurface};
