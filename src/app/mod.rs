// Application layer: concrete conversion strategies and the WebDriver adapter.

pub mod browser;
pub mod converters;
