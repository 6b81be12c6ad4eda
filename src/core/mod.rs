pub mod dispatch;
pub mod etl;
pub mod fetch;
pub mod table;

pub use crate::domain::model::DatasetDescriptor;
pub use crate::domain::ports::{BrowserLauncher, Converter, PageSession, Storage};
pub use crate::utils::error::Result;
