pub mod dispatcher;
pub mod line_source;
pub mod tracker;

pub use crate::domain::model::{DispatchReport, DrainOutcome, Line, UnitStats};
pub use crate::domain::ports::{ConfigProvider, LineProcessor, LineSource};
pub use crate::utils::error::Result;
