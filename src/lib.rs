pub mod config;
pub mod core;
pub mod domain;
pub mod processors;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::settings::Settings;
pub use crate::core::{
    dispatcher::{DispatchOptions, Dispatcher},
    line_source::{stdin_source, ReaderLineSource},
    tracker::UnitTracker,
};
pub use domain::model::{DispatchReport, DrainOutcome, Line, UnitStats};
pub use domain::ports::{LineProcessor, LineSource};
pub use processors::{build_processor, ProcessorSpec};
pub use utils::error::{DispatchError, Result};
