//! Datasource tool adapters.

mod command;

pub use command::CommandDatasourceTool;
