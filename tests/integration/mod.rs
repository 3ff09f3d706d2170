//! Integration tests for configurator

mod cli_run;
mod collector;
mod config_loading;
mod phases;
mod rendering;
mod test_utils;
