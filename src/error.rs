use crate::configuration::ConfigurationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParleyError {
	#[error("Failed to load configuration: {0}")]
	Configuration(#[from] ConfigurationError),
	#[error("Failed to parse commandline: {0}")]
	Commandline(#[from] clap::Error),
	#[error("Failed to initialize application: {0}")]
	Initialization(#[from] anyhow::Error),
	#[error("IO error while serving requests: {0}")]
	Server(#[from] std::io::Error),
}
