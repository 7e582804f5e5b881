use crate::commandline::Commandline;
use crate::error::ParleyError;
use clap::Parser;

mod broadcast;
mod commandline;
mod configuration;
mod connection;
mod context;
mod error;
mod lifecycle;
mod message;
mod registry;
mod sentiment;
mod server;
mod session;
mod store;
#[cfg(test)]
mod utils;

#[tokio::main]
async fn main() -> Result<(), ParleyError> {
	let commandline = Commandline::parse();
	commandline.run().await
}
