use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lingo_transport::TransportType;

#[derive(Parser)]
#[command(name = "lingo")]
#[command(about = "ConvoLingo voice agent CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Join the configured room as the interactive console
    Console,

    /// Run the voice bot in the configured room
    Bot {
        /// Transport preset to join with (daily, twilio, webrtc)
        #[arg(short, long, default_value = "daily")]
        transport: TransportType,

        /// Flow configuration JSON (defaults to the bundled flow)
        #[arg(short, long)]
        flow: Option<PathBuf>,
    },

    /// Start the console dev server
    Serve {
        /// Server port
        #[arg(short, long, default_value = "7860")]
        port: u16,
    },
}
