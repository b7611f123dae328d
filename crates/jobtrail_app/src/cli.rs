//! Command-line surface of the `jobtrail` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobtrail_core::TabId;

/// Track job applications scraped from saved job pages.
#[derive(Debug, Parser)]
#[command(name = "jobtrail", version, about, long_about = None)]
pub struct Cli {
    /// RON configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "jobtrail.ron")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replay a page load for a saved HTML snapshot and print the current job
    Scrape {
        /// Address the snapshot was taken from
        #[arg(long)]
        url: String,
        /// Saved page markup
        #[arg(long)]
        html: PathBuf,
        #[arg(long, default_value_t = 1)]
        tab: TabId,
        /// Also save the extracted job as a bookmark
        #[arg(long)]
        save: bool,
    },
    /// Print the most recently saved jobs
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Move a saved job to another state
    Update {
        #[arg(long)]
        id: String,
        /// bookmark, applied, shortlisted, interviewing or negotiation
        #[arg(long)]
        state: String,
    },
    /// Remove a saved job
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Remove every saved job
    Clear,
    /// Send one raw JSON message and print the answer
    Message {
        #[arg(long)]
        json: String,
        #[arg(long)]
        tab: Option<TabId>,
    },
}
