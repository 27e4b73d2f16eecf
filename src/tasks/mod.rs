use clap::Subcommand;

use crate::tasks::images::DEFAULT_OUTPUT_DIR;

/// The two standalone utilities shipped by this binary
#[derive(Subcommand, Debug)]
pub enum Task {
    /// Download random images for one minute and save them to disk
    Images {
        /// Directory the images are written to
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        path: String,
    },
    /// Print the crates.io download totals of reqwest and hyper
    Downloads,
}

pub mod downloads;
pub mod images;
