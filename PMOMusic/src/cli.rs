//! Ligne de commande de PMOMusic

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse and search a PMOMusic library snapshot
#[derive(Parser, Debug)]
#[command(name = "pmomusic", version, about)]
pub struct Cli {
    /// Configuration directory (defaults to $PMOMUSIC_CONFIG, ./.pmomusic or ~/.pmomusic)
    #[arg(short = 'c', long = "config", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Library snapshot, overriding `library.snapshot`
    #[arg(short = 'l', long = "library", value_name = "FILE")]
    pub library: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the root node
    Root,

    /// Show a single node
    Item {
        #[arg(value_name = "MEDIA_ID")]
        media_id: String,
    },

    /// List the children of a node
    #[command(visible_alias = "ls")]
    Browse {
        #[arg(value_name = "MEDIA_ID", default_value = "category:root")]
        media_id: String,
        #[arg(short = 'p', long = "page", default_value_t = 0)]
        page: u32,
        /// Page size, `browser.default_page_size` when omitted
        #[arg(short = 's', long = "size")]
        page_size: Option<u32>,
        /// Return every child at once
        #[arg(short = 'a', long = "all", conflicts_with = "page")]
        all: bool,
    },

    /// Search the library
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
        #[arg(short = 'p', long = "page", default_value_t = 0)]
        page: u32,
        #[arg(short = 's', long = "size")]
        page_size: Option<u32>,
        /// Only print the number of matches
        #[arg(long = "count")]
        count: bool,
    },
}
