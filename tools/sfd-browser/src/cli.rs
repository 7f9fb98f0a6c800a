use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use sfd_directory::{ServerQuery, SortKey};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep refreshing the listing until interrupted
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Refresh interval in watch mode, e.g. "10s" (overrides the config)
    #[arg(long, value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Only show servers whose name contains this text
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, value_enum)]
    pub sort: Option<SortColumn>,

    /// Skip country lookups
    #[arg(long, default_value_t = false)]
    pub no_geo: bool,

    /// Print every field of each server instead of a table
    #[arg(long, default_value_t = false)]
    pub details: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Name,
    Mode,
    Players,
    Password,
    Version,
}

impl From<SortColumn> for SortKey {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => SortKey::GameName,
            SortColumn::Mode => SortKey::GameMode,
            SortColumn::Players => SortKey::Players,
            SortColumn::Password => SortKey::Password,
            SortColumn::Version => SortKey::Version,
        }
    }
}

impl Args {
    pub fn query(&self) -> ServerQuery {
        ServerQuery {
            search: self.search.clone(),
            sort: self.sort.map(SortKey::from),
        }
    }
}
