//! Superfighters Deluxe server directory client.
//!
//! Fetches the live server listing from the directory SOAP service, turns the
//! XML payload into [`Server`] records and resolves server addresses to
//! country codes through a shared [`CountryCache`].

pub mod directory;
mod error;
pub mod geo;
pub mod parser;
pub mod query;
mod server;

pub use directory::{
    ChannelSink, DirectoryFetcher, DirectoryProvider, MockDirectoryProvider, ServerSink,
    SoapDirectoryClient,
};
pub use error::*;
pub use geo::{
    CountryCache, GeoProvider, GeoRecord, IpApiClient, MockGeoProvider, UNKNOWN_COUNTRY,
};
pub use parser::parse_servers;
pub use query::{ServerQuery, SortKey};
pub use server::*;
