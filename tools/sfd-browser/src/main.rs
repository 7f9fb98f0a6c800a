//! sfd-browser - lists live Superfighters Deluxe game servers.

mod cli;
mod logging;
mod table;
mod watch;

use std::collections::HashMap;
use std::process;

use clap::Parser;
use sfd_config::{BrowserConfig, load_config_or_default};
use sfd_directory::{
    ChannelSink, CountryCache, DirectoryFetcher, IpApiClient, Server, ServerQuery,
    SoapDirectoryClient,
};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::cli::Args;
use crate::watch::FetchSlot;

const MIN_REFRESH_INTERVAL: time::Duration = time::Duration::from_secs(1);

struct Browser {
    query: ServerQuery,
    geo: Option<CountryCache<IpApiClient>>,
    details: bool,
}

impl Browser {
    async fn render(&self, servers: Vec<Server>) -> String {
        let servers = self.query.apply(&servers);
        if servers.is_empty() {
            return "No servers found.".to_string();
        }

        let countries = match &self.geo {
            Some(cache) => cache.lookup_servers(&servers).await,
            None => HashMap::new(),
        };

        if self.details {
            table::server_details(&servers, &countries)
        } else {
            table::server_table(&servers, &countries).to_string()
        }
    }
}

fn build_geo(args: &Args, config: &BrowserConfig) -> Option<CountryCache<IpApiClient>> {
    if args.no_geo || !config.geo.enabled {
        debug!("Country lookups disabled");
        return None;
    }

    match IpApiClient::from_config(&config.geo) {
        Ok(client) => Some(CountryCache::new(client)),
        Err(e) => {
            warn!("Country lookups unavailable: {}", e);
            None
        }
    }
}

async fn run_once(fetcher: &DirectoryFetcher<SoapDirectoryClient>, browser: &Browser) {
    match fetcher.fetch().await {
        Some(servers) => println!("{}", browser.render(servers).await),
        None => println!("No servers available right now."),
    }
}

async fn run_watch(
    fetcher: DirectoryFetcher<SoapDirectoryClient>,
    browser: &Browser,
    interval: time::Duration,
) {
    info!(
        "Refreshing every {}, press Ctrl-C to stop",
        humantime::format_duration(interval)
    );

    let (sink, mut listings) = ChannelSink::channel();
    let mut slot = FetchSlot::new();
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fetcher = fetcher.clone();
                let sink = sink.clone();
                let started = slot.try_spawn(async move {
                    if !fetcher.fetch_into(&sink).await {
                        warn!("No servers available this cycle, retrying on next tick");
                    }
                });
                if !started {
                    debug!("Previous fetch still running, skipping this tick");
                }
            }
            Some(servers) = listings.recv() => {
                match watch::unless_cancelled(browser.render(servers), &mut ctrl_c).await {
                    Some(rendered) => {
                        if let Err(e) = console::Term::stdout().clear_screen() {
                            debug!("Failed to clear screen: {}", e);
                        }
                        println!("{}", rendered);
                    }
                    None => {
                        info!("Stopping refresh");
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("Stopping refresh");
                break;
            }
        }
    }

    slot.abort();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    logging::init_subscriber(&config.logging);

    let client = match SoapDirectoryClient::from_config(&config.directory) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create directory client: {}", e);
            process::exit(1);
        }
    };

    let fetcher = DirectoryFetcher::new(client);
    let browser = Browser {
        query: args.query(),
        geo: build_geo(&args, &config),
        details: args.details,
    };

    if args.watch {
        let mut interval = args.interval.unwrap_or(config.refresh.interval);
        if interval < MIN_REFRESH_INTERVAL {
            warn!(
                "Refresh interval too short, using {}",
                humantime::format_duration(MIN_REFRESH_INTERVAL)
            );
            interval = MIN_REFRESH_INTERVAL;
        }
        run_watch(fetcher, &browser, interval).await;
    } else {
        run_once(&fetcher, &browser).await;
    }
}
