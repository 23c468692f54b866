use std::env;

use log::*;
use oeg_common::TaxRate;

const DEFAULT_OEG_HOST: &str = "127.0.0.1";
const DEFAULT_OEG_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/oeg.db";
const DEFAULT_ORDERS_TABLE: &str = "orders";
const DEFAULT_ENRICHED_TABLE: &str = "orders_enriched";
const DEFAULT_FEED_BATCH_SIZE: usize = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The table the primary store keeps order records in.
    pub orders_table: String,
    /// The table the secondary store keeps enriched records in.
    pub enriched_table: String,
    /// The tax rate the enrichment computation applies. Changing this between redeliveries of the same event will
    /// change what a redelivered write produces; drain the feed before changing it.
    pub tax_rate: TaxRate,
    /// The maximum number of change events handed to the stream consumer per invocation.
    pub feed_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_OEG_HOST.to_string(),
            port: DEFAULT_OEG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            orders_table: DEFAULT_ORDERS_TABLE.to_string(),
            enriched_table: DEFAULT_ENRICHED_TABLE.to_string(),
            tax_rate: TaxRate::default(),
            feed_batch_size: DEFAULT_FEED_BATCH_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("OEG_HOST").ok().unwrap_or_else(|| DEFAULT_OEG_HOST.into());
        let port = env::var("OEG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for OEG_PORT. {e} Using the default, {DEFAULT_OEG_PORT}, instead."
                    );
                    DEFAULT_OEG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_OEG_PORT);
        let database_url = env::var("OEG_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ OEG_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let orders_table = env::var("ORDERS_TABLE").ok().unwrap_or_else(|| DEFAULT_ORDERS_TABLE.into());
        let enriched_table = env::var("ENRICHED_TABLE").ok().unwrap_or_else(|| DEFAULT_ENRICHED_TABLE.into());
        let tax_rate = env::var("TAX_RATE")
            .map(|s| {
                s.parse::<TaxRate>().unwrap_or_else(|e| {
                    warn!(
                        "🪛️ {s} is not a valid TAX_RATE. {e} Using the default, {}, instead.",
                        TaxRate::default()
                    );
                    TaxRate::default()
                })
            })
            .ok()
            .unwrap_or_default();
        let feed_batch_size = env::var("OEG_FEED_BATCH_SIZE")
            .map(|s| {
                s.parse::<usize>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid OEG_FEED_BATCH_SIZE. {e} Using the default, {DEFAULT_FEED_BATCH_SIZE}, \
                         instead."
                    );
                    DEFAULT_FEED_BATCH_SIZE
                })
            })
            .ok()
            .unwrap_or(DEFAULT_FEED_BATCH_SIZE);
        Self { host, port, database_url, orders_table, enriched_table, tax_rate, feed_batch_size }
    }
}
