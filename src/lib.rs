pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod providers;
pub mod rate_provider;
pub mod series;
pub mod service;
pub mod store;
pub mod twr;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{AppConfig, ProviderDescriptor};
use crate::providers::{FixerProvider, LocalProvider, ProviderChain, SyntheticProvider};
use crate::rate_provider::{CurrencyCode, RateProvider};
use crate::service::ExchangeRateService;
use crate::store::{MemoryRateStore, RateStore};

/// Commands the application can execute.
pub enum AppCommand {
    Rate {
        source: String,
        target: String,
        date: Option<String>,
    },
    Convert {
        source: String,
        target: String,
        amount: String,
    },
    Series {
        source: String,
        target: String,
        start: String,
        end: Option<String>,
    },
    Twr {
        source: String,
        target: String,
        amount: String,
        start: String,
        flows: Vec<String>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Exchange rate tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let service = build_service(&config)?;

    match command {
        AppCommand::Rate {
            source,
            target,
            date,
        } => cli::rate::run(&service, &source, &target, date.as_deref()).await,
        AppCommand::Convert {
            source,
            target,
            amount,
        } => cli::convert::run(&service, &source, &target, &amount).await,
        AppCommand::Series {
            source,
            target,
            start,
            end,
        } => cli::series::run(&service, &source, &target, &start, end.as_deref()).await,
        AppCommand::Twr {
            source,
            target,
            amount,
            start,
            flows,
        } => cli::twr::run(&service, &source, &target, &amount, &start, &flows).await,
        AppCommand::Currencies => cli::currencies::run(&config.currencies),
    }
}

/// Wires the store, providers and chain described by `config` into a
/// ready-to-use service.
pub fn build_service(config: &AppConfig) -> Result<ExchangeRateService> {
    let store = Arc::new(MemoryRateStore::new());
    for rate in &config.local_rates {
        let source = CurrencyCode::parse(&rate.source)
            .with_context(|| format!("Invalid source currency in local_rates: {}", rate.source))?;
        let target = CurrencyCode::parse(&rate.target)
            .with_context(|| format!("Invalid target currency in local_rates: {}", rate.target))?;
        store.insert(source, target, rate.date, rate.rate);
    }

    let mut entries: Vec<(ProviderDescriptor, Arc<dyn RateProvider>)> = Vec::new();
    for descriptor in &config.chain {
        if !descriptor.is_active {
            debug!("Provider {} is inactive, skipping", descriptor.name);
            continue;
        }
        let provider: Arc<dyn RateProvider> = match descriptor.name.as_str() {
            "fixer" => {
                let base_url = config
                    .providers
                    .fixer
                    .as_ref()
                    .map_or("http://data.fixer.io/api", |fixer| fixer.base_url.as_str());
                let access_key = config.fixer_access_key().context(
                    "Fixer provider is active but no access key is configured; \
                     set providers.fixer.access_key or the FIXER_API_KEY variable",
                )?;
                Arc::new(FixerProvider::new(base_url, &access_key))
            }
            "local" => Arc::new(LocalProvider::new(Arc::clone(&store) as Arc<dyn RateStore>)),
            "synthetic" => {
                let seed = config
                    .providers
                    .synthetic
                    .as_ref()
                    .map_or(42, |synthetic| synthetic.seed);
                Arc::new(SyntheticProvider::new(seed))
            }
            other => anyhow::bail!("Unknown provider '{other}' in chain configuration"),
        };
        entries.push((descriptor.clone(), provider));
    }

    let chain = ProviderChain::new(entries);

    let mut currencies = Vec::with_capacity(config.currencies.len());
    for currency in &config.currencies {
        let code = CurrencyCode::parse(&currency.code)
            .with_context(|| format!("Invalid currency code in config: {}", currency.code))?;
        currencies.push(code);
    }

    Ok(ExchangeRateService::new(chain, currencies))
}
