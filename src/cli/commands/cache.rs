//! Cache maintenance command.

use analytics_config::AppConfig;
use analytics_core::traits::SystemClock;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::cli::{open_store, CacheAction, CacheArgs};

pub async fn run(args: CacheArgs, config: &AppConfig) -> Result<()> {
    let kind = args.kind;
    let mut store = open_store(kind, config, Arc::new(SystemClock));

    match args.action {
        CacheAction::Stats => {
            let stats = store.stats();
            match &stats.path {
                Some(path) => println!("Cache: {}", path.display()),
                None => println!("Cache: (memory)"),
            }
            println!("Entries: {}", stats.total_entries);
            println!("Fresh: {}", stats.fresh_count);
            println!("Stale: {}", stats.stale_count);
            match stats.last_updated {
                Some(at) => println!("Last updated: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
                None => println!("Last updated: never"),
            }
            println!("Size: {} bytes", stats.size_bytes);
            if let (Some(first), Some(last)) = (store.dates().next(), store.dates().last()) {
                println!("Range: {} to {}", first, last);
            }
        }
        CacheAction::Clear { date } => {
            if store.get(date).is_none() {
                println!("No cached entry for {}", date);
                return Ok(());
            }
            store.clear(date);
            info!(?kind, %date, "Cleared cached day");
            println!("Cleared {}", date);
        }
        CacheAction::ClearAll => {
            let removed = store.len();
            store.clear_all();
            info!(?kind, removed, "Cleared analytics cache");
            println!("Cleared {} entries", removed);
        }
    }

    Ok(())
}
