//! `writebuddy doctor` — diagnose configuration and upstream health.

use std::sync::Arc;
use writebuddy_config::AppConfig;
use writebuddy_core::Provider;
use writebuddy_providers::OpenAiProvider;

pub async fn run() -> anyhow::Result<()> {
    println!("WriteBuddy doctor\n");

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  [ok] config loaded");
            config
        }
        Err(e) => {
            println!("  [!!] config: {e}");
            return Ok(());
        }
    };

    writebuddy_assist::tokens::preload();
    println!("  [ok] cl100k_base encoder available");

    if config.gateway.api_keys.is_empty() && config.gateway.admin_code.is_none() {
        println!("  [!!] no client API keys and no admin code — every request will be rejected");
    } else {
        println!("  [ok] {} client key(s) configured", config.gateway.api_keys.len());
    }

    match OpenAiProvider::from_config(&config) {
        Ok(provider) => {
            let provider: Arc<dyn Provider> = Arc::new(provider);
            match provider.health_check().await {
                Ok(true) => println!("  [ok] provider reachable at {}", config.provider.base_url),
                Ok(false) => println!("  [!!] provider returned an error status"),
                Err(e) => println!("  [!!] provider unreachable: {e}"),
            }
        }
        Err(e) => println!("  [!!] {e}"),
    }

    Ok(())
}
