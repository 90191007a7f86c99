//! # Backend Aggregation Live Data Test
//!
//! Fetches every dashboard resource from the configured backend and prints
//! the raw payloads, so schema drift shows up before it reaches the engine.

use lib_dash::backend::DashboardApi;
use lib_dash::configs::Settings;
use lib_dash::engine::resource::ResourceKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    let api = DashboardApi::new(&settings.api_base_url, None)?;

    println!("[*] Requesting live data from {}", settings.api_base_url);

    let mut failures = 0usize;
    for resource in ResourceKind::ALL {
        match api.fetch_resource(resource).await {
            Ok(payload) => {
                println!("\n[SUCCESS] {} received:", resource);
                println!("-----------------------------------------------");
                println!("{}", serde_json::to_string_pretty(&payload)?);
                println!("-----------------------------------------------");
            }
            Err(e) => {
                failures += 1;
                eprintln!("\n[ERROR] {} retrieval failed:", resource);
                eprintln!(">>> {}", e);
            }
        }
    }

    if failures == ResourceKind::ALL.len() {
        eprintln!("\n[ERROR] every resource failed, backend unreachable?");
        std::process::exit(1);
    }

    Ok(())
}
