//! # Threat Feed Live Data Test
//!
//! Pulls all four public feeds once and reports how many entries each one
//! returned. Empty results are expected when an upstream is down; the run
//! only fails if nothing at all could be retrieved.

use lib_dash::feeds::{DISPLAY_LIMIT, ThreatIntel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let intel = ThreatIntel::new()?;

    println!("[*] Pulling public threat feeds...");
    let snapshot = intel.snapshot(DISPLAY_LIMIT).await;

    println!("[INFO] threatfox: {} indicators", snapshot.threatfox.len());
    println!("[INFO] urlhaus: {} urls", snapshot.urlhaus.len());
    println!(
        "[INFO] malwarebazaar: {} samples",
        snapshot.malwarebazaar.len()
    );
    println!("[INFO] cisa kev: {} vulnerabilities", snapshot.kev.len());

    let total = snapshot.threatfox.len()
        + snapshot.urlhaus.len()
        + snapshot.malwarebazaar.len()
        + snapshot.kev.len();
    if total == 0 {
        eprintln!("[ERROR] all feeds came back empty");
        std::process::exit(1);
    }

    Ok(())
}
