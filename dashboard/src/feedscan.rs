//! One-shot threat-feed snapshot.
//!
//! Pulls the four public feed cards once and prints them, with an explicit
//! placeholder line for any feed that returned nothing.

use anyhow::Result;

use lib_dash::feeds::{DISPLAY_LIMIT, ThreatIntel};
use lib_dash::loggers::setup_logging;

// load .env files before anything else
use static_init::dynamic;

#[dynamic]
static DOTENV_INIT: () = {
    // Set up environment variables
    dotenvy::dotenv().ok();
};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = setup_logging("feedscan")?;

    let intel = ThreatIntel::new()?;
    let snapshot = intel.snapshot(DISPLAY_LIMIT).await;

    println!("== ThreatFox indicators ==");
    if snapshot.threatfox.is_empty() {
        println!("  no indicators retrieved");
    }
    for ioc in &snapshot.threatfox {
        println!(
            "  [{}] {} ({}) {}",
            ioc.threat_type,
            ioc.ioc,
            ioc.ioc_type,
            ioc.tags.clone().unwrap_or_default().join(", ")
        );
    }

    println!("\n== URLhaus recent URLs ==");
    if snapshot.urlhaus.is_empty() {
        println!("  no recent malicious URLs");
    }
    for url in &snapshot.urlhaus {
        println!("  {} [{}]", url.url, url.threat);
    }

    println!("\n== MalwareBazaar recent samples ==");
    if snapshot.malwarebazaar.is_empty() {
        println!("  no recent sample hashes");
    }
    for sample in &snapshot.malwarebazaar {
        println!(
            "  {} ({}) {}",
            sample.sha256_hash,
            sample.file_type,
            sample.tags.clone().unwrap_or_default().join(", ")
        );
    }

    println!("\n== CISA known exploited vulnerabilities ==");
    if snapshot.kev.is_empty() {
        println!("  no recent vulnerabilities");
    }
    for vuln in &snapshot.kev {
        println!(
            "  {} {} - {}: {}",
            vuln.cve_id, vuln.vendor_project, vuln.product, vuln.vulnerability_name
        );
    }

    Ok(())
}
