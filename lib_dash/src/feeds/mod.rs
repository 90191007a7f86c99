//! Public threat-feed integrations.
//!
//! Sibling pattern to the refresh engine, without the cache: every fetch is
//! a best-effort pull that truncates to the display count and degrades to an
//! empty list on any error. The presentation renders an empty list as a
//! "no data" placeholder, so nothing here ever raises.

pub mod kev;
pub mod malwarebazaar;
pub mod threatfox;
pub mod urlhaus;

pub use kev::KnownExploited;
pub use malwarebazaar::SampleHash;
pub use threatfox::Indicator;
pub use urlhaus::MaliciousUrl;

use serde::Serialize;

/// How many entries each feed card displays.
pub const DISPLAY_LIMIT: usize = 10;

/// One pull of every feed.
#[derive(Debug, Default, Serialize)]
pub struct FeedSnapshot {
    pub threatfox: Vec<Indicator>,
    pub urlhaus: Vec<MaliciousUrl>,
    pub malwarebazaar: Vec<SampleHash>,
    pub kev: Vec<KnownExploited>,
}

/// Bundle of the four feed clients.
pub struct ThreatIntel {
    threatfox: threatfox::ThreatFox,
    urlhaus: urlhaus::Urlhaus,
    malwarebazaar: malwarebazaar::MalwareBazaar,
    kev: kev::CisaKev,
}

impl ThreatIntel {
    /// Clients against the production feed endpoints.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            threatfox: threatfox::ThreatFox::new()?,
            urlhaus: urlhaus::Urlhaus::new()?,
            malwarebazaar: malwarebazaar::MalwareBazaar::new()?,
            kev: kev::CisaKev::new()?,
        })
    }

    /// Pulls all four feeds concurrently. Feeds are independent, so one
    /// failing endpoint only empties its own card.
    pub async fn snapshot(&self, limit: usize) -> FeedSnapshot {
        let (threatfox, urlhaus, malwarebazaar, kev) = tokio::join!(
            self.threatfox.recent_iocs(limit),
            self.urlhaus.recent_urls(limit),
            self.malwarebazaar.recent_samples(limit),
            self.kev.recent_vulnerabilities(limit),
        );
        FeedSnapshot {
            threatfox,
            urlhaus,
            malwarebazaar,
            kev,
        }
    }
}
