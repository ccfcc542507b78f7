//! The three fixed input sources

use std::fmt;

/// One of the pipeline's input sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Nested campaign -> daily metrics API export
    GoogleAds,
    /// Flat per-day platform export
    Facebook,
    /// Hand-maintained revenue ledger
    Crm,
}

impl Source {
    /// All sources in pipeline order
    pub const ALL: [Source; 3] = [Source::GoogleAds, Source::Facebook, Source::Crm];

    /// Stable name used in issue reports and as the platform label
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::GoogleAds => "google_ads",
            Source::Facebook => "facebook",
            Source::Crm => "crm",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
