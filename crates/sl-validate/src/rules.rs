//! Per-source rule tables
//!
//! Each source gets one static [`SourceRules`] describing which columns the
//! shared checks in [`crate::checks`] run against. Columns named here but
//! absent from a record set are skipped.

use sl_core::Source;

/// How a row's identity is derived for issue correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIdentity {
    /// `campaign_id|date`
    CampaignDate {
        campaign_column: &'static str,
        date_column: &'static str,
    },
    /// The natural order identifier
    Order { column: &'static str },
}

/// Rewrite a column into a dollar column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    pub from: &'static str,
    pub to: &'static str,
    pub divisor: f64,
    pub decimals: i32,
}

/// Implausible-value detection on one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierRule {
    pub column: &'static str,
    /// Values above this are always outliers
    pub absolute_ceiling: f64,
    /// Values above `multiplier * quantile(q)` are outliers
    pub multiplier: f64,
    pub quantile: f64,
}

/// The full rule assembly for one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRules {
    pub source: Source,
    pub identity: RowIdentity,
    /// Columns where a null or blank value is reported as `missing`
    pub required: &'static [&'static str],
    /// Columns rewritten to `YYYY-MM-DD`, with a `<col>_normalized` companion
    pub date_columns: &'static [&'static str],
    /// Numeric columns where negatives are `invalid`
    pub non_negative: &'static [&'static str],
    pub unit_conversion: Option<UnitConversion>,
    /// Categorical columns folded to trimmed lowercase
    pub casing: &'static [&'static str],
    pub outlier: Option<OutlierRule>,
    /// Columns whose combined value must be unique
    pub duplicate_key: &'static [&'static str],
}

const CAMPAIGN_DATE: RowIdentity = RowIdentity::CampaignDate {
    campaign_column: "campaign_id",
    date_column: "date",
};

pub static GOOGLE_ADS: SourceRules = SourceRules {
    source: Source::GoogleAds,
    identity: CAMPAIGN_DATE,
    required: &["campaign_id", "date", "impressions", "clicks", "cost_micros"],
    date_columns: &["date"],
    non_negative: &["cost_micros"],
    unit_conversion: Some(UnitConversion {
        from: "cost_micros",
        to: "spend",
        divisor: 1_000_000.0,
        decimals: 2,
    }),
    casing: &[],
    outlier: None,
    duplicate_key: &["campaign_id", "date"],
};

pub static FACEBOOK: SourceRules = SourceRules {
    source: Source::Facebook,
    identity: CAMPAIGN_DATE,
    required: &["campaign_id", "date", "impressions", "clicks", "spend", "purchases"],
    date_columns: &["date"],
    non_negative: &["spend"],
    unit_conversion: None,
    casing: &[],
    outlier: None,
    duplicate_key: &["campaign_id", "date"],
};

pub static CRM: SourceRules = SourceRules {
    source: Source::Crm,
    identity: RowIdentity::Order { column: "order_id" },
    required: &["customer_id", "revenue", "campaign_source"],
    date_columns: &["order_date"],
    non_negative: &["revenue"],
    unit_conversion: None,
    casing: &["channel_attributed"],
    outlier: Some(OutlierRule {
        column: "revenue",
        absolute_ceiling: 1_000_000.0,
        multiplier: 10.0,
        quantile: 0.99,
    }),
    duplicate_key: &["order_id"],
};

/// Rule table for a source
pub fn rules_for(source: Source) -> &'static SourceRules {
    match source {
        Source::GoogleAds => &GOOGLE_ADS,
        Source::Facebook => &FACEBOOK,
        Source::Crm => &CRM,
    }
}

/// Name of the companion column holding a column's canonical form
pub fn normalized_column(column: &str) -> String {
    format!("{}_normalized", column)
}
