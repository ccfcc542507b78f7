//! Small on-disk projects for command tests

use crate::cli::GlobalArgs;
use std::fs;
use std::path::Path;

pub(crate) const GOOGLE_ADS_JSON: &str = r#"{"campaigns": [
  {"campaign_id": "G1", "campaign_name": "Brand", "campaign_type": "SEARCH", "status": "ENABLED",
   "daily_metrics": [
     {"date": "2024-01-01", "impressions": 100, "clicks": 5, "cost_micros": 2500000, "conversions": 1, "conversion_value": 10.0},
     {"date": "2024-01-02", "impressions": 90, "clicks": 4, "cost_micros": null, "conversions": 0, "conversion_value": 0}
   ]}
]}"#;

pub(crate) const FACEBOOK_CSV: &str = "\
campaign_id,campaign_name,date,impressions,clicks,spend,purchases,purchase_value,reach,frequency
F1,Prospecting,2024-01-01,1000,20,15.5,2,40.0,800,1.25
F1,Prospecting,someday,1100,22,16,1,20,900,1.22
";

pub(crate) const CRM_CSV: &str = "\
order_id,customer_id,order_date,revenue,channel_attributed,campaign_source,product_category,region
ORD1,CUST1,January 4, 2024,199.99,Facebook,camp_a,Shoes,US
ORD9,CUST2,2024-01-05,50,google,camp_b,Hats,EU
ORD9,CUST2,2024-01-05,50,google,camp_b,Hats,EU
";

/// Write the three sources under `root/data`
pub(crate) fn write_sources(root: &Path) {
    let data = root.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("google_ads_api.json"), GOOGLE_ADS_JSON).unwrap();
    fs::write(data.join("facebook_export.csv"), FACEBOOK_CSV).unwrap();
    fs::write(data.join("crm_revenue.csv"), CRM_CSV).unwrap();
}

/// Write a config with a fast retry policy
pub(crate) fn write_config(root: &Path, max_attempts: u32) {
    let config = format!(
        "name: test_project\nretry:\n  max_attempts: {}\n  backoff_base_secs: 0.01\n",
        max_attempts
    );
    fs::write(root.join("spendlake.yml"), config).unwrap();
}

pub(crate) fn global(root: &Path, warehouse: Option<&str>) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        project_dir: root.to_path_buf(),
        config: None,
        target: None,
        warehouse: warehouse.map(String::from),
    }
}
