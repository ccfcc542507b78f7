use super::*;
use std::fs;

const GOOGLE_JSON: &str = r#"{
  "campaigns": [
    {
      "campaign_id": "G1",
      "campaign_name": "Brand Search",
      "campaign_type": "SEARCH",
      "status": "ENABLED",
      "daily_metrics": [
        {"date": "2024-01-01", "impressions": 1000, "clicks": 50, "cost_micros": 2500000, "conversions": 3, "conversion_value": 120.5},
        {"date": "2024-01-02", "impressions": 900, "clicks": 40, "conversions": 2, "conversion_value": 80.0}
      ]
    },
    {
      "campaign_id": "G2",
      "campaign_name": "Display",
      "daily_metrics": [
        {"date": "2024-01-01", "impressions": 10, "clicks": 1, "cost_micros": 100000, "conversions": 0, "conversion_value": 0}
      ]
    },
    {"campaign_id": "G3", "campaign_name": "Empty"}
  ]
}"#;

#[test]
fn test_load_google_ads_flattens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("google.json");
    fs::write(&path, GOOGLE_JSON).unwrap();

    let rs = load_google_ads(Some(&path)).unwrap();
    assert_eq!(rs.len(), 3);
    assert_eq!(rs.value(0, "campaign_id"), &Value::text("G1"));
    assert_eq!(rs.value(1, "campaign_name"), &Value::text("Brand Search"));
    assert_eq!(rs.value(0, "cost_micros"), &Value::Int(2_500_000));
    assert_eq!(rs.value(0, "conversion_value"), &Value::Float(120.5));
    assert_eq!(rs.value(2, "status"), &Value::Null);
    assert!(rs.value(1, "cost_micros").is_null());
    assert!(rs.rows().all(|r| r.get("platform") == &Value::text("google_ads")));
}

#[test]
fn test_load_google_ads_without_campaigns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("google.json");
    fs::write(&path, "{}").unwrap();

    let rs = load_google_ads(Some(&path)).unwrap();
    assert!(rs.is_empty());
    assert!(rs.has_column("cost_micros"));
    assert!(rs.has_column("platform"));
}

#[test]
fn test_load_google_ads_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("google.json");
    fs::write(&path, "{not json").unwrap();

    let err = load_google_ads(Some(&path)).unwrap_err();
    assert!(matches!(err, IngestError::Json { .. }));
}

#[test]
fn test_load_google_ads_campaigns_not_a_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("google.json");
    fs::write(&path, r#"{"campaigns": 5}"#).unwrap();

    let err = load_google_ads(Some(&path)).unwrap_err();
    assert!(matches!(err, IngestError::InvalidStructure { .. }));
}

#[test]
fn test_load_facebook_infers_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fb.csv");
    fs::write(
        &path,
        "campaign_id,campaign_name,date,impressions,clicks,spend,purchases,purchase_value,reach,frequency\n\
         F1,Prospecting,2024-01-01,1000,20,15.5,2,40.0,800,1.25\n\
         F1,Prospecting,01/02/2024,1100,,16,,,900,1.22\n",
    )
    .unwrap();

    let rs = load_facebook(Some(&path)).unwrap();
    assert_eq!(rs.len(), 2);
    assert_eq!(rs.value(0, "impressions"), &Value::Int(1000));
    assert_eq!(rs.value(1, "spend"), &Value::Float(16.0));
    assert_eq!(rs.value(1, "clicks"), &Value::Null);
    assert_eq!(rs.value(1, "date"), &Value::text("01/02/2024"));
    assert_eq!(rs.value(0, "platform"), &Value::text("facebook"));
}

#[test]
fn test_load_facebook_pads_short_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fb.csv");
    fs::write(&path, "campaign_id,date,impressions\nF1,2024-01-01\n").unwrap();

    let rs = load_facebook(Some(&path)).unwrap();
    assert_eq!(rs.len(), 1);
    assert!(rs.value(0, "impressions").is_null());
}

#[test]
fn test_load_facebook_rejects_long_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fb.csv");
    fs::write(&path, "campaign_id,date\nF1,2024-01-01,extra\n").unwrap();

    let err = load_facebook(Some(&path)).unwrap_err();
    assert!(matches!(
        err,
        IngestError::MalformedRow {
            expected: 2,
            found: 3,
            ..
        }
    ));
}

#[test]
fn test_load_crm_keeps_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crm.csv");
    fs::write(
        &path,
        "order_id,customer_id,order_date,revenue,channel_attributed,campaign_source,product_category,region\n\
         ORD1,CUST1,January 4, 2024,199.99,Facebook,camp_a,Shoes,US\n\
         ORD2,CUST2,2024-01-05,50,google,camp_b,Hats,EU\n\
         ORD3\n",
    )
    .unwrap();

    let rs = load_crm(Some(&path)).unwrap();
    assert_eq!(rs.len(), 3);
    assert_eq!(rs.value(0, "order_date"), &Value::text("January 4, 2024"));
    // No type coercion at load time
    assert_eq!(rs.value(1, "revenue"), &Value::text("50"));
    assert_eq!(rs.value(2, "region"), &Value::text(""));
}

#[test]
fn test_load_crm_replaces_invalid_utf8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crm.csv");
    fs::write(&path, b"order_id,region\nORD1,M\xfcnchen\n").unwrap();

    let rs = load_crm(Some(&path)).unwrap();
    assert_eq!(rs.len(), 1);
    assert!(rs.value(0, "region").to_string().starts_with('M'));
}

#[test]
fn test_missing_files_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(matches!(
        load_google_ads(Some(&missing)),
        Err(IngestError::SourceNotFound { .. })
    ));
    assert!(matches!(
        load_facebook(Some(&missing)),
        Err(IngestError::SourceNotFound { .. })
    ));
    assert!(matches!(
        load_crm(Some(&missing)),
        Err(IngestError::SourceNotFound { .. })
    ));
}

#[test]
fn test_load_all_fails_when_any_source_missing() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("google_ads_api.json"), GOOGLE_JSON).unwrap();
    fs::write(data.join("facebook_export.csv"), "campaign_id,date\nF1,2024-01-01\n").unwrap();

    let config = Config::default();
    let err = load_all(&config, dir.path()).unwrap_err();
    assert!(matches!(err, IngestError::SourceNotFound { .. }));

    fs::write(data.join("crm_revenue.csv"), "order_id\nORD1\n").unwrap();
    let loaded = load_all(&config, dir.path()).unwrap();
    assert_eq!(loaded.google_ads.len(), 3);
    assert_eq!(loaded.get(Source::Facebook).len(), 1);
    assert_eq!(loaded.get(Source::Crm).len(), 1);
}
