use std::fs;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tracing::info;

use fxr::config::AppConfig;
use fxr::rate_provider::CashFlow;

mod test_utils {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A fixer endpoint that fails every request, as if the API is down.
    pub async fn create_broken_fixer_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Currencies section shared by the test configs.
    pub const CURRENCIES_YAML: &str = r#"
currencies:
  - code: "EUR"
    name: "Euro"
    symbol: "€"
  - code: "USD"
    name: "US Dollar"
    symbol: "$"
"#;
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_local_rate_answers_when_fixer_is_down() {
    let mock_server = test_utils::create_broken_fixer_server().await;

    let config_content = format!(
        r#"{currencies}
providers:
  fixer:
    base_url: {base_url}
    access_key: "test-key"
chain:
  - name: "fixer"
    priority: 2
  - name: "local"
    priority: 1
local_rates:
  - source: "EUR"
    target: "USD"
    date: "2024-01-01"
    rate: "1.0800"
"#,
        currencies = test_utils::CURRENCIES_YAML,
        base_url = mock_server.uri()
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let service = fxr::build_service(&config).expect("service should build");
    let quote = service
        .get_rate("EUR", "USD", Some(date(1)))
        .await
        .expect("local store should answer");

    info!(?quote, "Fallback answered");
    assert_eq!(quote.rate_value, dec!(1.0800));
    assert_eq!(quote.provider, "local");
    assert_eq!(quote.valuation_date, date(1));
}

#[test_log::test(tokio::test)]
async fn test_fixer_rate_flows_through_the_service() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let mock_server = MockServer::start().await;
    let body = r#"{ "success": true, "date": "2024-01-15", "rates": { "USD": 1.0956 } }"#;
    Mock::given(method("GET"))
        .and(path("/2024-01-15"))
        .and(query_param("access_key", "integration-key"))
        .and(query_param("base", "EUR"))
        .and(query_param("symbols", "USD"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let config_content = format!(
        r#"{currencies}
providers:
  fixer:
    base_url: {base_url}
    access_key: "integration-key"
chain:
  - name: "fixer"
    priority: 1
"#,
        currencies = test_utils::CURRENCIES_YAML,
        base_url = mock_server.uri()
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let service = fxr::build_service(&config).expect("service should build");
    let quote = service
        .get_rate("EUR", "USD", Some(date(15)))
        .await
        .expect("fixer mock should answer");

    assert_eq!(quote.rate_value, dec!(1.0956));
    assert_eq!(quote.provider, "fixer");
}

#[test_log::test(tokio::test)]
async fn test_chain_reports_exhaustion_when_nothing_answers() {
    let mock_server = test_utils::create_broken_fixer_server().await;

    // Fixer is down and the local store holds no rates at all.
    let config_content = format!(
        r#"{currencies}
providers:
  fixer:
    base_url: {base_url}
    access_key: "test-key"
chain:
  - name: "fixer"
    priority: 2
  - name: "local"
    priority: 1
"#,
        currencies = test_utils::CURRENCIES_YAML,
        base_url = mock_server.uri()
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let service = fxr::build_service(&config).expect("service should build");
    let err = service
        .get_rate("EUR", "USD", Some(date(1)))
        .await
        .expect_err("no provider can answer");

    let message = err.to_string();
    assert!(message.contains("all providers exhausted"), "got: {message}");
    assert!(message.contains("EUR/USD"), "got: {message}");
}

#[test_log::test(tokio::test)]
async fn test_series_skips_days_without_rates() {
    let config_content = format!(
        r#"{currencies}
chain:
  - name: "local"
    priority: 1
local_rates:
  - source: "EUR"
    target: "USD"
    date: "2024-01-01"
    rate: "1.0700"
  - source: "EUR"
    target: "USD"
    date: "2024-01-03"
    rate: "1.0900"
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let service = fxr::build_service(&config).expect("service should build");
    let series = service
        .get_series("EUR", "USD", date(1), Some(date(4)))
        .await
        .expect("series should build");

    let dates: Vec<NaiveDate> = series.iter().map(|q| q.valuation_date).collect();
    assert_eq!(dates, vec![date(1), date(3)]);
    assert_eq!(series[0].rate_value, dec!(1.0700));
    assert_eq!(series[1].rate_value, dec!(1.0900));
}

#[test_log::test(tokio::test)]
async fn test_chain_follows_configured_priorities() {
    // Config order deliberately differs from priority order, and the
    // fixer entry is parked inactive.
    let config_content = format!(
        r#"{currencies}
providers:
  synthetic:
    seed: 11
chain:
  - name: "local"
    priority: 1
  - name: "synthetic"
    priority: 3
  - name: "fixer"
    priority: 2
    is_active: false
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let service = fxr::build_service(&config).expect("service should build");
    assert_eq!(service.chain().provider_names(), vec!["synthetic", "local"]);
}

#[test_log::test(tokio::test)]
async fn test_twr_through_the_configured_chain() {
    let config_content = format!(
        r#"{currencies}
chain:
  - name: "local"
    priority: 1
local_rates:
  - source: "EUR"
    target: "USD"
    date: "2024-01-01"
    rate: "1.10"
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let service = fxr::build_service(&config).expect("service should build");
    let flows = vec![CashFlow {
        date: date(2),
        amount: dec!(100),
    }];
    let result = service
        .calculate_twr("EUR", "USD", dec!(1000), date(1), &flows)
        .await
        .expect("local provider computes the TWR");

    assert_eq!(result.twr_values, vec![dec!(1200)]);
    assert_eq!(result.final_twr, dec!(0.10));
}

#[test_log::test(tokio::test)]
async fn test_synthetic_rates_are_reproducible_across_services() {
    let config_content = format!(
        r#"{currencies}
providers:
  synthetic:
    seed: 7
chain:
  - name: "synthetic"
    priority: 1
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let first = fxr::build_service(&config).expect("service should build");
    let second = fxr::build_service(&config).expect("service should build");

    let quote_a = first.get_rate("EUR", "USD", Some(date(1))).await.unwrap();
    let quote_b = second.get_rate("EUR", "USD", Some(date(1))).await.unwrap();

    assert_eq!(quote_a.provider, "synthetic");
    assert_eq!(quote_a.rate_value, quote_b.rate_value);
}

#[test_log::test(tokio::test)]
async fn test_active_fixer_without_key_fails_to_build() {
    // Only meaningful when the environment does not supply a key.
    if std::env::var("FIXER_API_KEY").is_ok() {
        return;
    }

    let config_content = format!(
        r#"{currencies}
providers:
  fixer:
    base_url: "http://data.fixer.io/api"
chain:
  - name: "fixer"
    priority: 1
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let err = fxr::build_service(&config).expect_err("missing key should fail the build");
    assert!(err.to_string().contains("access key"), "got: {err}");
}

#[test_log::test(tokio::test)]
async fn test_unknown_chain_entry_fails_to_build() {
    let config_content = format!(
        r#"{currencies}
chain:
  - name: "telepathy"
    priority: 1
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    let config: AppConfig = serde_yaml::from_str(&config_content).expect("config should parse");

    let err = fxr::build_service(&config).expect_err("unknown provider should fail the build");
    assert!(err.to_string().contains("telepathy"), "got: {err}");
}

#[test_log::test(tokio::test)]
async fn test_currencies_command_runs_from_config_file() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"{currencies}
chain:
  - name: "local"
    priority: 1
local_rates:
  - source: "EUR"
    target: "USD"
    date: "2024-01-01"
    rate: "1.0842"
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = fxr::run_command(
        fxr::AppCommand::Currencies,
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert!(
        result.is_ok(),
        "Currencies command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_full_rate_flow_from_config_file() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"{currencies}
chain:
  - name: "local"
    priority: 1
local_rates:
  - source: "EUR"
    target: "USD"
    date: "2024-01-01"
    rate: "1.0842"
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = fxr::run_command(
        fxr::AppCommand::Rate {
            source: "EUR".to_string(),
            target: "USD".to_string(),
            date: Some("2024-01-01".to_string()),
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    assert!(
        result.is_ok(),
        "Rate command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_invalid_currency_is_reported_through_run_command() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"{currencies}
chain:
  - name: "local"
    priority: 1
"#,
        currencies = test_utils::CURRENCIES_YAML
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = fxr::run_command(
        fxr::AppCommand::Rate {
            source: "EURO".to_string(),
            target: "USD".to_string(),
            date: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("malformed currency should be rejected");
    assert!(err.to_string().contains("invalid input"), "got: {err}");
}
