//! Volatility scan command implementation.

use anyhow::Result;
use capital_broker::SymbolScanner;
use capital_config::AppConfig;
use capital_core::error::ApiError;
use capital_core::traits::{BarIndicator, MarketApi};
use capital_core::types::{Resolution, ScanReport, Session, SymbolVolatility};
use capital_indicators::AverageTrueRange;
use tracing::{info, warn};

use crate::cli::{OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config: &AppConfig) -> Result<()> {
    config.validate()?;

    let (client, session) = super::connect(config).await?;
    let scanner = SymbolScanner::new(config.scanner.scanner_config());

    let report = run_scan(
        &client,
        &session,
        &scanner,
        config.scanner.resolution,
        config.scanner.max_results,
    )
    .await?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => print!("{}", report.summary()),
    }

    Ok(())
}

/// Scan for candidates, then fetch prices and compute ATR for each one.
///
/// A symbol whose prices cannot be fetched or are too short for ATR is
/// reported as skipped; fatal API errors abort the run.
pub async fn run_scan<A>(
    api: &A,
    session: &Session,
    scanner: &SymbolScanner,
    resolution: Resolution,
    max_results: usize,
) -> Result<ScanReport, ApiError>
where
    A: MarketApi + ?Sized,
{
    let candidates = scanner.scan(api, session).await?;
    let atr = AverageTrueRange::new();
    let mut symbols = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let bars = match api
            .historical_prices(session, &candidate.epic, resolution, max_results)
            .await
        {
            Ok(bars) => bars,
            Err(e) if !e.is_fatal() => {
                warn!(epic = %candidate.epic, error = %e, "Skipping symbol");
                symbols.push(SymbolVolatility::skipped(candidate, e.to_string()));
                continue;
            }
            Err(e) => return Err(e),
        };

        match atr.calculate(&bars) {
            Ok(value) => {
                info!(
                    epic = %candidate.epic,
                    indicator = atr.name(),
                    value,
                    bars = bars.len(),
                    "Indicator computed"
                );
                symbols.push(SymbolVolatility::computed(candidate, value));
            }
            Err(e) => {
                warn!(
                    epic = %candidate.epic,
                    indicator = atr.name(),
                    error = %e,
                    "Indicator unavailable"
                );
                symbols.push(SymbolVolatility::skipped(candidate, e.to_string()));
            }
        }
    }

    Ok(ScanReport {
        balance: session.balance(),
        symbols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use capital_broker::{ScannerConfig, SpreadFilter};
    use capital_core::types::{Credentials, MarketSnapshot, PriceBar};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockApi {
        markets: Vec<MarketSnapshot>,
        prices: HashMap<String, Result<Vec<PriceBar>, fn() -> ApiError>>,
        requests: Mutex<Vec<(String, Resolution, usize)>>,
    }

    impl MockApi {
        fn new(markets: Vec<MarketSnapshot>) -> Self {
            Self {
                markets,
                prices: HashMap::new(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MarketApi for MockApi {
        async fn create_session(&self, _credentials: &Credentials) -> Result<Session, ApiError> {
            Session::new(None, "T1", "T2")
        }

        async fn market_navigation(
            &self,
            _session: &Session,
            _node_id: &str,
        ) -> Result<Vec<MarketSnapshot>, ApiError> {
            Ok(self.markets.clone())
        }

        async fn historical_prices(
            &self,
            _session: &Session,
            epic: &str,
            resolution: Resolution,
            max_results: usize,
        ) -> Result<Vec<PriceBar>, ApiError> {
            self.requests
                .lock()
                .unwrap()
                .push((epic.to_string(), resolution, max_results));
            match self.prices.get(epic) {
                Some(Ok(bars)) => Ok(bars.clone()),
                Some(Err(make)) => Err(make()),
                None => Ok(Vec::new()),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn market(epic: &str, bid: Decimal, offer: Decimal) -> MarketSnapshot {
        MarketSnapshot {
            epic: epic.to_string(),
            bid: Some(bid),
            offer: Some(offer),
            instrument_name: None,
        }
    }

    fn scanner() -> SymbolScanner {
        SymbolScanner::new(ScannerConfig {
            categories: vec!["hierarchy_v1.shares.us.most_traded".to_string()],
            filter: SpreadFilter::default(),
        })
    }

    fn session() -> Session {
        Session::new(Some(dec!(1000)), "T1", "T2").unwrap()
    }

    #[tokio::test]
    async fn test_scan_computes_atr_per_candidate() {
        let mut api = MockApi::new(vec![
            market("XYZ", dec!(85.0), dec!(85.1)),
            market("CHEAP", dec!(50.0), dec!(50.05)),
        ]);
        api.prices.insert(
            "XYZ".to_string(),
            Ok(vec![
                PriceBar::new(10.0, 8.0, 9.0),
                PriceBar::new(12.0, 9.0, 11.0),
            ]),
        );

        let report = run_scan(&api, &session(), &scanner(), Resolution::Day, 14)
            .await
            .unwrap();

        assert_eq!(report.balance, Some(dec!(1000)));
        assert_eq!(report.symbols.len(), 1);
        assert_eq!(report.symbols[0].epic, "XYZ");
        assert_eq!(report.symbols[0].spread, dec!(0.1));
        assert_eq!(report.symbols[0].atr, Some(3.0));

        let requests = api.requests.lock().unwrap();
        assert_eq!(*requests, vec![("XYZ".to_string(), Resolution::Day, 14)]);
    }

    #[tokio::test]
    async fn test_partial_fetch_and_short_history_are_skipped() {
        let mut api = MockApi::new(vec![
            market("GONE", dec!(90.0), dec!(90.1)),
            market("NEW", dec!(95.0), dec!(95.1)),
            market("OK", dec!(100.0), dec!(100.1)),
        ]);
        api.prices.insert(
            "GONE".to_string(),
            Err(|| ApiError::PartialFetch {
                resource: "prices/GONE".to_string(),
                status: 404,
                body: String::new(),
            }),
        );
        api.prices
            .insert("NEW".to_string(), Ok(vec![PriceBar::new(10.0, 8.0, 9.0)]));
        api.prices.insert(
            "OK".to_string(),
            Ok(vec![
                PriceBar::new(10.0, 8.0, 9.0),
                PriceBar::new(12.0, 9.0, 11.0),
            ]),
        );

        let report = run_scan(&api, &session(), &scanner(), Resolution::Hour, 5)
            .await
            .unwrap();

        assert_eq!(report.symbols.len(), 3);
        assert!(report.symbols[0].skipped.is_some());
        assert!(report.symbols[1].skipped.is_some());
        assert_eq!(report.symbols[2].atr, Some(3.0));
        assert_eq!(report.computed().count(), 1);
    }

    #[tokio::test]
    async fn test_fatal_price_error_aborts() {
        let mut api = MockApi::new(vec![market("XYZ", dec!(85.0), dec!(85.1))]);
        api.prices.insert(
            "XYZ".to_string(),
            Err(|| ApiError::Transport("connection reset".to_string())),
        );

        let result = run_scan(&api, &session(), &scanner(), Resolution::Day, 14).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
