//! Volatility scan report.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::SymbolCandidate;

/// ATR outcome for one scanned candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolVolatility {
    pub epic: String,
    pub spread: Decimal,
    /// Average true range, absent when the symbol was skipped
    pub atr: Option<f64>,
    /// Why no ATR was computed
    pub skipped: Option<String>,
}

impl SymbolVolatility {
    /// Row for a candidate with a computed ATR.
    pub fn computed(candidate: SymbolCandidate, atr: f64) -> Self {
        Self {
            epic: candidate.epic,
            spread: candidate.spread,
            atr: Some(atr),
            skipped: None,
        }
    }

    /// Row for a candidate whose prices or ATR could not be obtained.
    pub fn skipped(candidate: SymbolCandidate, reason: impl Into<String>) -> Self {
        Self {
            epic: candidate.epic,
            spread: candidate.spread,
            atr: None,
            skipped: Some(reason.into()),
        }
    }
}

/// Result of one volatility scan run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Balance reported at login
    pub balance: Option<Decimal>,
    pub symbols: Vec<SymbolVolatility>,
}

impl ScanReport {
    /// Symbols that produced an ATR value.
    pub fn computed(&self) -> impl Iterator<Item = &SymbolVolatility> {
        self.symbols.iter().filter(|s| s.atr.is_some())
    }

    /// Human-readable summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        match self.balance {
            Some(balance) => {
                let _ = writeln!(out, "Balance: {}", balance);
            }
            None => {
                let _ = writeln!(out, "Balance: unavailable");
            }
        }
        let _ = writeln!(out, "Filtered Symbols: {}", self.symbols.len());

        for row in &self.symbols {
            match (row.atr, &row.skipped) {
                (Some(atr), _) => {
                    let _ = writeln!(
                        out,
                        "  {:<24} spread {:>6}  ATR {:.4}",
                        row.epic, row.spread, atr
                    );
                }
                (None, reason) => {
                    let _ = writeln!(
                        out,
                        "  {:<24} spread {:>6}  ATR n/a ({})",
                        row.epic,
                        row.spread,
                        reason.as_deref().unwrap_or("skipped")
                    );
                }
            }
        }

        out
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
