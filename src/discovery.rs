// =============================================================================
// Ticker discovery — cross-category frequency count
// =============================================================================
//
// Each category (e.g. gainers, most active, trending) contributes a set of
// symbols.  A symbol is selected when it appears in at least
// `min_categories` distinct categories.  Counting is over deduplicated
// per-category sets, so neither category order nor repeats inside one
// category change the result.
// =============================================================================

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

/// Trim and upper-case a raw symbol; `None` when nothing is left.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim().to_uppercase();
    (!symbol.is_empty()).then_some(symbol)
}

/// Symbols present in at least `min_categories` of `categories`.
pub fn common_tickers(
    categories: &BTreeMap<String, Vec<String>>,
    min_categories: usize,
) -> BTreeSet<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    for (category, symbols) in categories {
        let unique: BTreeSet<String> = symbols.iter().filter_map(|s| normalize_symbol(s)).collect();
        debug!(category = %category, unique = unique.len(), "category symbols");
        for symbol in unique {
            *counts.entry(symbol).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= min_categories)
        .map(|(symbol, _)| symbol)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    fn three_categories() -> BTreeMap<String, Vec<String>> {
        BTreeMap::from([
            ("gainers".to_string(), category(&["AAPL", "NVDA", "TSLA"])),
            ("most_active".to_string(), category(&["nvda", "AMD", "TSLA "])),
            ("trending".to_string(), category(&["AAPL", "PLTR"])),
        ])
    }

    #[test]
    fn selects_symbols_in_two_categories() {
        let common = common_tickers(&three_categories(), 2);
        let expected: BTreeSet<String> =
            ["AAPL", "NVDA", "TSLA"].iter().map(|s| s.to_string()).collect();
        assert_eq!(common, expected);
    }

    #[test]
    fn repeats_within_a_category_count_once() {
        let categories = BTreeMap::from([
            ("gainers".to_string(), category(&["AMD", "AMD", "amd"])),
            ("trending".to_string(), category(&["PLTR"])),
        ]);
        assert!(common_tickers(&categories, 2).is_empty());
    }

    #[test]
    fn single_threshold_is_union() {
        let all = common_tickers(&three_categories(), 1);
        assert_eq!(all.len(), 5);
    }

    #[test]
    fn blank_symbols_dropped() {
        assert_eq!(normalize_symbol("  "), None);
        assert_eq!(normalize_symbol(" msft "), Some("MSFT".to_string()));
    }
}
