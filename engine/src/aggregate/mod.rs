// Group-by aggregation producing chart series. Categories are sorted
// lexicographically so a page renders the same series on every pass.
use painel_shared::models::{ChartPoint, ChartSeries};
use painel_shared::utils::brazilian_format::format_currency;
use std::collections::BTreeMap;

/// Groups rows by a categorical key and counts each group.
/// Blank categories are kept; pages that must exclude them (the contract
/// status distribution) drop those rows before aggregating.
pub fn count_by<T>(rows: &[T], name: &str, key_of: impl Fn(&T) -> &str) -> ChartSeries {
    let mut groups: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        *groups.entry(key_of(row).to_string()).or_insert(0) += 1;
    }
    ChartSeries {
        name: name.to_string(),
        points: groups
            .into_iter()
            .map(|(category, count)| ChartPoint {
                category,
                value: count as f64,
                label: None,
            })
            .collect(),
    }
}

/// Groups rows by a categorical key and sums a numeric column per group.
pub fn sum_by<T>(
    rows: &[T],
    name: &str,
    key_of: impl Fn(&T) -> &str,
    value_of: impl Fn(&T) -> f64,
) -> ChartSeries {
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows {
        *groups.entry(key_of(row).to_string()).or_insert(0.0) += value_of(row);
    }
    ChartSeries {
        name: name.to_string(),
        points: groups
            .into_iter()
            .map(|(category, sum)| ChartPoint {
                category,
                value: sum,
                label: None,
            })
            .collect(),
    }
}

/// Attaches a currency-formatted label to every point; the horizontal value
/// bars embed "R$ ..." text directly on each bar.
pub fn with_currency_labels(mut series: ChartSeries) -> ChartSeries {
    for point in &mut series.points {
        point.label = Some(format_currency(point.value));
    }
    series
}
