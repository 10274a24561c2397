// Filter resolver: narrows a loaded dataset to the user's UG selection and
// date/year/month ranges. All ranges are inclusive on both ends.
use chrono::{Days, NaiveDate};
use painel_shared::models::UgInfo;
use std::collections::BTreeSet;

/// The set of UG codes a user selected in the sidebar. Codes absent from
/// the UG reference table are dropped with a warning, falling open to no
/// selection rather than failing the render.
#[derive(Debug, Clone)]
pub struct UgSelection {
    codes: BTreeSet<u32>,
}

impl UgSelection {
    /// Resolves raw selected codes against the reference table.
    pub fn resolve(selected: &[u32], reference: &[UgInfo]) -> Self {
        let known: BTreeSet<u32> = reference.iter().map(|u| u.ug).collect();
        let mut codes = BTreeSet::new();
        for &code in selected {
            if known.contains(&code) {
                codes.insert(code);
            } else {
                tracing::warn!(ug = code, "UG ou SIGLA não encontrada; ignorando seleção");
            }
        }
        if codes.is_empty() && !selected.is_empty() {
            tracing::warn!("Nenhuma UG válida selecionada");
        }
        UgSelection { codes }
    }

    /// A selection taken at face value, with no reference table to check
    /// against (used by tests and by pages that already validated codes).
    pub fn from_codes(selected: &[u32]) -> Self {
        UgSelection {
            codes: selected.iter().copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, ug: u32) -> bool {
        self.codes.contains(&ug)
    }

    pub fn first(&self) -> Option<u32> {
        self.codes.iter().next().copied()
    }

    /// Resolves the parent "Unidade" grouping of the first selected UG,
    /// the label the staff page filters by. An empty selection or a code
    /// missing from the reference table yields None with a warning.
    pub fn unidade<'a>(&self, reference: &'a [UgInfo]) -> Option<&'a str> {
        let first = self.first()?;
        match reference.iter().find(|u| u.ug == first) {
            Some(u) => Some(u.unidade.as_str()),
            None => {
                tracing::warn!(ug = first, "UG ou SIGLA não encontrada. Tente novamente.");
                None
            }
        }
    }

    /// Keeps the rows whose UG is selected. An empty selection always
    /// yields an empty result.
    pub fn filter<T>(&self, rows: Vec<T>, ug_of: impl Fn(&T) -> u32) -> Vec<T> {
        rows.into_iter().filter(|r| self.contains(ug_of(r))).collect()
    }
}

/// Inclusive [start, end] date range, as produced by a sidebar slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateWindow { start, end }
    }

    /// Builds the window from dataset bounds. When the bounds collapse to a
    /// single day the lower bound is widened by one day so a range slider
    /// still has two distinct endpoints.
    pub fn from_bounds(min: NaiveDate, max: NaiveDate) -> Self {
        let start = if min == max {
            min.checked_sub_days(Days::new(1)).unwrap_or(min)
        } else {
            min
        };
        DateWindow { start, end: max }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn filter<T>(&self, rows: Vec<T>, date_of: impl Fn(&T) -> NaiveDate) -> Vec<T> {
        rows.into_iter().filter(|r| self.contains(date_of(r))).collect()
    }
}

/// Inclusive year range plus inclusive month range (1-12), the filter shape
/// of the monthly dashboards (expenses, per-diems, fuel, advances).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonthRange {
    pub year_start: i32,
    pub year_end: i32,
    pub month_start: u32,
    pub month_end: u32,
}

impl YearMonthRange {
    pub fn new(year_start: i32, year_end: i32, month_start: u32, month_end: u32) -> Self {
        YearMonthRange {
            year_start,
            year_end,
            month_start,
            month_end,
        }
    }

    /// Year bounds from the dataset, months defaulting to the full 1-12
    /// span. A single-year dataset widens the lower bound by one year so
    /// the year slider keeps two distinct endpoints.
    pub fn from_year_bounds(min_year: i32, max_year: i32) -> Self {
        let year_start = if min_year == max_year {
            max_year - 1
        } else {
            min_year
        };
        YearMonthRange {
            year_start,
            year_end: max_year,
            month_start: 1,
            month_end: 12,
        }
    }

    pub fn contains(&self, year: i32, month: u32) -> bool {
        year >= self.year_start
            && year <= self.year_end
            && month >= self.month_start
            && month <= self.month_end
    }

    pub fn filter<T>(&self, rows: Vec<T>, ym_of: impl Fn(&T) -> (i32, u32)) -> Vec<T> {
        rows.into_iter()
            .filter(|r| {
                let (year, month) = ym_of(r);
                self.contains(year, month)
            })
            .collect()
    }
}

/// Case-insensitive keyword search across the display fields of a row. An
/// empty keyword keeps everything.
pub fn keyword_matches<'a>(fields: impl IntoIterator<Item = &'a str>, keyword: &str) -> bool {
    let keyword = keyword.trim().to_lowercase();
    if keyword.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|f| f.to_lowercase().contains(&keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ug(code: u32) -> UgInfo {
        UgInfo {
            ug: code,
            nome_ug: format!("UG {}", code),
            sigla_ug: "SIG".to_string(),
            unidade: "Unidade".to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_selection_yields_empty_result() {
        let sel = UgSelection::from_codes(&[]);
        let rows = vec![100u32, 200, 100];
        assert!(sel.filter(rows, |&r| r).is_empty());
    }

    #[test]
    fn test_selection_keeps_matching_rows() {
        let sel = UgSelection::from_codes(&[100]);
        let rows = vec![100u32, 200, 100];
        assert_eq!(sel.filter(rows, |&r| r), vec![100, 100]);
    }

    #[test]
    fn test_resolve_drops_unknown_codes() {
        let reference = vec![ug(100), ug(200)];
        let sel = UgSelection::resolve(&[100, 999], &reference);
        assert!(sel.contains(100));
        assert!(!sel.contains(999));
    }

    #[test]
    fn test_resolve_all_unknown_falls_open_to_no_selection() {
        let reference = vec![ug(100)];
        let sel = UgSelection::resolve(&[999], &reference);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_unidade_of_first_selected_ug() {
        let mut gestao = ug(100);
        gestao.unidade = "Administracao Direta".to_string();
        let reference = vec![gestao, ug(200)];
        let sel = UgSelection::from_codes(&[100]);
        assert_eq!(sel.unidade(&reference), Some("Administracao Direta"));
    }

    #[test]
    fn test_unidade_unknown_ug_is_none() {
        let reference = vec![ug(100)];
        let sel = UgSelection::from_codes(&[999]);
        assert_eq!(sel.unidade(&reference), None);
    }

    #[test]
    fn test_unidade_empty_selection_is_none() {
        let reference = vec![ug(100)];
        let sel = UgSelection::from_codes(&[]);
        assert_eq!(sel.unidade(&reference), None);
    }

    #[test]
    fn test_date_window_inclusive_bounds() {
        let w = DateWindow::new(date(2024, 1, 1), date(2024, 12, 31));
        assert!(w.contains(date(2024, 1, 1)));
        assert!(w.contains(date(2024, 12, 31)));
        assert!(!w.contains(date(2023, 12, 31)));
        assert!(!w.contains(date(2025, 1, 1)));
    }

    #[test]
    fn test_date_window_collapse_widens_lower_bound() {
        let w = DateWindow::from_bounds(date(2024, 6, 15), date(2024, 6, 15));
        assert_eq!(w.start, date(2024, 6, 14));
        assert_eq!(w.end, date(2024, 6, 15));
    }

    #[test]
    fn test_date_window_widening_is_monotonic() {
        let dates = vec![date(2024, 1, 10), date(2024, 3, 5), date(2024, 7, 20)];
        let narrow = DateWindow::new(date(2024, 2, 1), date(2024, 4, 1));
        let wide = DateWindow::new(date(2024, 1, 1), date(2024, 8, 1));

        let kept_narrow = narrow.filter(dates.clone(), |&d| d);
        let kept_wide = wide.filter(dates, |&d| d);
        for d in &kept_narrow {
            assert!(kept_wide.contains(d), "widening removed {}", d);
        }
        assert_eq!(kept_narrow.len(), 1);
        assert_eq!(kept_wide.len(), 3);
    }

    #[test]
    fn test_year_month_range_single_year_widens() {
        let r = YearMonthRange::from_year_bounds(2024, 2024);
        assert_eq!(r.year_start, 2023);
        assert_eq!(r.year_end, 2024);
    }

    #[test]
    fn test_year_month_range_filter() {
        let r = YearMonthRange::new(2023, 2024, 3, 6);
        let rows = vec![(2023, 3u32), (2024, 6), (2024, 7), (2022, 4)];
        let kept = r.filter(rows, |&(y, m)| (y, m));
        assert_eq!(kept, vec![(2023, 3), (2024, 6)]);
    }

    #[test]
    fn test_keyword_matches_case_insensitive() {
        assert!(keyword_matches(["MANUTENCAO PREDIAL", "410512"], "predial"));
        assert!(!keyword_matches(["MANUTENCAO PREDIAL"], "combustivel"));
        assert!(keyword_matches(["anything"], "  "));
    }
}
