// Display-side formatting shared by the engine and the presentation layer.
// The parsing counterparts (decimal/date parsing from the CSV sources) live
// in the engine's csv_parser module.

/// Brazilian (pt-BR) display conventions: "R$ 1.234,56" currency strings,
/// dd/mm/yyyy dates and CPF/CNPJ masking.
pub mod brazilian_format {
    use chrono::NaiveDate;

    /// Formats a value as pt-BR currency: dot thousands separator, comma
    /// decimal separator, always two decimals. `1234.5` -> `"R$ 1.234,50"`.
    pub fn format_currency(value: f64) -> String {
        let negative = value < 0.0;
        let fixed = format!("{:.2}", value.abs());
        let (int_part, dec_part) = match fixed.split_once('.') {
            Some((i, d)) => (i, d),
            None => (fixed.as_str(), "00"),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (idx, ch) in int_part.chars().enumerate() {
            if idx > 0 && (int_part.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if negative {
            format!("-R$ {},{}", grouped, dec_part)
        } else {
            format!("R$ {},{}", grouped, dec_part)
        }
    }

    /// Currency formatting for optional values; a missing value renders as
    /// "R$ 0,00", which is how the aditivos table shows blank cells.
    pub fn format_opt_currency(value: Option<f64>) -> String {
        format_currency(value.unwrap_or(0.0))
    }

    /// dd/mm/yyyy, the date convention used by every table and label.
    pub fn format_date(date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

    pub fn format_opt_date(date: Option<NaiveDate>) -> String {
        date.map(format_date).unwrap_or_default()
    }

    /// Masks a taxpayer identifier for display: 11 digits are masked as a
    /// CPF (`NNN.NNN.NNN-NN`), 14 digits as a CNPJ (`NN.NNN.NNN/NNNN-NN`).
    /// Anything else is returned unchanged rather than garbled.
    pub fn mask_document(raw: &str) -> String {
        let digits = raw.trim();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return digits.to_string();
        }
        match digits.len() {
            11 => format!(
                "{}.{}.{}-{}",
                &digits[..3],
                &digits[3..6],
                &digits[6..9],
                &digits[9..]
            ),
            14 => format!(
                "{}.{}.{}/{}-{}",
                &digits[..2],
                &digits[2..5],
                &digits[5..8],
                &digits[8..12],
                &digits[12..]
            ),
            _ => digits.to_string(),
        }
    }

}
