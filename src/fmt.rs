use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Parse a stored `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
}

/// Display form of a stored date: `2004-04-04` becomes `4 Avr. 04`.
pub fn format_date(raw: &str) -> Result<String, chrono::ParseError> {
    let date = parse_date(raw)?;
    let month = MONTHS[date.month0() as usize];
    let year = format!("{:04}", date.year());
    Ok(format!("{} {}. {}", date.day(), month, &year[2..]))
}

/// Display label for a status. Total: unknown values pass through unchanged.
pub fn format_status(raw: &str) -> String {
    match raw {
        "pending" => "En attente".to_string(),
        "accepted" => "Accepté".to_string(),
        "refused" => "Refused".to_string(),
        other => other.to_string(),
    }
}

/// Format an amount in euros with a space thousands separator: 1 234,56 €
pub fn euros(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-{grouped},{dec_part} €")
    } else {
        format!("{grouped},{dec_part} €")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2004-04-04").unwrap(), "4 Avr. 04");
        assert_eq!(format_date("2023-12-25").unwrap(), "25 Déc. 23");
        assert_eq!(format_date("2001-01-01").unwrap(), "1 Jan. 01");
    }

    #[test]
    fn test_format_date_rejects_garbage() {
        assert!(format_date("not a date").is_err());
        assert!(format_date("").is_err());
        assert!(format_date("2023-13-01").is_err());
    }

    #[test]
    fn test_format_status_is_total() {
        assert_eq!(format_status("pending"), "En attente");
        assert_eq!(format_status("accepted"), "Accepté");
        assert_eq!(format_status("refused"), "Refused");
        assert_eq!(format_status("archived"), "archived");
        assert_eq!(format_status(""), "");
    }

    #[test]
    fn test_euros_formatting() {
        assert_eq!(euros(1234.56), "1 234,56 €");
        assert_eq!(euros(-500.0), "-500,00 €");
        assert_eq!(euros(0.0), "0,00 €");
        assert_eq!(euros(1000000.99), "1 000 000,99 €");
    }
}
