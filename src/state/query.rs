/// Free-text time queries, as accepted by the search box and the CLI argument:
/// `42`, `latest`, `today`, `yesterday`, `2026-01-30`, `2026-01-30T05`, `2026-01-30 05`

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeQuery {
    /// Open a record by ordinal
    Number(u32),
    /// Open the newest record
    Latest,
    /// Filter to one day
    Date(NaiveDate),
    /// Filter to one day and open the record of that hour
    DateHour(NaiveDate, u32),
}

impl TimeQuery {
    /// Parse a query. `today` is the current UTC date.
    pub fn parse(query: &str, today: NaiveDate) -> Option<Self> {
        let query = query.trim();

        match query {
            "" => return None,
            "latest" => return Some(Self::Latest),
            "today" => return Some(Self::Date(today)),
            "yesterday" => return today.pred_opt().map(Self::Date),
            _ => {}
        }

        if query.chars().all(|c| c.is_ascii_digit()) {
            return query.parse().ok().map(Self::Number);
        }

        if query.len() == 10 {
            return parse_date(query).map(Self::Date);
        }

        // date + hour
        let (date, rest) = (query.get(..10)?, query.get(10..)?);
        let hour = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' '))?;
        if hour.is_empty() || hour.len() > 2 || !hour.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let hour: u32 = hour.parse().ok()?;
        if hour > 23 {
            return None;
        }
        Some(Self::DateHour(parse_date(date)?, hour))
    }

    /// Timestamp prefix selecting one hour, e.g. `2026-01-30 05:`
    pub fn hour_prefix(date: NaiveDate, hour: u32) -> String {
        format!("{} {:02}:", date.format("%Y-%m-%d"), hour)
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    // chrono accepts unpadded fields; the timestamp prefix match needs the padded form
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    (date.format("%Y-%m-%d").to_string() == s).then_some(date)
}
