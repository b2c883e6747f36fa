use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Local, Months, NaiveDate, TimeZone, Utc};

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


#[cfg(test)]
pub use mock_datetime::now;

/// `YYYY-MM-DD`形式の日付を、Localタイムゾーンの00:00:00としてパースする。
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let naive_date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse date: {}", s))?;
    local_midnight(naive_date)
}

/// `YYYY-MM`形式の月を、Localタイムゾーンの月初としてパースする。
pub fn parse_month(s: &str) -> Result<DateTime<Utc>> {
    let target_date = format!("{}-01", s);
    let naive_date = NaiveDate::parse_from_str(&target_date, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse month: {}", s))?;
    local_midnight(naive_date)
}

/// 指定された日時を含むLocalタイムゾーンの1日の範囲をUTCで返す。
pub fn local_day_range(date: &DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date = date.with_timezone(&Local).date_naive();
    let end_date = start_date
        .succ_opt()
        .with_context(|| format!("Failed to get next day of {}", start_date))?;

    Ok((local_midnight(start_date)?, local_midnight(end_date)?))
}

/// 指定された日時を含むLocalタイムゾーンの1ヶ月の範囲をUTCで返す。
pub fn local_month_range(date: &DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date = date
        .with_timezone(&Local)
        .date_naive()
        .with_day(1)
        .context("Failed to set day")?;
    let end_date = start_date
        .checked_add_months(Months::new(1))
        .with_context(|| format!("Failed to get next month of {}", start_date))?;

    Ok((local_midnight(start_date)?, local_midnight(end_date)?))
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Utc>> {
    let naive_datetime = date
        .and_hms_opt(0, 0, 0)
        .context("Failed to set hour, minute, and second")?;
    let datetime = Local
        .from_local_datetime(&naive_datetime)
        .single()
        .context("Failed to convert to DateTime<Local>")?
        .to_utc();

    Ok(datetime)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
    use rstest::rstest;

    use super::{local_day_range, local_month_range, mock_datetime, parse_date, parse_month};

    fn local(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .unwrap()
            .to_utc()
    }

    /// 何も設定しない場合は、現在時間が取得できることを確認する。
    ///
    ///  - 現在時刻での比較を行なっているため、秒単位で比較している。
    #[test]
    fn test_now() {
        assert_eq!(
            mock_datetime::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    /// モック時間を設定した時に、その時間が取得できることを確認する。
    #[test]
    fn test_now_specific_datetime() {
        let datetime = String::from("2024-01-01T00:00:00+00:00");
        mock_datetime::set_mock_time(
            DateTime::parse_from_rfc3339(datetime.as_str())
                .unwrap()
                .to_utc(),
        );

        assert_eq!(mock_datetime::now().to_rfc3339(), datetime);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29").unwrap(), local(2024, 2, 29));
    }

    #[rstest]
    #[case::invalid_day("2023-02-29")]
    #[case::month_only("2024-02")]
    #[case::empty("")]
    fn test_parse_date_error(#[case] s: &str) {
        assert!(parse_date(s).is_err());
    }

    #[rstest]
    #[case("2024-02", local(2024, 2, 1))]
    #[case("2024-12", local(2024, 12, 1))]
    fn test_parse_month(#[case] s: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_month(s).unwrap(), expected);
    }

    #[test]
    fn test_parse_month_error() {
        assert!(parse_month("2024-13").is_err());
    }

    #[test]
    fn test_local_day_range() {
        let date = Local
            .with_ymd_and_hms(2024, 1, 1, 15, 30, 0)
            .unwrap()
            .to_utc();

        let (start_at, end_at) = local_day_range(&date).unwrap();

        assert_eq!(start_at, local(2024, 1, 1));
        assert_eq!(end_at, local(2024, 1, 2));
    }

    #[rstest]
    #[case::middle(local(2024, 2, 15), local(2024, 2, 1), local(2024, 3, 1))]
    #[case::december(local(2024, 12, 31), local(2024, 12, 1), local(2025, 1, 1))]
    fn test_local_month_range(
        #[case] date: DateTime<Utc>,
        #[case] start: DateTime<Utc>,
        #[case] end: DateTime<Utc>,
    ) {
        let (start_at, end_at) = local_month_range(&date).unwrap();

        assert_eq!(start_at, start);
        assert_eq!(end_at, end);
    }
}
