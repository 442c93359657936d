use chrono::NaiveDate;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}' (expected YYYY-MM-DD): {error}"))
}

pub fn parse_optional_date(raw: Option<&str>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    raw.map(|value| parse_date(value, field)).transpose()
}

#[cfg(test)]
mod tests {
    use gis_core::enums::{BudgetRequestStatus, ProjectStatus, UseClass};

    use super::{parse_date, parse_enum};

    #[test]
    fn parses_snake_case_enum() {
        let status: ProjectStatus = parse_enum("completed", "status").expect("status should parse");
        assert_eq!(status, ProjectStatus::Completed);
    }

    #[test]
    fn parses_hyphenated_and_uppercase_alias() {
        let status: ProjectStatus =
            parse_enum("In-Progress", "status").expect("status should parse");
        assert_eq!(status, ProjectStatus::InProgress);

        let class: UseClass = parse_enum("PRIMARY", "use class").expect("use class should parse");
        assert_eq!(class, UseClass::Primary);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<BudgetRequestStatus>("done", "status").expect_err("should fail");
        assert!(err.to_string().contains("invalid status 'done'"));
    }

    #[test]
    fn dates_use_iso_format() {
        let date = parse_date("2025-03-01", "start").expect("date should parse");
        assert_eq!(date.to_string(), "2025-03-01");
        assert!(parse_date("03/01/2025", "start").is_err());
    }
}
