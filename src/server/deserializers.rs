use serde::{Deserialize, Deserializer};

pub fn first_page() -> i64 {
    1
}

// query strings carry "page" as text; a value that is not an integer falls back
// to the first page instead of rejecting the request
pub fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or_else(first_page))
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct Query {
        #[serde(default = "first_page", deserialize_with = "deserialize_page")]
        page: i64,
    }

    fn page(qs: &str) -> i64 {
        let query: Query = serde_json::from_str(qs).unwrap();
        query.page
    }

    #[test]
    fn page_parses_or_defaults() {
        assert_eq!(page(r#"{"page": "3"}"#), 3);
        assert_eq!(page(r#"{"page": "-2"}"#), -2);
        assert_eq!(page(r#"{"page": "abc"}"#), 1);
        assert_eq!(page(r#"{"page": ""}"#), 1);
        assert_eq!(page(r#"{}"#), 1);
    }
}
