//! Builders for mock values used by tests of code that consumes this crate.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

pub fn create_mock_map() -> HashMap<String, Value> {
    HashMap::new()
}

pub fn create_mock_byte_array(data: &str) -> Vec<u8> {
    data.as_bytes().to_vec()
}

pub fn create_mock_uuid(data: &str) -> Result<Uuid, uuid::Error> {
    Uuid::parse_str(data)
}

/// An in-memory reader over `data`; dropping it releases nothing.
pub fn create_mock_reader(data: &str) -> impl Read {
    Cursor::new(data.as_bytes().to_vec())
}

/// Today in UTC. Formats as `YYYY-MM-DD`.
pub fn create_mock_date() -> NaiveDate {
    Utc::now().date_naive()
}

/// Now in UTC. Serializes as RFC 3339.
pub fn create_mock_date_time() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_map_is_empty() {
        assert!(create_mock_map().is_empty());
    }

    #[test]
    fn mock_byte_array_copies_bytes() {
        assert_eq!(create_mock_byte_array("This is a test"), b"This is a test".to_vec());
    }

    #[test]
    fn mock_uuid_parses() {
        let uuid = create_mock_uuid("9fab83da-98cb-4f18-a7ba-b6f0435c9673").unwrap();
        assert_eq!(uuid.to_string(), "9fab83da-98cb-4f18-a7ba-b6f0435c9673");
        assert!(create_mock_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn mock_reader_yields_contents() {
        let mut contents = String::new();
        create_mock_reader("This is a test").read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "This is a test");
    }

    #[test]
    fn mock_date_formats() {
        let date = create_mock_date().format("%Y-%m-%d").to_string();
        assert_eq!(date.len(), 10);
        let json = serde_json::to_string(&create_mock_date_time()).unwrap();
        assert!(json.ends_with("Z\""), "{json}");
    }
}
