use serde::{Deserialize, Serialize};

/// A publisher known to the news provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// Provider-assigned identifier (e.g. "bbc-news")
    pub id: String,
    /// Display name
    pub name: String,
    /// Topic the source mostly covers, when classified
    pub category: Option<String>,
    /// Homepage URL
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serde_round_trip() {
        let source = Source {
            id: "bbc-news".to_string(),
            name: "BBC News".to_string(),
            category: Some("general".to_string()),
            url: Some("https://www.bbc.co.uk/news".to_string()),
        };

        let json = serde_json::to_string(&source).unwrap();
        let deserialized: Source = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, source);
    }
}
