use serde::{Deserialize, Serialize};

/// The publishing platforms an article listing can be fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Note,
    Zenn,
    Qiita,
}

impl SourceType {
    pub const ALL: [SourceType; 3] = [SourceType::Note, SourceType::Zenn, SourceType::Qiita];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Note => "note",
            SourceType::Zenn => "zenn",
            SourceType::Qiita => "qiita",
        }
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "note" => Ok(SourceType::Note),
            "zenn" => Ok(SourceType::Zenn),
            "qiita" => Ok(SourceType::Qiita),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Zenn".parse::<SourceType>().unwrap(), SourceType::Zenn);
        assert_eq!(" QIITA ".parse::<SourceType>().unwrap(), SourceType::Qiita);
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = "medium".parse::<SourceType>().unwrap_err();
        assert!(err.contains("medium"));
    }

    #[test]
    fn test_keys_round_trip_through_display() {
        for source in SourceType::ALL {
            assert_eq!(source.to_string().parse::<SourceType>().unwrap(), source);
        }
    }
}
