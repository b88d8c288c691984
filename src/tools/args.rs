use serde::{Deserialize, Deserializer, de};

// Models occasionally quote numbers ("10"); both forms are accepted.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{s}'")))?,
    };
    u32::try_from(value).map_err(|_| de::Error::custom(format!("{value} is out of range")))
}

#[derive(Debug, Deserialize)]
pub(super) struct TopTracksArgs {
    #[serde(deserialize_with = "lenient_u32")]
    pub limit: u32,
    pub time_range: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatePlaylistArgs {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AddTracksArgs {
    pub playlist_id: String,
    #[serde(default)]
    pub track_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RecommendationArgs {
    #[serde(deserialize_with = "lenient_u32")]
    pub size: u32,
    #[serde(default)]
    pub seeds: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quoted_numbers_are_accepted() {
        let args: TopTracksArgs =
            serde_json::from_value(json!({"limit": "15", "time_range": "short_term"})).unwrap();
        assert_eq!(args.limit, 15);

        let args: RecommendationArgs =
            serde_json::from_value(json!({"size": 20, "seeds": ["a"]})).unwrap();
        assert_eq!(args.size, 20);
    }

    #[test]
    fn negative_or_garbage_numbers_are_rejected() {
        assert!(
            serde_json::from_value::<TopTracksArgs>(json!({"limit": -1, "time_range": "x"}))
                .is_err()
        );
        assert!(
            serde_json::from_value::<TopTracksArgs>(json!({"limit": "ten", "time_range": "x"}))
                .is_err()
        );
    }

    #[test]
    fn playlist_description_is_optional() {
        let args: CreatePlaylistArgs = serde_json::from_value(json!({"name": "Road trip"})).unwrap();
        assert_eq!(args.description, "");
    }
}
