use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

// The catalog rows arrive with inconsistent scalar types depending on which
// export produced them: ProductID as number or string, Price as float or
// string. Normalization happens once, here, so the ranking code only ever
// sees one canonical shape.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => Ok(s),
        StringOrNumber::Int(i) => Ok(i.to_string()),
        StringOrNumber::Float(f) => Ok(f.to_string()),
    }
}

fn deserialize_optional_price<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFloat {
        String(String),
        Float(f32),
        Null,
    }

    match StringOrFloat::deserialize(deserializer)? {
        StringOrFloat::String(s) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                f32::from_str(s.trim())
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
        StringOrFloat::Float(f) => Ok(Some(f)),
        StringOrFloat::Null => Ok(None),
    }
}

/// Canonical product record. Field names follow the Supabase `fashionhub`
/// columns on the wire; ids are always compared as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ProductID", deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "ProductName", default)]
    pub name: Option<String>,
    #[serde(rename = "ProductBrand", default)]
    pub brand: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "PrimaryColor", default)]
    pub color: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(
        rename = "Price",
        default,
        deserialize_with = "deserialize_optional_price"
    )]
    pub price: Option<f32>,
    #[serde(rename = "ImageURL", default)]
    pub image_url: Option<String>,
    /// Per-row embedding column, present when the catalog itself is the
    /// embedding source. Never serialized back out in responses.
    #[serde(
        rename = "embeddings",
        alias = "embedding",
        default,
        skip_serializing
    )]
    pub embedding: Option<Vec<f32>>,
}

impl Product {
    /// Concatenated lowercased text fields, the haystack for keyword
    /// fallback scoring.
    pub fn search_text(&self) -> String {
        [
            self.name.as_deref(),
            self.description.as_deref(),
            self.brand.as_deref(),
            self.gender.as_deref(),
            self.color.as_deref(),
        ]
        .iter()
        .flatten()
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}
