use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

const NOT_MENTIONED: &str = "Not mentioned";

/// Structured analysis of an earnings call transcript, as returned by the model.
/// Every field must be present. Scalar and list shapes are coerced where the
/// model answers "Not mentioned" or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "lenient_string")]
    pub management_tone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub confidence_level: String,
    #[serde(deserialize_with = "string_or_list")]
    pub key_positives: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub key_concerns: Vec<String>,
    pub forward_guidance: ForwardGuidance,
    #[serde(deserialize_with = "lenient_string")]
    pub capacity_utilization: String,
    #[serde(deserialize_with = "string_or_list")]
    pub new_growth_initiatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardGuidance {
    #[serde(deserialize_with = "lenient_string")]
    pub revenue: String,
    #[serde(deserialize_with = "lenient_string")]
    pub margin: String,
    #[serde(deserialize_with = "lenient_string")]
    pub capex: String,
}

fn scalar_text<E: de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Null => Ok(None),
        other => Err(E::invalid_type(unexpected(&other), &"a string")),
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Array(_) => de::Unexpected::Seq,
        _ => de::Unexpected::Map,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = scalar_text::<D::Error>(Value::deserialize(deserializer)?)?;
    Ok(text.unwrap_or_else(|| NOT_MENTIONED.to_string()))
}

/// A bare string becomes a one-item list; blank strings and null become empty.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut list = Vec::with_capacity(items.len());
    for item in items {
        if let Some(text) = scalar_text::<D::Error>(item)? {
            if !text.trim().is_empty() {
                list.push(text);
            }
        }
    }
    Ok(list)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub services: ServiceStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub inference_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
