//! Listing entries and normalized job records.

use serde::{Deserialize, Deserializer, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One job summary as embedded in a listing page.
///
/// Every field is optional upstream; the accessors below document the
/// default each one falls back to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResultEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub truncated_company: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub job_location_city: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub job_location_state: Option<String>,

    #[serde(default, deserialize_with = "lenient::shape")]
    pub remote_work_model: Option<RemoteWorkModel>,

    #[serde(default, deserialize_with = "lenient::shape")]
    pub estimated_salary: Option<EstimatedSalary>,

    #[serde(default, deserialize_with = "lenient::shape")]
    pub job_card_requirements_model: Option<RequirementsModel>,

    /// Site-relative path of the detail page
    #[serde(default, deserialize_with = "lenient::text")]
    pub no_js_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteWorkModel {
    #[serde(default, deserialize_with = "lenient::text")]
    pub inline_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedSalary {
    #[serde(default, deserialize_with = "lenient::text")]
    pub formatted_range: Option<String>,
}

/// Requirement tags attached to a listing entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsModel {
    /// Free-form tag dictionaries; any field may carry the clearance marker
    #[serde(default, deserialize_with = "lenient::shape")]
    pub job_tag_requirements: Option<Vec<Value>>,

    #[serde(default, deserialize_with = "lenient::list")]
    pub job_only_requirements: Option<Vec<RequirementLabel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementLabel {
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: Option<String>,
}

/// Per-field decoders for listing data. A field whose JSON type is not the
/// expected one falls back to `None` instead of failing the whole entry.
mod lenient {
    use super::*;

    /// Text form of a scalar; `None` for null, objects and arrays.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn shape<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).ok())
    }

    /// Keeps the elements that decode; `None` when the value is not an array.
    pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            ),
            _ => None,
        })
    }
}

impl RawResultEntry {
    /// Job title, `""` when absent.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Company name, `""` when absent.
    pub fn company(&self) -> &str {
        self.truncated_company.as_deref().unwrap_or_default()
    }

    /// City, `""` when absent.
    pub fn city(&self) -> &str {
        self.job_location_city.as_deref().unwrap_or_default()
    }

    /// State, `""` when absent.
    pub fn state(&self) -> &str {
        self.job_location_state.as_deref().unwrap_or_default()
    }

    /// Remote-work descriptor, `""` when absent.
    pub fn remote_text(&self) -> &str {
        self.remote_work_model
            .as_ref()
            .and_then(|m| m.inline_text.as_deref())
            .unwrap_or_default()
    }

    /// Formatted salary range, `""` when absent.
    pub fn salary_range(&self) -> &str {
        self.estimated_salary
            .as_ref()
            .and_then(|s| s.formatted_range.as_deref())
            .unwrap_or_default()
    }

    /// Detail page path, `""` when absent.
    pub fn detail_path(&self) -> &str {
        self.no_js_url.as_deref().unwrap_or_default()
    }

    /// Tag dictionaries, empty when absent.
    pub fn tag_requirements(&self) -> &[Value] {
        self.job_card_requirements_model
            .as_ref()
            .and_then(|m| m.job_tag_requirements.as_deref())
            .unwrap_or_default()
    }

    /// Requirement labels joined with `,`; labels that are absent are skipped.
    pub fn requirement_labels(&self) -> String {
        self.job_card_requirements_model
            .as_ref()
            .and_then(|m| m.job_only_requirements.as_deref())
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.label.as_deref())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Whether any tag dictionary has a field whose value is exactly `value`.
    pub fn has_tag_value(&self, value: &str) -> bool {
        self.tag_requirements().iter().any(|tag| match tag {
            Value::Object(fields) => fields.values().any(|v| v.as_str() == Some(value)),
            other => other.as_str() == Some(value),
        })
    }
}

/// A normalized job posting, written out as one element of the results array.
///
/// The serialized key names are the interchange format read by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Company")]
    pub company: String,

    /// Plain text, markup stripped
    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Salary")]
    pub salary: String,

    #[serde(rename = "Remote")]
    pub remote: String,

    /// Requirement labels joined with `,`
    #[serde(rename = "Requirements")]
    pub requirements: String,

    #[serde(rename = "City")]
    pub city: String,

    #[serde(rename = "State")]
    pub state: String,

    /// Canonical detail page URL
    #[serde(rename = "Indeed Link")]
    pub link: String,
}

impl JobRecord {
    /// Format record for display using a template.
    ///
    /// Supported placeholders: `{name}`, `{company}`, `{salary}`, `{remote}`,
    /// `{city}`, `{state}`, `{link}`.
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{name}", &self.name)
            .replace("{company}", &self.company)
            .replace("{salary}", &self.salary)
            .replace("{remote}", &self.remote)
            .replace("{city}", &self.city)
            .replace("{state}", &self.state)
            .replace("{link}", &self.link)
    }
}
