use crate::error::{Result, TaskgenError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Minimum goal length (in characters, after trimming).
pub const MIN_GOAL_LEN: usize = 10;

pub const DEFAULT_TEMPLATE: &str = "General";

// ---------------------------------------------------------------------------
// FeatureRequest
// ---------------------------------------------------------------------------

/// The caller's description of the feature to break down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRequest {
    pub goal: String,
    pub users: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl FeatureRequest {
    /// Build a validated request. All fields are trimmed; blank constraints
    /// become `None` and a blank template falls back to "General".
    pub fn new(
        goal: impl AsRef<str>,
        users: impl AsRef<str>,
        constraints: Option<&str>,
        template: Option<&str>,
    ) -> Result<Self> {
        let request = Self {
            goal: goal.as_ref().trim().to_string(),
            users: users.as_ref().trim().to_string(),
            constraints: constraints
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            template: template
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TEMPLATE)
                .to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.goal.trim().chars().count() < MIN_GOAL_LEN {
            return Err(TaskgenError::Validation(format!(
                "Goal must be at least {MIN_GOAL_LEN} characters"
            )));
        }
        if self.users.trim().is_empty() {
            return Err(TaskgenError::Validation("Users are required".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GeneratedBreakdown
// ---------------------------------------------------------------------------

/// Structured output recovered from the model's response.
///
/// Item fields are deliberately loose: anything the model omits falls back
/// to an empty value instead of failing the whole breakdown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedBreakdown {
    pub user_stories: Vec<UserStory>,
    pub engineering_tasks: Vec<EngineeringTask>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risks: Vec<Risk>,
}

impl GeneratedBreakdown {
    pub fn total_hours(&self) -> f64 {
        self.engineering_tasks.iter().map(|t| t.estimated_hours).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStory {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub acceptance_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineeringTask {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub category: TaskCategory,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub estimated_hours: f64,
    #[serde(default, deserialize_with = "lenient_list")]
    pub acceptance_criteria: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mitigation: String,
}

// ---------------------------------------------------------------------------
// TaskCategory
// ---------------------------------------------------------------------------

/// Task category. The model is asked for one of the four known values but
/// anything else is kept verbatim in `Other`. A missing category is
/// `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskCategory {
    Frontend,
    Backend,
    Testing,
    DevOps,
    Other(String),
}

impl Default for TaskCategory {
    fn default() -> Self {
        TaskCategory::Other(String::new())
    }
}

impl TaskCategory {
    pub fn known() -> &'static [TaskCategory] {
        &[
            TaskCategory::Frontend,
            TaskCategory::Backend,
            TaskCategory::Testing,
            TaskCategory::DevOps,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskCategory::Frontend => "Frontend",
            TaskCategory::Backend => "Backend",
            TaskCategory::Testing => "Testing",
            TaskCategory::DevOps => "DevOps",
            TaskCategory::Other(s) => s,
        }
    }
}

impl From<String> for TaskCategory {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "frontend" => TaskCategory::Frontend,
            "backend" => TaskCategory::Backend,
            "testing" => TaskCategory::Testing,
            "devops" => TaskCategory::DevOps,
            _ => TaskCategory::Other(s),
        }
    }
}

impl From<TaskCategory> for String {
    fn from(c: TaskCategory) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Risk severity. Same open vocabulary as [`TaskCategory`]; a missing
/// severity is `Other("")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Other(String),
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Other(String::new())
    }
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            _ => Severity::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StoredSpec
// ---------------------------------------------------------------------------

/// A persisted generation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSpec {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub feature: FeatureRequest,
    pub generated: GeneratedBreakdown,
}

// ---------------------------------------------------------------------------
// Lenient field decoders
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Any JSON scalar read as text. Numbers and booleans keep their JSON
/// spelling; null becomes "".
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Text(t) => t,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn lenient_text<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(d)?
        .map(String::from)
        .unwrap_or_default())
}

/// Open-vocabulary labels: read as text, then classified.
fn lenient_label<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    lenient_text(d).map(T::from)
}

/// A list of scalars; null items are dropped and a null list is empty.
fn lenient_list<'de, D>(d: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<Scalar>>>::deserialize(d)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(String::from)
        .collect())
}

/// Accepts `4`, `4.5`, `"4"` or `"4h"`; anything unreadable becomes 0.
fn lenient_hours<'de, D>(d: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Hours {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Hours>::deserialize(d)? {
        Some(Hours::Number(n)) => n,
        Some(Hours::Text(s)) => s
            .trim()
            .trim_end_matches(['h', 'H'])
            .trim()
            .parse()
            .unwrap_or(0.0),
        None => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_request_trims_and_defaults() {
        let req = FeatureRequest::new(
            "  Build a login page for admins  ",
            " admins ",
            Some("   "),
            None,
        )
        .unwrap();
        assert_eq!(req.goal, "Build a login page for admins");
        assert_eq!(req.users, "admins");
        assert_eq!(req.constraints, None);
        assert_eq!(req.template, "General");
    }

    #[test]
    fn feature_request_rejects_short_goal() {
        let err = FeatureRequest::new("too short", "admins", None, None).unwrap_err();
        assert!(matches!(err, TaskgenError::Validation(_)));
        assert!(err.to_string().contains("at least 10"));
    }

    #[test]
    fn feature_request_rejects_blank_users() {
        let err = FeatureRequest::new("Build a login page", "   ", None, None).unwrap_err();
        assert_eq!(err.to_string(), "Users are required");
    }

    #[test]
    fn goal_length_counts_characters_not_bytes() {
        // 10 two-byte characters
        assert!(FeatureRequest::new("éééééééééé", "users", None, None).is_ok());
        assert!(FeatureRequest::new("ééééééééé", "users", None, None).is_err());
    }

    #[test]
    fn category_keeps_unknown_values_verbatim() {
        let t: EngineeringTask =
            serde_json::from_str(r#"{"id":"TASK-1","category":"Design"}"#).unwrap();
        assert_eq!(t.category, TaskCategory::Other("Design".into()));
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["category"], "Design");
    }

    #[test]
    fn category_matches_case_insensitively() {
        let t: EngineeringTask = serde_json::from_str(r#"{"category":"devops"}"#).unwrap();
        assert_eq!(t.category, TaskCategory::DevOps);
    }

    #[test]
    fn missing_labels_stay_blank() {
        let t: EngineeringTask = serde_json::from_str(r#"{"id":"TASK-1"}"#).unwrap();
        assert_eq!(t.category, TaskCategory::Other(String::new()));
        let r: Risk = serde_json::from_str(r#"{"id":"RISK-1","severity":null}"#).unwrap();
        assert_eq!(r.severity, Severity::Other(String::new()));
        assert_eq!(TaskCategory::default().as_str(), "");
    }

    #[test]
    fn scalar_fields_tolerate_null_and_numbers() {
        let s: UserStory = serde_json::from_str(
            r#"{"id":7,"title":null,"description":true,"acceptanceCriteria":["a",2,null]}"#,
        )
        .unwrap();
        assert_eq!(s.id, "7");
        assert_eq!(s.title, "");
        assert_eq!(s.description, "true");
        assert_eq!(s.acceptance_criteria, vec!["a", "2"]);
    }

    #[test]
    fn estimated_hours_accepts_numeric_strings() {
        let t: EngineeringTask = serde_json::from_str(r#"{"estimatedHours":"6h"}"#).unwrap();
        assert_eq!(t.estimated_hours, 6.0);
        let t: EngineeringTask = serde_json::from_str(r#"{"estimatedHours":3}"#).unwrap();
        assert_eq!(t.estimated_hours, 3.0);
    }

    #[test]
    fn missing_acceptance_criteria_defaults_to_empty() {
        let s: UserStory = serde_json::from_str(r#"{"id":"US-1","title":"Login"}"#).unwrap();
        assert!(s.acceptance_criteria.is_empty());
        let s: UserStory = serde_json::from_str(r#"{"acceptanceCriteria":null}"#).unwrap();
        assert!(s.acceptance_criteria.is_empty());
    }

    #[test]
    fn stored_spec_uses_camel_case_wire_names() {
        let spec = StoredSpec {
            id: "spec_1".into(),
            timestamp: Utc::now(),
            feature: FeatureRequest::new("Build a login page", "admins", None, None).unwrap(),
            generated: GeneratedBreakdown::default(),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert!(json["generated"]["userStories"].is_array());
        assert!(json["generated"]["engineeringTasks"].is_array());
        assert!(json["feature"].get("constraints").is_none());
    }

    #[test]
    fn total_hours_sums_tasks() {
        let b = GeneratedBreakdown {
            engineering_tasks: vec![
                EngineeringTask {
                    estimated_hours: 4.0,
                    ..Default::default()
                },
                EngineeringTask {
                    estimated_hours: 2.5,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(b.total_hours(), 6.5);
    }
}
