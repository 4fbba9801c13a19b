use crate::dates::DateKey;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Colors offered when creating a habit. The first one is the default.
pub const PALETTE: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#06B6D4", "#84CC16",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        };
        f.write_str(label)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            other => Err(format!("frequency must be daily, weekly or custom (got '{other}')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Habit {
    /// Secondary line shown under the name: description, else category.
    pub fn subtitle(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.category.as_deref().filter(|text| !text.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub id: String,
    pub habit_id: String,
    pub completed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Statistics {
    pub total_completions: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[serde(default)]
    pub completions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: Frequency,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CreateHabitRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            frequency: Frequency::Daily,
            color: PALETTE[0].to_string(),
            category: None,
        }
    }

    /// Trims text fields, dropping optional ones that end up empty.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: non_empty(self.description),
            frequency: self.frequency,
            color: self.color.trim().to_string(),
            category: non_empty(self.category),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateHabitRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CompleteHabitRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateKey>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_decodes_without_optional_fields() {
        let raw = r##"{
            "id": "h1",
            "name": "Read",
            "frequency": "weekly",
            "color": "#3B82F6",
            "created_at": "2025-11-01T10:00:00Z",
            "updated_at": "2025-11-01T10:00:00Z"
        }"##;
        let habit: Habit = serde_json::from_str(raw).unwrap();
        assert_eq!(habit.frequency, Frequency::Weekly);
        assert_eq!(habit.description, None);
        assert_eq!(habit.subtitle(), None);
    }

    #[test]
    fn subtitle_prefers_description() {
        let mut habit: Habit = serde_json::from_value(serde_json::json!({
            "id": "h1",
            "name": "Run",
            "frequency": "daily",
            "color": "#10B981",
            "category": "Health",
            "created_at": "",
            "updated_at": ""
        }))
        .unwrap();
        assert_eq!(habit.subtitle(), Some("Health"));
        habit.description = Some("5km".into());
        assert_eq!(habit.subtitle(), Some("5km"));
    }

    #[test]
    fn statistics_tolerates_missing_completion_list() {
        let stats: Statistics = serde_json::from_str(
            r#"{"total_completions": 4, "current_streak": 1, "longest_streak": 3}"#,
        )
        .unwrap();
        assert_eq!(stats.total_completions, 4);
        assert!(stats.completions.is_empty());
    }

    #[test]
    fn create_request_normalizes_text() {
        let mut request = CreateHabitRequest::new("  Meditate ");
        request.description = Some("   ".into());
        request.category = Some(" Mind ".into());
        let request = request.normalized();
        assert_eq!(request.name, "Meditate");
        assert_eq!(request.description, None);
        assert_eq!(request.category.as_deref(), Some("Mind"));

        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("description").is_none());
        assert_eq!(body["frequency"], "daily");
        assert_eq!(body["color"], PALETTE[0]);
    }

    #[test]
    fn complete_request_without_date_is_empty_object() {
        let body = serde_json::to_string(&CompleteHabitRequest::default()).unwrap();
        assert_eq!(body, "{}");
        let dated = CompleteHabitRequest {
            date: DateKey::from_ymd(2025, 11, 17),
        };
        assert_eq!(serde_json::to_string(&dated).unwrap(), r#"{"date":"2025-11-17"}"#);
    }

    #[test]
    fn frequency_parses_case_insensitively() {
        assert_eq!("Weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert!("monthly".parse::<Frequency>().is_err());
        assert_eq!(Frequency::Custom.to_string(), "custom");
    }
}
