//! Record identifiers and the closed set of cached fields.

use askql_rs_protocol::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Opaque identifier scoping one cached analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Name of a cached field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// The natural-language question.
    Question,
    /// SQL generated for the question.
    Sql,
    /// Result table of running the SQL.
    Df,
    /// Plotly figure JSON.
    FigJson,
    /// Suggested follow-up questions.
    FollowupQuestions,
}

impl FieldName {
    /// Every field, in the order a full analysis produces them.
    pub const ALL: [FieldName; 5] = [
        FieldName::Question,
        FieldName::Sql,
        FieldName::Df,
        FieldName::FigJson,
        FieldName::FollowupQuestions,
    ];

    /// Return the field name as used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Question => "question",
            FieldName::Sql => "sql",
            FieldName::Df => "df",
            FieldName::FigJson => "fig_json",
            FieldName::FollowupQuestions => "followup_questions",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| format!("unknown field: {value}"))
    }
}

/// A cached value, tagged with the field it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Question(String),
    Sql(String),
    Df(Arc<Table>),
    FigJson(String),
    FollowupQuestions(Vec<String>),
}

impl FieldValue {
    /// The field this value is stored under.
    pub fn name(&self) -> FieldName {
        match self {
            FieldValue::Question(_) => FieldName::Question,
            FieldValue::Sql(_) => FieldName::Sql,
            FieldValue::Df(_) => FieldName::Df,
            FieldValue::FigJson(_) => FieldName::FigJson,
            FieldValue::FollowupQuestions(_) => FieldName::FollowupQuestions,
        }
    }

    /// Text content for the scalar text fields.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Question(text) | FieldValue::Sql(text) | FieldValue::FigJson(text) => {
                Some(text)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldName, FieldValue, RecordId};
    use askql_rs_protocol::Table;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn field_names_round_trip_through_strings() {
        for field in FieldName::ALL {
            assert_eq!(field.as_str().parse::<FieldName>(), Ok(field));
        }
        assert!("dataframe".parse::<FieldName>().is_err());
    }

    #[test]
    fn values_know_their_field() {
        assert_eq!(FieldValue::Sql("SELECT 1".into()).name(), FieldName::Sql);
        assert_eq!(
            FieldValue::Df(Arc::new(Table::default())).name(),
            FieldName::Df
        );
        assert_eq!(FieldValue::FigJson("{}".into()).as_text(), Some("{}"));
        assert_eq!(FieldValue::FollowupQuestions(Vec::new()).as_text(), None);
    }

    #[test]
    fn record_id_displays_raw_text() {
        let id = RecordId::from("abc-123");
        assert_eq!(id.to_string(), "abc-123");
        assert_eq!(id.as_str(), "abc-123");
    }
}
