use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of a catalogued document.
///
/// Any status may be set at any time; there are no transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Published,
    Archived,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 3] = [
        DocumentStatus::Draft,
        DocumentStatus::Published,
        DocumentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Published => "published",
            DocumentStatus::Archived => "archived",
        }
    }

    /// Parse a status name, case-insensitive.
    pub fn from_str_ci(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// A catalogued documentation link stored in the `documents` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    /// Link to the external documentation. Empty when not supplied.
    #[serde(default)]
    pub url: String,
    /// Lowercased subcategory the document is filed under.
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: DocumentStatus,
    #[serde(
        rename = "createdAt",
        with = "bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        rename = "updatedAt",
        default,
        skip_serializing_if = "Option::is_none",
        with = "optional_bson_datetime"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The subset of document fields supplied by a partial update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<DocumentStatus>,
}

impl DocumentPatch {
    pub fn is_empty(&self) -> bool {
        self == &DocumentPatch::default()
    }

    /// Apply the supplied fields to an in-memory document.
    pub fn apply_to(&self, doc: &mut Document, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            doc.title = title.clone();
        }
        if let Some(description) = &self.description {
            doc.description = description.clone();
        }
        if let Some(url) = &self.url {
            doc.url = url.clone();
        }
        if let Some(category) = &self.category {
            doc.category = category.clone();
        }
        if let Some(tags) = &self.tags {
            doc.tags = tags.clone();
        }
        if let Some(status) = self.status {
            doc.status = status;
        }
        doc.updated_at = Some(now);
    }
}

/// Store-reported outcome of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// A category with its subcategories, stored in the `categories` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Lowercased category name.
    pub name: String,
    #[serde(default)]
    pub subcategories: Vec<String>,
}

/// A flat technology tag, stored in the `technologies` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub label: String,
}

mod optional_bson_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(bson::DateTime::from_chrono)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let value = Option::<bson::DateTime>::deserialize(deserializer)?;
        Ok(value.map(|dt| dt.to_chrono()))
    }
}
