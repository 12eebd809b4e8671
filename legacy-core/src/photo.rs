//! Photos that interviews are anchored to.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known photo themes. Anything else is treated as [`PhotoCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoCategory {
    Birthday,
    Childhood,
    Business,
    Wedding,
    Holiday,
    Family,
    Celebration,
    Milestone,
    Other,
}

impl PhotoCategory {
    pub const ALL: [PhotoCategory; 9] = [
        PhotoCategory::Birthday,
        PhotoCategory::Childhood,
        PhotoCategory::Business,
        PhotoCategory::Wedding,
        PhotoCategory::Holiday,
        PhotoCategory::Family,
        PhotoCategory::Celebration,
        PhotoCategory::Milestone,
        PhotoCategory::Other,
    ];

    /// Resolve a free-form category tag, falling back to `Other`.
    pub fn from_tag(tag: Option<&str>) -> PhotoCategory {
        let Some(tag) = tag else {
            return PhotoCategory::Other;
        };
        match tag.trim().to_lowercase().as_str() {
            "birthday" => PhotoCategory::Birthday,
            "childhood" => PhotoCategory::Childhood,
            "business" => PhotoCategory::Business,
            "wedding" => PhotoCategory::Wedding,
            "holiday" => PhotoCategory::Holiday,
            "family" => PhotoCategory::Family,
            "celebration" => PhotoCategory::Celebration,
            "milestone" => PhotoCategory::Milestone,
            _ => PhotoCategory::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhotoCategory::Birthday => "birthday",
            PhotoCategory::Childhood => "childhood",
            PhotoCategory::Business => "business",
            PhotoCategory::Wedding => "wedding",
            PhotoCategory::Holiday => "holiday",
            PhotoCategory::Family => "family",
            PhotoCategory::Celebration => "celebration",
            PhotoCategory::Milestone => "milestone",
            PhotoCategory::Other => "other",
        }
    }

    /// Story title templates for this category. Never empty.
    pub fn title_templates(&self) -> &'static [&'static str] {
        match self {
            PhotoCategory::Birthday => {
                &["A Special Birthday", "Birthday Celebration", "Birthday Memories"]
            }
            PhotoCategory::Childhood => &["Growing Up", "Childhood Days", "Early Years"],
            PhotoCategory::Business => {
                &["My Business Journey", "Professional Life", "Career Milestone"]
            }
            PhotoCategory::Wedding => {
                &["Our Wedding Day", "The Day We Married", "Wedding Memories"]
            }
            PhotoCategory::Holiday => {
                &["Holiday Celebration", "Family Holiday", "Special Holiday"]
            }
            PhotoCategory::Family => &["Family Moments", "Time with Family", "Family Memories"],
            PhotoCategory::Celebration => {
                &["A Celebration", "Special Occasion", "Memorable Celebration"]
            }
            PhotoCategory::Milestone => {
                &["A Milestone Moment", "Life Achievement", "Important Milestone"]
            }
            PhotoCategory::Other => &["A Precious Memory", "Looking Back", "Remembering"],
        }
    }
}

impl fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A photograph selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    /// Image reference (file path, asset name or URL).
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form category tag as supplied by the photo source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Capture date, ISO-8601 date or date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<String>,
}

impl Photo {
    pub fn new(id: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uri: uri.into(),
            description: None,
            category: None,
            date: None,
            people: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_people<I, S>(mut self, people: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.people = people.into_iter().map(Into::into).collect();
        self
    }

    /// The description, if present and not blank.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// The category tag, if present and not blank.
    pub fn category_tag(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn photo_category(&self) -> PhotoCategory {
        PhotoCategory::from_tag(self.category_tag())
    }

    /// Year the photo was taken, if the date can be read.
    pub fn year(&self) -> Option<i32> {
        let date = self.date.as_deref()?.trim();
        if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some(d.year());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
            return Some(dt.year());
        }
        // Bare years and partial dates like "1975" or "1975-06".
        let digits: String = date.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            digits.parse().ok()
        } else {
            None
        }
    }
}

lazy_static::lazy_static! {
    /// Sample photos bundled with the app.
    pub static ref SAMPLE_PHOTOS: Vec<Photo> = vec![
        Photo::new("sample-1", "samples/birthday_1962.jpg")
            .with_description("My seventh birthday party")
            .with_category("birthday")
            .with_date("1962-04-14")
            .with_people(["Mom", "Aunt Rose"]),
        Photo::new("sample-2", "samples/wedding_1975.jpg")
            .with_description("Our wedding at St. Mary's")
            .with_category("wedding")
            .with_date("1975-06-01")
            .with_people(["Harold", "Margaret"]),
        Photo::new("sample-3", "samples/shop_opening.jpg")
            .with_description("Opening day at the hardware store on Main Street, with the whole crew")
            .with_category("business")
            .with_date("1983-09-12"),
        Photo::new("sample-4", "samples/lake_summer.jpg")
            .with_description("Summer at the lake")
            .with_category("holiday")
            .with_date("1990-07-20")
            .with_people(["Danny", "Sue"]),
        Photo::new("sample-5", "samples/graduation.jpg")
            .with_category("milestone")
            .with_date("2001-05-26"),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_fallback() {
        assert_eq!(PhotoCategory::from_tag(Some("wedding")), PhotoCategory::Wedding);
        assert_eq!(PhotoCategory::from_tag(Some("Wedding ")), PhotoCategory::Wedding);
        assert_eq!(PhotoCategory::from_tag(Some("vacation")), PhotoCategory::Other);
        assert_eq!(PhotoCategory::from_tag(None), PhotoCategory::Other);
    }

    #[test]
    fn test_every_category_has_templates() {
        for category in PhotoCategory::ALL {
            let templates = category.title_templates();
            assert!((2..=3).contains(&templates.len()), "{category}");
        }
    }

    #[test]
    fn test_year_parsing() {
        let photo = Photo::new("p", "p.jpg");
        assert_eq!(photo.year(), None);
        assert_eq!(photo.clone().with_date("1975-06-01").year(), Some(1975));
        assert_eq!(
            photo.clone().with_date("1988-12-24T18:30:00Z").year(),
            Some(1988)
        );
        assert_eq!(photo.clone().with_date("1950").year(), Some(1950));
        assert_eq!(photo.with_date("sometime in the sixties").year(), None);
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let photo = Photo::new("p", "p.jpg")
            .with_description("")
            .with_category("");
        assert!(photo.description().is_none());
        assert!(photo.category_tag().is_none());
        assert_eq!(photo.photo_category(), PhotoCategory::Other);
    }

    #[test]
    fn test_photo_json_shape() {
        let photo: Photo = serde_json::from_str(
            r#"{"id": "u1", "uri": "file:///a.jpg", "category": "family"}"#,
        )
        .unwrap();
        assert!(photo.people.is_empty());
        assert_eq!(photo.photo_category(), PhotoCategory::Family);
    }
}
