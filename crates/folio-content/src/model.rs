#![forbid(unsafe_code)]

//! Serde models for the section documents.

use serde::Deserialize;

/// `work.json`: employment positions and education entries.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WorkContent {
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default)]
    pub education: Vec<Education>,
}

/// One employment position.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Position {
    pub id: String,
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Marks the ongoing position; gets the pulsing timeline marker.
    #[serde(default)]
    pub current: bool,
}

/// One education entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub dates: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `writing.json`: items rendered as network nodes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WritingContent {
    #[serde(default)]
    pub items: Vec<WritingItem>,
}

/// One writing item.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WritingItem {
    pub id: String,
    pub title: String,
    /// Item kind ("essay", "talk", ...), free-form.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `fun.json`: images rendered as collage nodes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FunContent {
    #[serde(default)]
    pub images: Vec<CollageImage>,
}

/// One collage image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CollageImage {
    pub id: String,
    #[serde(default)]
    pub src: String,
    pub alt: String,
    #[serde(default)]
    pub span: Span,
    #[serde(default)]
    pub url: Option<String>,
}

/// Collage item sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Span {
    Small,
    #[default]
    Medium,
    Large,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_document_parses() {
        let json = r#"{
            "positions": [
                {"id": "p1", "company": "Acme", "title": "Engineer",
                 "dates": "2020 - 2022", "url": "https://acme.example", "current": false},
                {"id": "p2", "company": "Beta", "title": "Staff Engineer", "current": true}
            ],
            "education": [
                {"id": "e1", "institution": "State", "degree": "BSc", "field": "CS"}
            ]
        }"#;
        let work: WorkContent = serde_json::from_str(json).unwrap();
        assert_eq!(work.positions.len(), 2);
        assert!(work.positions[1].current);
        assert_eq!(work.positions[1].dates, "");
        assert_eq!(work.education[0].field, "CS");
    }

    #[test]
    fn writing_type_field_maps_to_kind() {
        let json = r#"{"items": [{"id": "w1", "title": "On Things", "type": "essay",
                       "date": "2023-04-01", "url": "https://example.org/things"}]}"#;
        let writing: WritingContent = serde_json::from_str(json).unwrap();
        assert_eq!(writing.items[0].kind, "essay");
    }

    #[test]
    fn fun_span_variants_parse_lowercase() {
        let json = r#"{"images": [
            {"id": "i1", "alt": "one", "span": "large"},
            {"id": "i2", "alt": "two", "span": "small"},
            {"id": "i3", "alt": "three"}
        ]}"#;
        let fun: FunContent = serde_json::from_str(json).unwrap();
        assert_eq!(fun.images[0].span, Span::Large);
        assert_eq!(fun.images[1].span, Span::Small);
        assert_eq!(fun.images[2].span, Span::Medium);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let json = r#"{"items": [], "generated_by": "site-tool", "version": 3}"#;
        let writing: WritingContent = serde_json::from_str(json).unwrap();
        assert!(writing.items.is_empty());
    }

    #[test]
    fn empty_defaults_are_empty() {
        assert!(WorkContent::default().positions.is_empty());
        assert!(WritingContent::default().items.is_empty());
        assert!(FunContent::default().images.is_empty());
    }
}
