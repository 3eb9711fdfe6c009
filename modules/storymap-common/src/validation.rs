use crate::error::ValidationError;
use crate::types::{StoryDraft, DEFAULT_AUTHOR};

/// Reject coordinates that are not finite or fall outside the globe.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ValidationError> {
    if !latitude.is_finite() {
        return Err(ValidationError::NonFinite { field: "latitude" });
    }
    if !longitude.is_finite() {
        return Err(ValidationError::NonFinite { field: "longitude" });
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ValidationError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ValidationError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

/// Parse a coordinate as typed into a form field.
pub fn parse_coordinate(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw.trim().parse().map_err(|_| ValidationError::NotANumber {
        field,
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { field });
    }
    Ok(value)
}

/// Split on commas, trim, drop empties. Order is preserved.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

/// A draft that passed every check. Single-line fields are trimmed; the
/// story text is kept exactly as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    pub title: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub content: String,
    pub tags: Vec<String>,
    pub author: String,
    pub email: Option<String>,
}

/// Run every check a new story must pass. Coordinates first, then required text.
pub fn validate_draft(draft: &StoryDraft) -> Result<ValidDraft, ValidationError> {
    validate_coordinates(draft.latitude, draft.longitude)?;

    let title = required("title", &draft.title)?;
    let location = required("location", &draft.location)?;
    if draft.content.trim().is_empty() {
        return Err(ValidationError::MissingField("content"));
    }

    let author = match draft.author.trim() {
        "" => DEFAULT_AUTHOR.to_string(),
        name => name.to_string(),
    };
    let email = draft
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(String::from);

    Ok(ValidDraft {
        title,
        location,
        latitude: draft.latitude,
        longitude: draft.longitude,
        content: draft.content.clone(),
        tags: parse_tags(&draft.tags),
        author,
        email,
    })
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> StoryDraft {
        StoryDraft {
            title: "Harbor lights".into(),
            location: "Duluth".into(),
            latitude: 46.7867,
            longitude: -92.1005,
            content: "The lift bridge went up at dusk.".into(),
            tags: "lake, night".into(),
            author: "".into(),
            email: Some("  ".into()),
        }
    }

    #[test]
    fn coordinates_on_the_boundary_are_accepted() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
    }

    #[test]
    fn latitude_out_of_range_is_rejected() {
        assert_eq!(
            validate_coordinates(95.0, 0.0),
            Err(ValidationError::LatitudeOutOfRange(95.0))
        );
    }

    #[test]
    fn longitude_out_of_range_is_rejected() {
        assert_eq!(
            validate_coordinates(0.0, -180.5),
            Err(ValidationError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
        assert!(validate_coordinates(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn parse_coordinate() {
        assert_eq!(super::parse_coordinate("latitude", " 44.95 "), Ok(44.95));
        assert!(matches!(
            super::parse_coordinate("latitude", "north"),
            Err(ValidationError::NotANumber { .. })
        ));
        assert_eq!(
            super::parse_coordinate("longitude", "NaN"),
            Err(ValidationError::NonFinite { field: "longitude" })
        );
    }

    #[test]
    fn parse_tags_trims_and_drops_empties() {
        assert_eq!(parse_tags(" a, b ,,c , "), vec!["a", "b", "c"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn validate_draft_applies_defaults() {
        let valid = validate_draft(&draft()).unwrap();
        assert_eq!(valid.author, "Anonymous");
        assert_eq!(valid.email, None);
        assert_eq!(valid.tags, vec!["lake", "night"]);
    }

    #[test]
    fn validate_draft_keeps_content_verbatim() {
        let mut d = draft();
        d.title = "  Harbor lights ".into();
        d.content = "\n  indented\n".into();
        let valid = validate_draft(&d).unwrap();
        assert_eq!(valid.title, "Harbor lights");
        assert_eq!(valid.content, "\n  indented\n");
    }

    #[test]
    fn validate_draft_requires_text() {
        let mut d = draft();
        d.location = "   ".into();
        assert_eq!(validate_draft(&d), Err(ValidationError::MissingField("location")));
    }

    #[test]
    fn validate_draft_checks_coordinates_first() {
        let mut d = draft();
        d.latitude = 95.0;
        d.title = String::new();
        assert_eq!(validate_draft(&d), Err(ValidationError::LatitudeOutOfRange(95.0)));
    }
}
