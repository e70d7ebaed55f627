use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::utilities::errors::AppError;

static IMAGE_EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(png|jpe?g)$").unwrap());

/// Trim surrounding whitespace and escape HTML entities so user-supplied
/// text is inert when echoed back to a browser.
pub fn sanitize(input: &str) -> String {
    let trimmed = input.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn word_count(input: &str) -> usize {
    input.split_whitespace().count()
}

pub fn validate_name(name: &str) -> Result<String, AppError> {
    let sanitized = sanitize(name);

    let length = sanitized.chars().count();
    if !(2..=50).contains(&length) {
        return Err(AppError::ValidationError(
            "Name must contain 2-50 characters.".to_string(),
        ));
    }

    Ok(sanitized)
}

pub fn validate_description(description: &str) -> Result<String, AppError> {
    let sanitized = sanitize(description);

    if sanitized.is_empty() {
        return Err(AppError::ValidationError(
            "Description may not be empty.".to_string(),
        ));
    }

    if word_count(&sanitized) > 250 {
        return Err(AppError::ValidationError(
            "Description may not exceed 250 words.".to_string(),
        ));
    }

    Ok(sanitized)
}

pub fn validate_email(email: &str) -> Result<String, AppError> {
    let normalized = email.trim().to_lowercase();

    if !validator::ValidateEmail::validate_email(&normalized) {
        return Err(AppError::ValidationError(
            "Invalid email provided.".to_string(),
        ));
    }

    Ok(normalized)
}

pub fn validate_photos(photos: &[String]) -> Result<(), AppError> {
    for photo in photos {
        if Url::parse(photo).is_err() {
            return Err(AppError::ValidationError(
                "Photos must be valid image URLs.".to_string(),
            ));
        }
        if !IMAGE_EXTENSION_RE.is_match(photo) {
            return Err(AppError::ValidationError(
                "Photos must be either PNGs or JP(E)Gs.".to_string(),
            ));
        }
    }
    Ok(())
}

pub fn validate_avatar(avatar: &str) -> Result<(), AppError> {
    if Url::parse(avatar).is_err() {
        return Err(AppError::ValidationError(
            "Avatar must be a valid image URL.".to_string(),
        ));
    }
    if !IMAGE_EXTENSION_RE.is_match(avatar) {
        return Err(AppError::ValidationError(
            "Avatar must be either a PNG or JP(E)G.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_bio(bio: &str) -> Result<String, AppError> {
    let sanitized = sanitize(bio);

    if sanitized.chars().count() > 320 {
        return Err(AppError::ValidationError(
            "Bio may not exceed 320 characters.".to_string(),
        ));
    }

    Ok(sanitized)
}

pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::ValidationError(
            "Rating must be on a scale between 1 and 5.".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_review_title(title: &str) -> Result<String, AppError> {
    let sanitized = sanitize(title);

    if sanitized.chars().count() > 50 {
        return Err(AppError::ValidationError(
            "Title may not exceed 50 characters.".to_string(),
        ));
    }

    Ok(sanitized)
}

pub fn validate_review_body(body: &str) -> Result<String, AppError> {
    let sanitized = sanitize(body);

    if word_count(&sanitized) > 250 {
        return Err(AppError::ValidationError(
            "Body may not exceed 250 words.".to_string(),
        ));
    }

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_and_escapes() {
        assert_eq!(sanitize("  plain name  "), "plain name");
        assert_eq!(
            sanitize("<script>alert('hi')</script>"),
            "&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn name_length_bounds() {
        assert!(validate_name("A").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
        assert_eq!(validate_name("Cozy Loft").unwrap(), "Cozy Loft");
        // Sanitization happens before the length check.
        assert!(validate_name("  B  ").is_err());
    }

    #[test]
    fn description_rules() {
        assert!(validate_description("   ").is_err());

        let long = ["word"; 251].join(" ");
        assert!(validate_description(&long).is_err());

        let ok = ["word"; 250].join(" ");
        assert!(validate_description(&ok).is_ok());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(
            validate_email(" Guest@Example.COM ").unwrap(),
            "guest@example.com"
        );
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn photos_must_be_png_or_jpg_urls() {
        assert!(validate_photos(&["https://i.imgur.com/N1WLg.jpeg".to_string()]).is_ok());
        assert!(validate_photos(&["https://i.imgur.com/photo.PNG".to_string()]).is_ok());

        let err = validate_photos(&["not_a_valid_url".to_string()]).unwrap_err();
        assert!(err.to_string().contains("valid image URLs"));

        let err = validate_photos(&["https://example.com/me.gif".to_string()]).unwrap_err();
        assert!(err.to_string().contains("PNGs or JP(E)Gs"));
    }

    #[test]
    fn avatar_must_be_png_or_jpg_url() {
        assert!(validate_avatar("https://i.imgur.com/me.jpg").is_ok());

        let err = validate_avatar("not_a_valid_url").unwrap_err();
        assert!(err.to_string().contains("valid image URL"));

        let err = validate_avatar("https://example.com/me.gif").unwrap_err();
        assert!(err.to_string().contains("PNG or JP(E)G"));
    }

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
        for r in 1..=5 {
            assert!(validate_rating(r).is_ok());
        }
    }

    #[test]
    fn review_title_and_body_limits() {
        assert!(validate_review_title(&"t".repeat(51)).is_err());
        assert_eq!(validate_review_title("").unwrap(), "");

        let long = ["word"; 251].join(" ");
        assert!(validate_review_body(&long).is_err());
        assert_eq!(validate_review_body("").unwrap(), "");
    }

    #[test]
    fn bio_limit() {
        assert!(validate_bio(&"b".repeat(321)).is_err());
        assert!(validate_bio(&"b".repeat(320)).is_ok());
    }
}
