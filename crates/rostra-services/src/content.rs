//! Content policy for arguments: minimum length plus a fixed denylist,
//! matched case-insensitively as substrings.

use rostra_core::{DomainError, Result};

pub const BANNED_WORDS: &[&str] = &["stupid", "idiot", "dumb", "mental", "psycho", "fuck"];

pub const MIN_CONTENT_CHARS: usize = 10;

pub fn validate_content(content: &str) -> Result<()> {
    if content.chars().count() < MIN_CONTENT_CHARS {
        return Err(DomainError::Validation(format!(
            "argument must be at least {MIN_CONTENT_CHARS} characters"
        )));
    }
    let lowered = content.to_lowercase();
    if BANNED_WORDS.iter().any(|word| lowered.contains(word)) {
        return Err(DomainError::Validation(
            "argument contains inappropriate words".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_content() {
        assert!(matches!(
            validate_content("too short"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn rejects_banned_words_case_insensitively() {
        assert!(matches!(
            validate_content("you are stupid and wrong"),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            validate_content("that is a STUPID take honestly"),
            Err(DomainError::Validation(_))
        ));
        // Substring match, per the original policy
        assert!(matches!(
            validate_content("this is dumbfounding to me"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn accepts_clean_content_of_ten_chars() {
        assert!(validate_content("1234567890").is_ok());
        assert!(validate_content("renewables beat coal on cost").is_ok());
    }
}
