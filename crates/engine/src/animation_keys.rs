use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationKeyError {
    #[error("animation key must not be empty")]
    Empty,
    #[error("animation key must start with a lowercase letter, got '{character}'")]
    InvalidLeadingCharacter { character: char },
    #[error("animation key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

pub(crate) fn validate_animation_key(key: &str) -> Result<(), AnimationKeyError> {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return Err(AnimationKeyError::Empty);
    };
    if !first.is_ascii_lowercase() {
        return Err(AnimationKeyError::InvalidLeadingCharacter { character: first });
    }
    for ch in chars {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-') {
            continue;
        }
        return Err(AnimationKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_animation_key, AnimationKeyError};

    #[test]
    fn accepts_valid_keys() {
        for key in ["bat_walk", "player_attack", "skeleton-death2"] {
            assert!(validate_animation_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in ["", "Bat_walk", "_walk", "2walk", "bat walk", "bat/walk", "bat.walk"] {
            assert!(validate_animation_key(key).is_err(), "key={key}");
        }
    }

    #[test]
    fn reports_offending_character() {
        assert_eq!(
            validate_animation_key("bat.walk"),
            Err(AnimationKeyError::InvalidCharacter { character: '.' })
        );
    }
}
