use thiserror::Error;

/// First rule a candidate password broke.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Password must be at least {min} characters long")]
    TooShort { min: usize },

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one number")]
    MissingDigit,
}

/// Password strength rules for new passwords.
///
/// Rules are checked in a fixed order (length, uppercase, lowercase, digit)
/// and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl PasswordPolicy {
    pub const MIN_LENGTH: usize = 6;

    pub fn check(&self, password: &str) -> Result<(), PolicyViolation> {
        if password.chars().count() < self.min_length {
            return Err(PolicyViolation::TooShort { min: self.min_length });
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PolicyViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PolicyViolation::MissingLowercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyViolation::MissingDigit);
        }
        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: Self::MIN_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(p: &str) -> Result<(), PolicyViolation> {
        PasswordPolicy::default().check(p)
    }

    #[test]
    fn accepts_minimal_valid_password() {
        assert_eq!(check("Abc123"), Ok(()));
        assert_eq!(check("xY9xxxxxxxxxxxx"), Ok(()));
    }

    #[test]
    fn each_rule_reports_its_own_violation() {
        assert_eq!(check("Ab1"), Err(PolicyViolation::TooShort { min: 6 }));
        assert_eq!(check("abc123"), Err(PolicyViolation::MissingUppercase));
        assert_eq!(check("ABC123"), Err(PolicyViolation::MissingLowercase));
        assert_eq!(check("Abcdef"), Err(PolicyViolation::MissingDigit));
    }

    #[test]
    fn first_failure_wins() {
        // Short AND missing everything: length is reported.
        assert_eq!(check(""), Err(PolicyViolation::TooShort { min: 6 }));
        // Long enough, but no uppercase/lowercase/digit: uppercase is next.
        assert_eq!(check("!!!!!!!!"), Err(PolicyViolation::MissingUppercase));
        // Has uppercase, missing lowercase and digit: lowercase is next.
        assert_eq!(check("ABCDEFG"), Err(PolicyViolation::MissingLowercase));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 5 characters, 10 bytes.
        assert_eq!(check("Aé1éé"), Err(PolicyViolation::TooShort { min: 6 }));
    }

    #[test]
    fn messages_match_user_facing_copy() {
        assert_eq!(
            PolicyViolation::TooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(
            PolicyViolation::MissingDigit.to_string(),
            "Password must contain at least one number"
        );
    }
}
