//! Team and player profile validation

use thiserror::Error;

use crate::domain::error::{DomainError, ErrorCode};

/// Errors that can occur during profile validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team name cannot be empty")]
    EmptyTeamName,

    #[error("Country cannot be empty")]
    EmptyCountry,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Name cannot exceed {0} characters")]
    NameTooLong(usize),
}

impl TeamValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyTeamName => ErrorCode::TeamNameRequired,
            Self::EmptyCountry => ErrorCode::CountryRequired,
            Self::EmptyName => ErrorCode::NameRequired,
            Self::NameTooLong(_) => ErrorCode::NameTooLong,
        }
    }
}

impl From<TeamValidationError> for DomainError {
    fn from(err: TeamValidationError) -> Self {
        DomainError::validation(err.code())
    }
}

const MAX_NAME_LENGTH: usize = 100;

/// Validate a team name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyTeamName);
    }

    check_length(name)
}

/// Validate a country
pub fn validate_country(country: &str) -> Result<(), TeamValidationError> {
    if country.trim().is_empty() {
        return Err(TeamValidationError::EmptyCountry);
    }

    check_length(country)
}

/// Validate a player's first or last name
pub fn validate_person_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    check_length(name)
}

fn check_length(value: &str) -> Result<(), TeamValidationError> {
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_NAME_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_team_name() {
        assert!(validate_team_name("FC Test").is_ok());
        assert!(validate_team_name(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn test_blank_values() {
        assert_eq!(
            validate_team_name("  "),
            Err(TeamValidationError::EmptyTeamName)
        );
        assert_eq!(validate_country(""), Err(TeamValidationError::EmptyCountry));
        assert_eq!(validate_person_name("\t"), Err(TeamValidationError::EmptyName));
    }

    #[test]
    fn test_name_too_long() {
        assert_eq!(
            validate_person_name(&"a".repeat(101)),
            Err(TeamValidationError::NameTooLong(100))
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(
            TeamValidationError::EmptyCountry.code(),
            ErrorCode::CountryRequired
        );
        assert_eq!(
            TeamValidationError::EmptyTeamName.code(),
            ErrorCode::TeamNameRequired
        );
    }
}
