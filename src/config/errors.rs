use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum ApplicationError {
    InvalidSetting { setting_name: String, reason: String },
    ParseError { setting_name: String, error: String },
    MissingSetting { setting_name: String },
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { setting_name, reason } => {
                write!(f, "Invalid setting '{}': {}", setting_name, reason)
            }
            Self::ParseError { setting_name, error } => {
                write!(f, "Failed to parse setting '{}': {}", setting_name, error)
            }
            Self::MissingSetting { setting_name } => {
                write!(f, "Required setting '{}' has no value", setting_name)
            }
        }
    }
}

impl std::error::Error for ApplicationError {}
