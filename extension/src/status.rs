use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient banner shown after a dashboard save or delete
#[derive(Debug, Clone, PartialEq)]
pub struct SaveStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl SaveStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    /// `success_message` on Ok, the error's banner text otherwise
    pub fn from_result<T>(result: &Result<T>, success_message: &str) -> Self {
        match result {
            Ok(_) => Self::success(success_message),
            Err(e) => {
                log::error!("{}", e);
                Self::error(e.banner_message())
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ValidationError};

    #[test]
    fn test_from_result() {
        let ok: Result<()> = Ok(());
        assert_eq!(
            SaveStatus::from_result(&ok, "Recipient saved successfully!"),
            SaveStatus::success("Recipient saved successfully!")
        );

        let rejected: Result<()> = Err(ValidationError::TemplateIncomplete.into());
        let status = SaveStatus::from_result(&rejected, "Template saved successfully!");
        assert!(status.is_error());
        assert_eq!(status.message, "Name and content are required!");

        let failed: Result<()> = Err(Error::storage("set", "quota"));
        assert!(SaveStatus::from_result(&failed, "saved").message.contains("quota"));
    }
}
