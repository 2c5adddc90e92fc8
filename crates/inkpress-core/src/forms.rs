//! Reader-submitted forms and their validation.
//!
//! Forms are cleaned before validation: surrounding whitespace is stripped
//! from every field, and the cleaned values are what gets stored or mailed.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{DomainError, FieldErrors};

const REQUIRED: &str = "This field is required.";

pub const COMMENT_NAME_MAX_LEN: usize = 80;
pub const SHARE_NAME_MAX_LEN: usize = 25;

/// A new comment on a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(
        min = 1,
        max = 80,
        message = "Ensure this value has at most 80 characters."
    ))]
    pub name: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(length(min = 1, message = "This field is required."))]
    pub body: String,
}

impl CommentForm {
    /// Trimmed copy of the form, or every problem found in it.
    pub fn clean(self) -> Result<Self, DomainError> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            body: self.body.trim().to_string(),
        };

        if let Err(errors) = form.validate() {
            return Err(into_domain_error(
                errors,
                &[
                    ("name", form.name.as_str()),
                    ("email", form.email.as_str()),
                    ("body", form.body.as_str()),
                ],
            ));
        }
        Ok(form)
    }
}

/// "Recommend this post to a friend" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ShareForm {
    #[validate(length(
        min = 1,
        max = 25,
        message = "Ensure this value has at most 25 characters."
    ))]
    pub name: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[validate(email(message = "Enter a valid email address."))]
    pub to: String,

    #[serde(default)]
    pub comments: String,
}

impl ShareForm {
    /// Trimmed copy of the form, or every problem found in it.
    pub fn clean(self) -> Result<Self, DomainError> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        };

        if let Err(errors) = form.validate() {
            return Err(into_domain_error(
                errors,
                &[
                    ("name", form.name.as_str()),
                    ("email", form.email.as_str()),
                    ("to", form.to.as_str()),
                ],
            ));
        }
        Ok(form)
    }
}

/// Blank fields report "required" instead of the rule that rejected them.
fn into_domain_error(errors: ValidationErrors, values: &[(&str, &str)]) -> DomainError {
    let mut fields = FieldErrors::new();

    for (field, problems) in errors.field_errors() {
        let field: &str = &field;
        let blank = values
            .iter()
            .any(|(name, value)| *name == field && value.is_empty());
        if blank {
            fields.add(field, REQUIRED);
            continue;
        }

        for problem in problems {
            let message = match &problem.message {
                Some(message) => message.to_string(),
                None => problem.code.to_string(),
            };
            fields.add(field, message);
        }
    }

    DomainError::Validation(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_EMAIL: &str = "Enter a valid email address.";

    fn field_errors<T: std::fmt::Debug>(result: Result<T, DomainError>) -> FieldErrors {
        match result {
            Err(DomainError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn comment(name: &str, email: &str, body: &str) -> CommentForm {
        CommentForm {
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }

    #[test]
    fn test_comment_form_reports_each_field() {
        let errors = field_errors(comment("  ", "nope", "").clean());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["body", "email", "name"]);
        assert_eq!(errors.get("email"), Some(&[INVALID_EMAIL.to_string()][..]));
        assert_eq!(errors.get("name"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_comment_form_rejects_malformed_addresses() {
        for email in ["ana", "@example.com", "ana@exa mple.com", "ana@@example.com"] {
            let errors = field_errors(comment("Ana", email, "Hi").clean());
            assert!(errors.contains("email"), "{} should be rejected", email);
        }
    }

    #[test]
    fn test_comment_form_accepts_valid_input() {
        let form = comment("Ana", "first.last+tag@mail.example.org", "Great read")
            .clean()
            .unwrap();
        assert_eq!(form.name, "Ana");
    }

    #[test]
    fn test_cleaned_comment_is_trimmed_before_length_check() {
        let padded = format!("Ana{}", " ".repeat(100));
        let form = comment(&padded, " ana@example.com ", "\n Hi \n").clean().unwrap();
        assert_eq!(form, comment("Ana", "ana@example.com", "Hi"));

        let long = "x".repeat(COMMENT_NAME_MAX_LEN + 1);
        assert!(field_errors(comment(&long, "ana@example.com", "Hi").clean()).contains("name"));

        let exact = "x".repeat(COMMENT_NAME_MAX_LEN);
        let form = comment(&format!("  {}  ", exact), "ana@example.com", "Hi")
            .clean()
            .unwrap();
        assert_eq!(form.name.chars().count(), COMMENT_NAME_MAX_LEN);
    }

    #[test]
    fn test_share_form_comments_optional_but_recipient_required() {
        let form = ShareForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            to: String::new(),
            comments: String::new(),
        };
        let errors = field_errors(form.clean());
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["to"]);
        assert_eq!(errors.get("to"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn test_share_form_name_length() {
        let form = ShareForm {
            name: "x".repeat(SHARE_NAME_MAX_LEN + 1),
            email: "ana@example.com".into(),
            to: "bo@example.com".into(),
            comments: String::new(),
        };
        assert!(field_errors(form.clean()).contains("name"));
    }
}
