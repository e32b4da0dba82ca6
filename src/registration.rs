// 📝 Registration Form - Validation before account creation
// Single-error, fixed-priority validator over a form snapshot

use crate::cpf::{format_cpf, is_canonical};
use crate::models::NewAccount;
use std::fmt;

/// Minimum password length, counted in characters
pub const MIN_PASSWORD_LEN: usize = 6;

// ============================================================================
// FIELDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    TaxId,
    Nickname,
    Password,
    Confirmation,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::TaxId,
        Field::Nickname,
        Field::Password,
        Field::Confirmation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full name",
            Field::TaxId => "Document",
            Field::Nickname => "Nickname",
            Field::Password => "Password",
            Field::Confirmation => "Confirm password",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Name => "John Doe",
            Field::TaxId => "123.456.789-10",
            Field::Nickname => "John",
            Field::Password | Field::Confirmation => "",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, Field::Password | Field::Confirmation)
    }

    pub fn next(&self) -> Self {
        match self {
            Field::Name => Field::TaxId,
            Field::TaxId => Field::Nickname,
            Field::Nickname => Field::Password,
            Field::Password => Field::Confirmation,
            Field::Confirmation => Field::Name,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Field::Name => Field::Confirmation,
            Field::TaxId => Field::Name,
            Field::Nickname => Field::TaxId,
            Field::Password => Field::Nickname,
            Field::Confirmation => Field::Password,
        }
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Why a form was rejected. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Todos os campos são obrigatórios")]
    MissingFields,
    #[error("CPF inválido. Use o formato: 123.456.789-00")]
    InvalidTaxId,
    #[error("A senha deve ter pelo menos 6 caracteres")]
    PasswordTooShort,
    #[error("As senhas não coincidem")]
    PasswordMismatch,
}

impl RegistrationError {
    /// Short reason, for logs
    pub fn reason(&self) -> &'static str {
        match self {
            RegistrationError::MissingFields => "all fields required",
            RegistrationError::InvalidTaxId => "invalid tax-ID format",
            RegistrationError::PasswordTooShort => "password too short",
            RegistrationError::PasswordMismatch => "passwords do not match",
        }
    }
}

// ============================================================================
// FORM
// ============================================================================

/// Registration form, mutated one keystroke at a time.
///
/// The tax-ID is re-masked from the full field text on every update.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub tax_id: String,
    pub nickname: String,
    pub password: String,
    pub confirmation: String,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a field with the full current text of its input
    pub fn set(&mut self, field: Field, text: &str) {
        match field {
            Field::Name => self.name = text.to_string(),
            Field::TaxId => self.tax_id = format_cpf(text),
            Field::Nickname => self.nickname = text.to_string(),
            Field::Password => self.password = text.to_string(),
            Field::Confirmation => self.confirmation = text.to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::TaxId => &self.tax_id,
            Field::Nickname => &self.nickname,
            Field::Password => &self.password,
            Field::Confirmation => &self.confirmation,
        }
    }

    /// Append one typed character to a field
    pub fn push_char(&mut self, field: Field, c: char) {
        let mut text = self.get(field).to_string();
        text.push(c);
        self.set(field, &text);
    }

    /// Remove the last character of a field
    pub fn backspace(&mut self, field: Field) {
        let mut text = self.get(field).to_string();
        text.pop();
        self.set(field, &text);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check the form, first failing rule wins:
    /// empty field, tax-ID mask, password length, confirmation.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if Field::ALL.iter().any(|f| self.get(*f).is_empty()) {
            return Err(RegistrationError::MissingFields);
        }

        if !is_canonical(&self.tax_id) {
            return Err(RegistrationError::InvalidTaxId);
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::PasswordTooShort);
        }

        if self.password != self.confirmation {
            return Err(RegistrationError::PasswordMismatch);
        }

        Ok(())
    }

    pub fn is_submittable(&self) -> bool {
        self.validate().is_ok()
    }

    /// Validate and build the account-creation payload
    pub fn to_payload(&self) -> Result<NewAccount, RegistrationError> {
        self.validate()?;
        Ok(NewAccount {
            name: self.name.clone(),
            tax_id: self.tax_id.clone(),
            nickname: self.nickname.clone(),
            password: self.password.clone(),
        })
    }
}

impl fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("tax_id", &self.tax_id)
            .field("nickname", &self.nickname)
            .field("password", &"[REDACTED]")
            .field("confirmation", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_form() -> RegistrationForm {
        RegistrationForm {
            name: "Ana".to_string(),
            tax_id: "123.456.789-00".to_string(),
            nickname: "ana".to_string(),
            password: "secret".to_string(),
            confirmation: "secret".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(create_valid_form().validate(), Ok(()));
    }

    #[test]
    fn test_each_empty_field_rejected() {
        for field in Field::ALL {
            let mut form = create_valid_form();
            form.set(field, "");
            assert_eq!(
                form.validate(),
                Err(RegistrationError::MissingFields),
                "empty {:?} should be rejected",
                field
            );
        }
    }

    #[test]
    fn test_empty_field_wins_over_other_errors() {
        let form = RegistrationForm {
            name: "Ana".to_string(),
            tax_id: "123".to_string(),
            nickname: String::new(),
            password: "1".to_string(),
            confirmation: "2".to_string(),
        };
        assert_eq!(form.validate(), Err(RegistrationError::MissingFields));
    }

    #[test]
    fn test_tax_id_checked_before_password() {
        let mut form = create_valid_form();
        form.tax_id = "123.456.789-0".to_string();
        form.password = "123".to_string();
        assert_eq!(form.validate(), Err(RegistrationError::InvalidTaxId));
    }

    #[test]
    fn test_password_length_boundary() {
        let mut form = create_valid_form();
        form.password = "12345".to_string();
        form.confirmation = "12345".to_string();
        assert_eq!(form.validate(), Err(RegistrationError::PasswordTooShort));

        form.password = "123456".to_string();
        form.confirmation = "123456".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_password_length_counts_characters() {
        let mut form = create_valid_form();
        // 5 characters, 10 bytes
        form.password = "ççççç".to_string();
        form.confirmation = "ççççç".to_string();
        assert_eq!(form.validate(), Err(RegistrationError::PasswordTooShort));
    }

    #[test]
    fn test_keystrokes_mask_tax_id() {
        let mut form = RegistrationForm::new();
        for c in "12345678900".chars() {
            form.push_char(Field::TaxId, c);
        }
        assert_eq!(form.tax_id, "123.456.789-00");

        // Extra keystrokes past the full mask are dropped
        form.push_char(Field::TaxId, '9');
        assert_eq!(form.tax_id, "123.456.789-00");

        form.backspace(Field::TaxId);
        form.backspace(Field::TaxId);
        assert_eq!(form.tax_id, "123.456.789");
    }

    #[test]
    fn test_to_payload() {
        let payload = create_valid_form().to_payload().unwrap();
        assert_eq!(payload.name, "Ana");
        assert_eq!(payload.tax_id, "123.456.789-00");
        assert_eq!(payload.nickname, "ana");
        assert_eq!(payload.password, "secret");

        let mut bad = create_valid_form();
        bad.confirmation = "secreT".to_string();
        assert_eq!(bad.to_payload(), Err(RegistrationError::PasswordMismatch));
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let debug = format!("{:?}", create_valid_form());
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_field_cycle() {
        let mut field = Field::Name;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, Field::Name);
        assert_eq!(Field::Name.previous(), Field::Confirmation);
    }
}
