// 📝 Registration Screen
// Owns the form while mounted, validates on submit, hands the payload to the backend

use crate::alert::Notifier;
use crate::client::BankClient;
use crate::registration::{Field, RegistrationError, RegistrationForm};
use crate::screens::Route;
use tracing::warn;

const CREATE_FAILED: &str = "Não foi possível criar a conta";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Local validation failed; the form is untouched
    Invalid(RegistrationError),
    /// The backend refused or could not be reached; the form is untouched
    Failed(String),
    /// Account created; the form was cleared
    Created { nickname: String, next: Route },
}

#[derive(Debug)]
pub struct RegisterScreen {
    form: RegistrationForm,
    focus: Field,
    submitting: bool,
}

impl Default for RegisterScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterScreen {
    pub fn new() -> Self {
        RegisterScreen {
            form: RegistrationForm::new(),
            focus: Field::Name,
            submitting: false,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Full-text change of a field (paste, or a text widget's change event)
    pub fn input(&mut self, field: Field, text: &str) {
        self.form.set(field, text);
    }

    /// One keystroke into the focused field
    pub fn type_char(&mut self, c: char) {
        self.form.push_char(self.focus, c);
    }

    pub fn backspace(&mut self) {
        self.form.backspace(self.focus);
    }

    /// Validate, then create the account.
    ///
    /// Every failure raises one `Erro` alert and keeps the form for
    /// correction. Success raises a confirmation, clears the form and points
    /// to the login screen.
    pub async fn submit<N: Notifier>(
        &mut self,
        client: &BankClient,
        notifier: &mut N,
    ) -> RegisterOutcome {
        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(err) => {
                notifier.alert("Erro", &err.to_string());
                return RegisterOutcome::Invalid(err);
            }
        };

        self.submitting = true;
        let result = client.create_account(&payload).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                notifier.alert(
                    "Cadastro realizado",
                    &format!("Usuário {} cadastrado com sucesso!", payload.nickname),
                );
                self.form.clear();
                self.focus = Field::Name;
                RegisterOutcome::Created {
                    nickname: payload.nickname,
                    next: Route::Login,
                }
            }
            Err(err) => {
                warn!(error = %err, "account creation failed");
                let message = err.user_message(CREATE_FAILED);
                notifier.alert("Erro", &message);
                RegisterOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertQueue;
    use crate::config::ClientConfig;

    #[test]
    fn test_typing_follows_focus() {
        let mut screen = RegisterScreen::new();
        screen.type_char('A');
        screen.focus_next();
        for c in "1234".chars() {
            screen.type_char(c);
        }
        assert_eq!(screen.form().name, "A");
        assert_eq!(screen.form().tax_id, "123.4");

        screen.backspace();
        assert_eq!(screen.form().tax_id, "123");
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_backend() {
        // Port 9 (discard) would fail if contacted
        let config = ClientConfig::default().with_api_url("http://127.0.0.1:9").unwrap();
        let client = BankClient::new(&config).unwrap();
        let mut screen = RegisterScreen::new();
        screen.input(Field::Name, "Ana");
        let mut alerts = AlertQueue::new();

        let outcome = screen.submit(&client, &mut alerts).await;
        assert_eq!(outcome, RegisterOutcome::Invalid(RegistrationError::MissingFields));
        assert_eq!(alerts.current().unwrap().message, "Todos os campos são obrigatórios");
        assert_eq!(screen.form().name, "Ana");
    }
}
