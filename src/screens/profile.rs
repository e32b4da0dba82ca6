// 👤 Profile Screen - local settings, logout, delete-account dialog

use crate::error::StoreError;
use crate::flags::{FlagStore, ALLOW_FINGERPRINT};
use crate::models::Session;
use crate::screens::Route;

/// Two confirmations are required before an account is deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStep {
    Idle,
    AwaitingFirst,
    AwaitingFinal,
}

#[derive(Debug)]
pub struct ProfileScreen {
    pub dark_theme: bool,
    pub notifications: bool,
    biometrics: bool,
    delete_step: DeleteStep,
}

impl Default for ProfileScreen {
    fn default() -> Self {
        ProfileScreen {
            dark_theme: false,
            notifications: true,
            biometrics: false,
            delete_step: DeleteStep::Idle,
        }
    }
}

impl ProfileScreen {
    /// Build the screen, reading the biometric switch from the flag store
    pub fn mount<S: FlagStore>(store: &S) -> Result<Self, StoreError> {
        Ok(ProfileScreen {
            biometrics: store.get(ALLOW_FINGERPRINT)? == Some(true),
            ..Self::default()
        })
    }

    pub fn biometrics(&self) -> bool {
        self.biometrics
    }

    pub fn toggle_theme(&mut self) {
        self.dark_theme = !self.dark_theme;
    }

    pub fn toggle_notifications(&mut self) {
        self.notifications = !self.notifications;
    }

    /// Flip biometric unlock and persist the new value
    pub fn toggle_biometrics<S: FlagStore>(&mut self, store: &mut S) -> Result<bool, StoreError> {
        let enabled = !self.biometrics;
        store.set(ALLOW_FINGERPRINT, enabled)?;
        self.biometrics = enabled;
        Ok(enabled)
    }

    pub fn logout(&mut self, session: &mut Session) -> Route {
        session.sign_out();
        Route::Login
    }

    // ========================================================================
    // DELETE ACCOUNT
    // ========================================================================

    pub fn delete_step(&self) -> DeleteStep {
        self.delete_step
    }

    pub fn request_delete(&mut self) {
        self.delete_step = DeleteStep::AwaitingFirst;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_step = DeleteStep::Idle;
    }

    /// Advance the dialog. Returns the next route once both confirmations
    /// were given.
    // TODO: call the backend's account deletion endpoint once it exists; today
    // the flow only signs the user out.
    pub fn confirm_delete(&mut self, session: &mut Session) -> Option<Route> {
        match self.delete_step {
            DeleteStep::Idle => None,
            DeleteStep::AwaitingFirst => {
                self.delete_step = DeleteStep::AwaitingFinal;
                None
            }
            DeleteStep::AwaitingFinal => {
                self.delete_step = DeleteStep::Idle;
                session.sign_out();
                Some(Route::Login)
            }
        }
    }

    /// Title and body of the dialog currently shown, if any
    pub fn delete_prompt(&self) -> Option<(&'static str, &'static str)> {
        match self.delete_step {
            DeleteStep::Idle => None,
            DeleteStep::AwaitingFirst => Some((
                "Excluir Conta",
                "Tem certeza que deseja excluir sua conta? Esta ação não pode ser desfeita.",
            )),
            DeleteStep::AwaitingFinal => Some((
                "Confirmação",
                "Por favor, confirme novamente que deseja excluir permanentemente sua conta.",
            )),
        }
    }

    /// Avatar letter, `U` when nobody is signed in
    pub fn avatar_initial(&self, session: &Session) -> char {
        session.user.as_ref().map(|u| u.initial()).unwrap_or('U')
    }

    pub fn version_label(&self) -> String {
        format!("Versão {}", crate::VERSION)
    }
}
