// Screen controllers: state + actions, no rendering
pub mod dashboard;
pub mod profile;
pub mod register;

pub use dashboard::{DashboardScreen, LoadState};
pub use profile::{DeleteStep, ProfileScreen};
pub use register::{RegisterOutcome, RegisterScreen};

/// Where a screen asks to go next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Profile,
}
