// Rala Bank - Client Core Library
// Exposes input masking, validation, backend client and screen state for the CLI and tests

pub mod cpf;            // Tax-ID input mask
pub mod registration;   // Registration form + validator
pub mod formatting;     // Currency / date display
pub mod models;         // Backend wire types
pub mod config;         // Environment configuration
pub mod error;          // Error taxonomy
pub mod client;         // REST client
pub mod flags;          // Persistent boolean flags
pub mod biometric;      // Biometric unlock gate
pub mod alert;          // User-facing alerts
pub mod screens;        // Registration, dashboard and profile controllers

// Re-export commonly used types
pub use cpf::{format_cpf, is_canonical, strip_non_digits};
pub use registration::{Field, RegistrationError, RegistrationForm, MIN_PASSWORD_LEN};
pub use formatting::{format_currency, format_date};
pub use models::{Balance, Counterparty, Direction, NewAccount, Session, Transaction, User};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, StoreError};
pub use client::BankClient;
pub use flags::{FlagStore, MemoryFlagStore, SqliteFlagStore, ALLOW_FINGERPRINT};
pub use biometric::{BiometricCapability, GateOutcome, NoBiometrics};
pub use alert::{Alert, AlertQueue, Notifier};
pub use screens::{
    DashboardScreen, DeleteStep, LoadState, ProfileScreen, RegisterOutcome, RegisterScreen, Route,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
