// 👆 Biometric Unlock Gate
// Asks once for biometric consent and remembers the answer in the flag store

use crate::alert::Notifier;
use crate::error::StoreError;
use crate::flags::{FlagStore, ALLOW_FINGERPRINT};
use tracing::{debug, info};

pub const PROMPT_MESSAGE: &str = "Autentique-se para continuar";
pub const FALLBACK_LABEL: &str = "Usar senha";

/// Device biometric capability.
///
/// `authenticate` resolves to `true` only when the user passed the prompt.
/// It is never retried automatically.
#[allow(async_fn_in_trait)]
pub trait BiometricCapability {
    async fn has_hardware(&self) -> bool;
    async fn is_enrolled(&self) -> bool;
    async fn authenticate(&self, prompt: &str, fallback_label: &str) -> bool;
}

/// Capability of a device without biometric hardware (e.g. a terminal)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBiometrics;

impl BiometricCapability for NoBiometrics {
    async fn has_hardware(&self) -> bool {
        false
    }

    async fn is_enrolled(&self) -> bool {
        false
    }

    async fn authenticate(&self, _prompt: &str, _fallback_label: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The flag store already holds the user's answer
    AlreadyDecided(bool),
    /// No biometric hardware; nothing asked
    NoHardware,
    /// Hardware present but nothing enrolled
    NotEnrolled,
    /// Prompt passed; the flag is now `true`
    Enabled,
    /// Prompt failed or was cancelled; the flag stays unset
    Declined,
}

/// Run on dashboard mount.
///
/// Skips entirely when the flag already holds `true` or `false`. Otherwise,
/// on a device with hardware, either warns that nothing is enrolled or shows
/// the prompt and stores `true` on success.
pub async fn unlock_on_mount<S, B, N>(
    store: &mut S,
    biometrics: &B,
    notifier: &mut N,
) -> Result<GateOutcome, StoreError>
where
    S: FlagStore,
    B: BiometricCapability,
    N: Notifier,
{
    if let Some(decided) = store.get(ALLOW_FINGERPRINT)? {
        debug!(decided, "biometric preference already stored");
        return Ok(GateOutcome::AlreadyDecided(decided));
    }

    if !biometrics.has_hardware().await {
        return Ok(GateOutcome::NoHardware);
    }

    if !biometrics.is_enrolled().await {
        notifier.alert("Nenhuma biometria cadastrada", "");
        return Ok(GateOutcome::NotEnrolled);
    }

    request_authorization(store, biometrics, notifier).await
}

/// Show the biometric prompt and store `true` when it passes
pub async fn request_authorization<S, B, N>(
    store: &mut S,
    biometrics: &B,
    notifier: &mut N,
) -> Result<GateOutcome, StoreError>
where
    S: FlagStore,
    B: BiometricCapability,
    N: Notifier,
{
    if !biometrics.has_hardware().await {
        notifier.alert("Não suportado", "");
        return Ok(GateOutcome::NoHardware);
    }

    if !biometrics.is_enrolled().await {
        notifier.alert("Nenhuma biometria cadastrada", "");
        return Ok(GateOutcome::NotEnrolled);
    }

    if biometrics.authenticate(PROMPT_MESSAGE, FALLBACK_LABEL).await {
        store.set(ALLOW_FINGERPRINT, true)?;
        info!("biometric unlock enabled");
        Ok(GateOutcome::Enabled)
    } else {
        Ok(GateOutcome::Declined)
    }
}
