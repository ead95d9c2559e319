//! Completion signal: a tone, or a visible alert when no tone can be made.

use crate::error::SignalError;

pub const DEFAULT_ALERT_MESSAGE: &str = "Time's up! Great job focusing.";

/// Host capabilities used to announce a finished countdown.
pub trait Chime {
    /// Play the completion tone.
    ///
    /// # Errors
    /// Returns [`SignalError::Unavailable`] when the host cannot make sound.
    fn play_tone(&self) -> Result<(), SignalError>;

    fn alert(&self, message: &str);
}

/// Which side effect announced a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Tone,
    Alert,
}

/// Play the tone, falling back to `message` as an alert.
pub fn announce_completion<C: Chime + ?Sized>(chime: &C, message: &str) -> SignalOutcome {
    match chime.play_tone() {
        Ok(()) => SignalOutcome::Tone,
        Err(e) => {
            tracing::debug!(error = %e, "falling back to alert");
            chime.alert(message);
            SignalOutcome::Alert
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingChime;
    use super::*;

    #[test]
    fn tone_when_available() {
        let chime = RecordingChime::with_tone();
        assert_eq!(announce_completion(&chime, DEFAULT_ALERT_MESSAGE), SignalOutcome::Tone);
        assert_eq!(chime.tones.get(), 1);
        assert!(chime.alerts.borrow().is_empty());
    }

    #[test]
    fn alert_when_tone_unavailable() {
        let chime = RecordingChime::default();
        assert_eq!(announce_completion(&chime, DEFAULT_ALERT_MESSAGE), SignalOutcome::Alert);
        assert_eq!(chime.tones.get(), 0);
        assert_eq!(*chime.alerts.borrow(), vec![DEFAULT_ALERT_MESSAGE.to_string()]);
    }
}
