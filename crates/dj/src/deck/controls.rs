//! Control ranges and the seek control.

/// Upper bound of the gain control; engine gain is `value / GAIN_CONTROL_MAX`.
pub const GAIN_CONTROL_MAX: f64 = 30.0;

/// Value the gain control returns to on reset.
pub const GAIN_CONTROL_RESET: f64 = 15.0;

/// Upper bound of the speed control.
pub const SPEED_CONTROL_MAX: f64 = 2.0;

/// Value the speed control returns to on reset.
pub const SPEED_CONTROL_RESET: f64 = 1.0;

/// Engine gain for a gain control value.
pub fn engine_gain(control_value: f64) -> f64 {
    control_value / GAIN_CONTROL_MAX
}

/// The deck's seek control.
///
/// It has two writers. User seeks go through `DeckController::external_seek`,
/// which repositions the engine and persists the deck record. The sync loop
/// uses [`SeekControl::synced_position_update`], which only moves the control
/// and never feeds back into the engine or the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeekControl {
    value: f64,
}

impl SeekControl {
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Silent update driven by the engine position.
    pub fn synced_position_update(&mut self, position: f64) {
        self.value = position;
    }

    /// User-initiated move; the caller owns the change notification.
    pub(crate) fn user_set(&mut self, value: f64) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_gain() {
        assert_eq!(engine_gain(0.0), 0.0);
        assert_eq!(engine_gain(15.0), 0.5);
        assert_eq!(engine_gain(30.0), 1.0);
    }

    #[test]
    fn test_seek_control_writers() {
        let mut seek = SeekControl::new(0.2);
        seek.synced_position_update(0.4);
        assert_eq!(seek.value(), 0.4);

        seek.user_set(0.9);
        assert_eq!(seek.value(), 0.9);
    }
}
