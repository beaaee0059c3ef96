//! Knob and button input reported by the display terminal

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputEvent {
    /// Knob turned one detent clockwise
    TurnCw,
    /// Knob turned one detent counter-clockwise
    TurnCcw,
    /// Short press
    Press,
    /// Press held past the long-press threshold
    LongPress,
    /// Button let go after a long press
    Release,
}

const WIRE: [(u8, InputEvent); 5] = [
    (0x01, InputEvent::TurnCw),
    (0x02, InputEvent::TurnCcw),
    (0x10, InputEvent::Press),
    (0x11, InputEvent::LongPress),
    (0x12, InputEvent::Release),
];

impl InputEvent {
    pub fn from_byte(byte: u8) -> Option<Self> {
        WIRE.iter().find(|(b, _)| *b == byte).map(|(_, e)| *e)
    }

    pub fn to_byte(self) -> u8 {
        WIRE.iter()
            .find(|(_, e)| *e == self)
            .map(|(b, _)| *b)
            .unwrap_or(0)
    }

    /// Detents turned: +1, -1 or 0 for button events
    pub fn detents(self) -> i8 {
        match self {
            InputEvent::TurnCw => 1,
            InputEvent::TurnCcw => -1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        for (byte, event) in WIRE {
            assert_eq!(InputEvent::from_byte(byte), Some(event));
            assert_eq!(event.to_byte(), byte);
        }
        assert_eq!(InputEvent::from_byte(0x00), None);
        assert_eq!(InputEvent::from_byte(0x13), None);
    }

    #[test]
    fn test_detents() {
        assert_eq!(InputEvent::TurnCw.detents(), 1);
        assert_eq!(InputEvent::TurnCcw.detents(), -1);
        assert_eq!(InputEvent::Press.detents(), 0);
    }
}
