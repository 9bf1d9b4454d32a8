//! Slot values carried by the buffer
//!
//! A slot is either a real item or the end-of-stream marker. The marker is an
//! ordinary queued value: it takes up capacity, travels in FIFO order with the
//! items around it, and is handed to exactly one consumer.

/// A single queued value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot<T> {
    /// A payload produced by a producer
    Item(T),
    /// Tells the one consumer that pops it to stop
    EndOfStream,
}

impl<T> Slot<T> {
    pub fn is_item(&self) -> bool {
        matches!(self, Slot::Item(_))
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Slot::EndOfStream)
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            Slot::Item(item) => Some(item),
            Slot::EndOfStream => None,
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            Slot::Item(item) => Some(item),
            Slot::EndOfStream => None,
        }
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(item) => Slot::Item(item),
            None => Slot::EndOfStream,
        }
    }
}

impl<T> From<Slot<T>> for Option<T> {
    fn from(slot: Slot<T>) -> Self {
        slot.into_item()
    }
}
