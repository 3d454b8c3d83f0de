//! Control → audio message ring.
//!
//! A wait-free single-producer/single-consumer ring (`rtrb`) carrying
//! [`ControlMessage`]s by value. The control thread owns the
//! [`ControlSender`]; the audio thread owns the [`ControlReceiver`] and
//! drains it at block boundaries.

use crate::error::{EngineError, Result};
use rtrb::{Consumer, Producer, RingBuffer};
use vonic_core::CoefficientSet;

/// Default ring capacity used by [`Equalizer::into_realtime`](crate::Equalizer::into_realtime)
/// callers that have no better figure.
pub const DEFAULT_CAPACITY: usize = 64;

/// One instruction for the audio context.
///
/// Every variant is `Copy`, so sending never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    /// Stream (re)start: new rate and block size, registers cleared.
    Prepare {
        /// Operating sample rate in Hz.
        sample_rate: f64,
        /// Largest block the host will pass.
        max_block_size: usize,
    },
    /// Clear filter registers, keep coefficients.
    Reset,
    /// Replace every coefficient in both chains.
    Coefficients(CoefficientSet),
}

/// Creates a connected sender/receiver pair.
pub fn control_channel(capacity: usize) -> (ControlSender, ControlReceiver) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (
        ControlSender { producer, capacity },
        ControlReceiver { consumer },
    )
}

/// Control-side half of the ring.
pub struct ControlSender {
    producer: Producer<ControlMessage>,
    capacity: usize,
}

impl ControlSender {
    /// Queues one message without blocking.
    pub fn send(&mut self, message: ControlMessage) -> Result<()> {
        self.producer
            .push(message)
            .map_err(|_| EngineError::QueueFull {
                capacity: self.capacity,
            })
    }

    /// Queues all `messages` or none of them.
    pub fn send_all(&mut self, messages: &[ControlMessage]) -> Result<()> {
        if self.producer.slots() < messages.len() {
            return Err(EngineError::QueueFull {
                capacity: self.capacity,
            });
        }
        for &message in messages {
            self.send(message)?;
        }
        Ok(())
    }

    /// Free slots.
    pub fn free_slots(&self) -> usize {
        self.producer.slots()
    }

    /// Messages sent but not yet drained.
    pub fn pending(&self) -> usize {
        self.capacity - self.producer.slots()
    }

    /// Ring capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the receiver has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }
}

/// Audio-side half of the ring.
pub struct ControlReceiver {
    consumer: Consumer<ControlMessage>,
}

impl ControlReceiver {
    /// Hands every queued message to `apply`, oldest first. Returns how many
    /// were drained.
    #[inline]
    pub fn drain(&mut self, mut apply: impl FnMut(ControlMessage)) -> usize {
        let mut count = 0;
        while let Ok(message) = self.consumer.pop() {
            apply(message);
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_arrive_in_order() {
        let (mut tx, mut rx) = control_channel(4);
        tx.send(ControlMessage::Reset).unwrap();
        tx.send(ControlMessage::Prepare {
            sample_rate: 44100.0,
            max_block_size: 128,
        })
        .unwrap();
        assert_eq!(tx.pending(), 2);

        let mut seen = Vec::new();
        assert_eq!(rx.drain(|m| seen.push(m)), 2);
        assert_eq!(seen[0], ControlMessage::Reset);
        assert!(matches!(seen[1], ControlMessage::Prepare { max_block_size: 128, .. }));
        assert_eq!(rx.drain(|_| {}), 0);
    }

    #[test]
    fn test_full_ring_reports_queue_full() {
        let (mut tx, _rx) = control_channel(1);
        tx.send(ControlMessage::Reset).unwrap();
        assert!(matches!(
            tx.send(ControlMessage::Reset),
            Err(EngineError::QueueFull { capacity: 1 })
        ));
    }

    #[test]
    fn test_send_all_is_all_or_nothing() {
        let (mut tx, mut rx) = control_channel(2);
        tx.send(ControlMessage::Reset).unwrap();
        let batch = [
            ControlMessage::Reset,
            ControlMessage::Coefficients(CoefficientSet::passthrough()),
        ];
        assert!(tx.send_all(&batch).is_err());
        assert_eq!(rx.drain(|_| {}), 1);
        assert!(tx.send_all(&batch).is_ok());
        assert_eq!(tx.free_slots(), 0);
    }

    #[test]
    fn test_abandoned_after_receiver_drop() {
        let (tx, rx) = control_channel(2);
        drop(rx);
        assert!(tx.is_abandoned());
    }
}
