//! Cross-thread handshake between simulation threads and the frame loop.
//!
//! A simulation thread hands one packet at a time to the presentation thread
//! and blocks until the presentation thread has finished showing it. Packets
//! travel through a capacity-1 channel together with a one-shot release
//! token; the simulation thread waits on the token. Phase notices use a
//! separate unbounded channel because the announcing thread exits right after
//! sending them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use battle_core::{BattlePhase, Packet};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

use crate::api::{Result, RuntimeError};

/// Event currently held by the pump.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PendingEvent {
    Packet(Packet),
    Phase(BattlePhase),
}

struct Delivery {
    packet: Packet,
    release: oneshot::Sender<()>,
}

/// Creates a connected publisher/pump pair for one battle.
pub fn event_pump() -> (EventPublisher, EventPump) {
    let (packet_tx, packet_rx) = mpsc::channel(1);
    let (phase_tx, phase_rx) = mpsc::unbounded_channel();
    let outstanding = Arc::new(AtomicBool::new(false));

    let publisher = EventPublisher {
        packets: packet_tx,
        phases: phase_tx,
        outstanding: Arc::clone(&outstanding),
    };
    let pump = EventPump {
        packets: packet_rx,
        phases: phase_rx,
        outstanding,
        held: None,
        delivered: 0,
    };
    (publisher, pump)
}

/// Simulation-side end of the handshake.
///
/// Clones share the outstanding flag with the pump, so the one-packet-at-a-time
/// contract holds across every simulation thread of a battle. A packet stops
/// being outstanding when the pump releases it, not when its publisher wakes.
#[derive(Clone)]
pub struct EventPublisher {
    packets: mpsc::Sender<Delivery>,
    phases: mpsc::UnboundedSender<BattlePhase>,
    outstanding: Arc<AtomicBool>,
}

impl EventPublisher {
    /// Hands `packet` to the presentation thread and blocks until it is
    /// released.
    ///
    /// Must be called from a plain OS thread, never from inside an async
    /// runtime.
    ///
    /// # Panics
    ///
    /// Panics if another publish is still waiting for its release.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::PumpClosed`] once the pump has been dropped.
    pub fn publish(&self, packet: Packet) -> Result<()> {
        let already_waiting = self.outstanding.swap(true, Ordering::AcqRel);
        assert!(
            !already_waiting,
            "packet published while another one is still outstanding"
        );

        let kind = packet.kind();
        trace!(target: "runtime::pump", kind, "publishing packet");

        let (release_tx, release_rx) = oneshot::channel();
        let delivered = self.packets.blocking_send(Delivery {
            packet,
            release: release_tx,
        });
        if delivered.is_err() || release_rx.blocking_recv().is_err() {
            // The pump is gone and will never release this packet.
            self.outstanding.store(false, Ordering::Release);
            return Err(RuntimeError::PumpClosed);
        }

        trace!(target: "runtime::pump", kind, "packet released");
        Ok(())
    }

    /// Announces a phase change without waiting.
    pub fn notify_phase(&self, phase: BattlePhase) {
        debug!(target: "runtime::pump", phase = phase.as_str(), "phase notice");
        if self.phases.send(phase).is_err() {
            debug!(target: "runtime::pump", "phase notice dropped (pump closed)");
        }
    }

    /// Whether the presentation side has gone away.
    pub fn is_closed(&self) -> bool {
        self.packets.is_closed()
    }
}

/// Presentation-side end of the handshake, polled once per frame.
///
/// Dropping the pump closes both channels and wakes any blocked publisher
/// with [`RuntimeError::PumpClosed`].
pub struct EventPump {
    packets: mpsc::Receiver<Delivery>,
    phases: mpsc::UnboundedReceiver<BattlePhase>,
    outstanding: Arc<AtomicBool>,
    held: Option<oneshot::Sender<()>>,
    delivered: u64,
}

impl EventPump {
    /// Takes the next pending event without blocking.
    ///
    /// Returns `None` while a packet is held, so at most one packet is ever
    /// outstanding. Packets take priority over phase notices.
    pub fn next_pending(&mut self) -> Option<PendingEvent> {
        if self.held.is_some() {
            return None;
        }

        match self.packets.try_recv() {
            Ok(Delivery { packet, release }) => {
                self.held = Some(release);
                self.delivered += 1;
                return Some(PendingEvent::Packet(packet));
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
        }

        self.phases.try_recv().ok().map(PendingEvent::Phase)
    }

    /// Lets the simulation thread blocked on the held packet continue.
    ///
    /// Returns `false` when nothing was held.
    pub fn release(&mut self) -> bool {
        match self.held.take() {
            Some(release) => {
                // Cleared before waking the publisher, so a simulation thread
                // started right after this call may publish at once.
                self.outstanding.store(false, Ordering::Release);
                if release.send(()).is_err() {
                    debug!(target: "runtime::pump", "publisher gone before release");
                }
                true
            }
            None => false,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.held.is_some()
    }

    /// Number of packets taken so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn wait_for_packet(pump: &mut EventPump) -> Packet {
        loop {
            if let Some(PendingEvent::Packet(packet)) = pump.next_pending() {
                return packet;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn publish_blocks_until_release() {
        let (publisher, mut pump) = event_pump();
        let worker = thread::spawn(move || publisher.publish(Packet::TurnBegan { turn: 1 }));

        assert_eq!(wait_for_packet(&mut pump), Packet::TurnBegan { turn: 1 });
        thread::sleep(Duration::from_millis(20));
        assert!(!worker.is_finished());
        assert!(pump.next_pending().is_none());

        assert!(pump.release());
        assert!(worker.join().unwrap().is_ok());
        assert!(!pump.release());
    }

    #[test]
    fn packets_take_priority_over_phases() {
        let (publisher, mut pump) = event_pump();
        publisher.notify_phase(BattlePhase::ReadyToRunTurn);
        let worker = thread::spawn(move || publisher.publish(Packet::TurnBegan { turn: 2 }));

        assert_eq!(wait_for_packet(&mut pump), Packet::TurnBegan { turn: 2 });
        pump.release();
        worker.join().unwrap().unwrap();
        assert_eq!(
            pump.next_pending(),
            Some(PendingEvent::Phase(BattlePhase::ReadyToRunTurn))
        );
        assert_eq!(pump.next_pending(), None);
    }

    #[test]
    fn dropping_pump_cancels_blocked_publisher() {
        let (publisher, mut pump) = event_pump();
        let worker = thread::spawn(move || publisher.publish(Packet::TurnBegan { turn: 3 }));

        wait_for_packet(&mut pump);
        drop(pump);

        assert!(matches!(worker.join().unwrap(), Err(RuntimeError::PumpClosed)));
    }

    #[test]
    fn publish_after_close_fails_fast() {
        let (publisher, pump) = event_pump();
        drop(pump);
        assert!(publisher.is_closed());
        assert!(matches!(
            publisher.publish(Packet::TurnBegan { turn: 4 }),
            Err(RuntimeError::PumpClosed)
        ));
        // The outstanding flag is cleared on the error path.
        assert!(matches!(
            publisher.publish(Packet::TurnBegan { turn: 5 }),
            Err(RuntimeError::PumpClosed)
        ));
    }

    #[test]
    fn fresh_thread_may_publish_right_after_release() {
        let (publisher, mut pump) = event_pump();
        for turn in 0..200 {
            let first = publisher.clone();
            let worker = thread::spawn(move || first.publish(Packet::TurnBegan { turn }));
            wait_for_packet(&mut pump);
            assert!(pump.release());

            // The released thread may not have been scheduled yet.
            let next = publisher.clone();
            let follower =
                thread::spawn(move || next.publish(Packet::TurnBegan { turn: turn + 1000 }));
            assert_eq!(wait_for_packet(&mut pump), Packet::TurnBegan { turn: turn + 1000 });
            assert!(pump.release());

            worker.join().unwrap().unwrap();
            follower.join().unwrap().unwrap();
        }
    }

    #[test]
    fn publish_while_follower_is_held_is_still_caught() {
        let (publisher, mut pump) = event_pump();
        let first = publisher.clone();
        let worker = thread::spawn(move || first.publish(Packet::TurnBegan { turn: 8 }));
        wait_for_packet(&mut pump);
        pump.release();
        worker.join().unwrap().unwrap();

        let second = publisher.clone();
        let held = thread::spawn(move || second.publish(Packet::TurnBegan { turn: 9 }));
        wait_for_packet(&mut pump);

        // The earlier publisher finishing must not have cleared the flag.
        let third = thread::spawn(move || publisher.publish(Packet::TurnBegan { turn: 10 }));
        assert!(third.join().is_err());

        pump.release();
        held.join().unwrap().unwrap();
    }

    #[test]
    fn concurrent_publish_is_a_protocol_violation() {
        let (publisher, mut pump) = event_pump();
        let first = publisher.clone();
        let worker = thread::spawn(move || first.publish(Packet::TurnBegan { turn: 6 }));
        wait_for_packet(&mut pump);

        let second = thread::spawn(move || publisher.publish(Packet::TurnBegan { turn: 7 }));
        assert!(second.join().is_err());

        pump.release();
        worker.join().unwrap().unwrap();
    }
}
