//! Background workers bridging the ports and the buffer
//!
//! Both loops race every wait against the lifecycle token, so cancellation
//! stops them at the next suspension point, including a blocked hand-off to
//! a consumer that never reads.

use crate::queue::buffer::Buffer;
use crate::queue::config::ShutdownPolicy;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Drain the inbound port into the buffer until cancelled
pub(crate) async fn run_intake<T>(
    name: String,
    mut inbound: mpsc::Receiver<T>,
    buffer: Arc<Buffer<T>>,
    lifecycle: CancellationToken,
    policy: ShutdownPolicy,
) {
    log::debug!("Queue '{}': intake worker started", name);

    loop {
        tokio::select! {
            biased;
            _ = lifecycle.cancelled() => break,
            item = inbound.recv() => match item {
                Some(item) => {
                    log::trace!("Queue '{}': item accepted", name);
                    buffer.append(item);
                }
                None => {
                    log::debug!("Queue '{}': all producers gone, intake worker stopped", name);
                    return;
                }
            },
        }
    }

    // No new sends get through once the receiver is closed. recv() still
    // yields what is on the port, including sends holding a reserved slot,
    // then returns None.
    inbound.close();
    match policy {
        ShutdownPolicy::Discard => {
            let mut discarded = 0usize;
            while inbound.recv().await.is_some() {
                discarded += 1;
            }
            if discarded > 0 {
                log::warn!(
                    "Queue '{}': discarded {} unread inbound item(s) on close",
                    name,
                    discarded
                );
            }
        }
        ShutdownPolicy::Drain => {
            let mut drained = 0usize;
            while let Some(item) = inbound.recv().await {
                buffer.append(item);
                drained += 1;
            }
            log::debug!(
                "Queue '{}': drained {} inbound item(s) into the buffer on close",
                name,
                drained
            );
        }
    }

    log::debug!("Queue '{}': intake worker stopped", name);
}

/// Move the buffer head onto the outbound port until cancelled
pub(crate) async fn run_outtake<T>(
    name: String,
    outbound: mpsc::Sender<T>,
    buffer: Arc<Buffer<T>>,
    lifecycle: CancellationToken,
) {
    log::debug!("Queue '{}': outtake worker started", name);

    loop {
        let item = tokio::select! {
            biased;
            _ = lifecycle.cancelled() => break,
            item = buffer.take_for_delivery() => item,
        };

        let permit = tokio::select! {
            biased;
            _ = lifecycle.cancelled() => None,
            permit = outbound.reserve() => permit.ok(),
        };

        match permit {
            Some(permit) => {
                buffer.hand_off(item, |item| permit.send(item));
                log::trace!("Queue '{}': item handed to outbound port", name);
            }
            None => {
                log::debug!(
                    "Queue '{}': hand-off interrupted by close, item returned to buffer",
                    name
                );
                buffer.restore_head(item);
                break;
            }
        }
    }

    log::debug!("Queue '{}': outtake worker stopped", name);
}
