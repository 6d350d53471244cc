//! In-process notification queue backed by a bounded Tokio channel.
//!
//! Enqueue never waits: a full or closed channel is reported as a
//! [`JobDispatchError`] so the checkout request completes regardless. A single
//! worker task drains the channel and hands each job to the
//! [`NotificationDispatcher`], re-entering the trace identifier captured at
//! enqueue time.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::ports::{JobDispatchError, NotificationQueue};
use crate::domain::{NotificationDispatcher, OrderNotification, TraceId};

/// Default channel capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Queued delivery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationJob {
    pub notification: OrderNotification,
    pub trace_id: Option<TraceId>,
}

/// Producer half handed to the order service.
#[derive(Debug, Clone)]
pub struct InProcessNotificationQueue {
    sender: Sender<NotificationJob>,
}

/// Consumer half drained by [`run_notification_worker`].
#[derive(Debug)]
pub struct NotificationJobReceiver {
    receiver: Receiver<NotificationJob>,
}

impl NotificationJobReceiver {
    /// Wait for the next job; `None` once every producer is dropped.
    pub async fn recv(&mut self) -> Option<NotificationJob> {
        self.receiver.recv().await
    }
}

/// Create a bounded queue. A capacity of zero is raised to one.
pub fn notification_channel(capacity: usize) -> (InProcessNotificationQueue, NotificationJobReceiver) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (
        InProcessNotificationQueue { sender },
        NotificationJobReceiver { receiver },
    )
}

#[async_trait]
impl NotificationQueue for InProcessNotificationQueue {
    async fn enqueue(&self, notification: &OrderNotification) -> Result<(), JobDispatchError> {
        let job = NotificationJob {
            notification: notification.clone(),
            trace_id: TraceId::current(),
        };
        match self.sender.try_send(job) {
            Ok(()) => {
                debug!(order_number = %notification.order_number, "notification enqueued");
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(JobDispatchError::rejected("notification queue is full")),
            Err(TrySendError::Closed(_)) => {
                Err(JobDispatchError::unavailable("notification worker has stopped"))
            }
        }
    }
}

/// Deliver queued jobs until every producer is dropped.
///
/// Returns the number of jobs processed.
pub async fn run_notification_worker(
    mut jobs: NotificationJobReceiver,
    dispatcher: Arc<NotificationDispatcher>,
) -> usize {
    let mut processed = 0;
    while let Some(job) = jobs.recv().await {
        let NotificationJob {
            notification,
            trace_id,
        } = job;
        let outcome = TraceId::scope_optional(trace_id, dispatcher.deliver(&notification)).await;
        if let Err(err) = outcome {
            error!(
                error = %err,
                order_number = %notification.order_number,
                trace_id = ?trace_id,
                "order notification was not delivered"
            );
        }
        processed += 1;
    }
    info!(processed, "notification worker stopped");
    processed
}

/// Spawn [`run_notification_worker`] on the current Tokio runtime.
pub fn spawn_notification_worker(
    jobs: NotificationJobReceiver,
    dispatcher: Arc<NotificationDispatcher>,
) -> JoinHandle<usize> {
    tokio::spawn(run_notification_worker(jobs, dispatcher))
}
