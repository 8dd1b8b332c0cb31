//! Channel Synthesis Queue - mpsc 通道实现的待合成队列

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::ports::{QueueError, SynthesisQueuePort};

/// Channel Synthesis Queue
///
/// 发送端供 SubmitText / RetrySynthesis 入队，
/// 接收端由 SynthesisWorker 消费
pub struct ChannelSynthesisQueue {
    sender: mpsc::Sender<Uuid>,
}

impl ChannelSynthesisQueue {
    pub fn new(sender: mpsc::Sender<Uuid>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl SynthesisQueuePort for ChannelSynthesisQueue {
    async fn enqueue(&self, text_id: Uuid) -> Result<(), QueueError> {
        self.sender.try_send(text_id).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full,
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enqueue_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(4);
        let queue = ChannelSynthesisQueue::new(tx);

        let id = Uuid::new_v4();
        queue.enqueue(id).await.unwrap();
        assert_eq!(rx.recv().await, Some(id));
    }

    #[tokio::test]
    async fn test_enqueue_reports_full_and_closed() {
        let (tx, rx) = mpsc::channel(1);
        let queue = ChannelSynthesisQueue::new(tx);

        queue.enqueue(Uuid::new_v4()).await.unwrap();
        assert!(matches!(
            queue.enqueue(Uuid::new_v4()).await,
            Err(QueueError::Full)
        ));

        drop(rx);
        assert!(matches!(
            queue.enqueue(Uuid::new_v4()).await,
            Err(QueueError::Closed)
        ));
    }
}
