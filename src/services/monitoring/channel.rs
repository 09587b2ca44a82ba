// ProgressChannel - バックグラウンドのランからコンソールへのイベント経路

use crate::core::{LogEvent, ProgressEvent, RunEvent, RunReport};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// イベント経路を作成
///
/// 送信側はブロックしない。受信側が遅れてもイベントは破棄されず、
/// キューに溜まって全件が順番通りに届く。
pub fn progress_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        EventSender { tx },
        EventReceiver {
            rx,
            disconnected: false,
        },
    )
}

/// 送信側（複数生成可）
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl EventSender {
    /// 受信側が既に閉じていても処理は続行する
    pub fn send(&self, event: RunEvent) {
        let _ = self.tx.send(event);
    }

    pub fn progress(&self, event: ProgressEvent) {
        self.send(RunEvent::Progress(event));
    }

    pub fn log(&self, event: LogEvent) {
        self.send(RunEvent::Log(event));
    }

    pub fn finished(&self, report: RunReport) {
        self.send(RunEvent::Finished(report));
    }
}

/// 受信側（コンソールが1つだけ所有）
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<RunEvent>,
    disconnected: bool,
}

impl EventReceiver {
    /// ノンブロッキングで溜まっているイベントを全て取り出す
    pub fn drain(&mut self) -> Vec<RunEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
        events
    }

    /// 次のイベントを待つ（購読型の利用向け）
    pub async fn recv(&mut self) -> Option<RunEvent> {
        let event = self.rx.recv().await;
        if event.is_none() {
            self.disconnected = true;
        }
        event
    }

    /// 全送信側が閉じ、残りのイベントも取り出し済みか
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn progress(n: usize) -> ProgressEvent {
        ProgressEvent {
            module_name: "M".to_string(),
            current_file: format!("f{n}"),
            processed_count: n,
            total_count: 1000,
            failure_count: 0,
        }
    }

    #[test]
    fn test_drain_preserves_every_event_in_order() {
        let (tx, mut rx) = progress_channel();

        for n in 1..=1000 {
            tx.progress(progress(n));
        }

        let counts: Vec<usize> = rx
            .drain()
            .into_iter()
            .map(|event| match event {
                RunEvent::Progress(p) => p.processed_count,
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();

        assert_eq!(counts, (1..=1000).collect::<Vec<_>>());
        assert!(!rx.is_disconnected());
    }

    #[test]
    fn test_drain_on_empty_does_not_block() {
        let (_tx, mut rx) = progress_channel();
        assert!(rx.drain().is_empty());
    }

    #[test]
    fn test_disconnect_is_observed_after_remaining_events() {
        let (tx, mut rx) = progress_channel();
        tx.log(LogEvent::new(LogLevel::Info, "last words"));
        drop(tx);

        let events = rx.drain();
        assert_eq!(events.len(), 1);
        assert!(rx.drain().is_empty());
        assert!(rx.is_disconnected());
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (tx, rx) = progress_channel();
        drop(rx);

        tx.progress(progress(1));
    }

    #[tokio::test]
    async fn test_producers_from_other_tasks() {
        let (tx, mut rx) = progress_channel();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let tx = tx.clone();
                tokio::spawn(async move {
                    for n in 0..25 {
                        tx.log(LogEvent::new(LogLevel::Info, format!("{worker}-{n}")));
                    }
                })
            })
            .collect();
        drop(tx);
        for handle in handles {
            handle.await.unwrap();
        }

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 100);
        assert!(rx.is_disconnected());
    }
}
