use crate::shutdown::ShutdownHandle;
use crate::tui::TuiMsg;
use crossterm::event;
use std::time::Duration;
use tokio::{
    sync::{broadcast::error::TryRecvError, mpsc},
    task::JoinHandle,
    time,
};

// How long a blocked terminal read may delay shutdown.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Start the terminal input reader and the UI tick. Both stop on the
/// shutdown signal or once the UI loop drops its receiver.
pub fn spawn_tui_feeders(
    tx: mpsc::Sender<TuiMsg>,
    shutdown: &ShutdownHandle,
    tick: Duration,
) -> Vec<JoinHandle<()>> {
    let tx_in = tx.clone();
    let mut shutdown_input = shutdown.subscribe();
    let input = tokio::task::spawn_blocking(move || {
        loop {
            if !matches!(shutdown_input.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }
            match event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    let _ = tx_in.blocking_send(TuiMsg::OpError(format!("input: {e}")));
                    break;
                }
            }
            let msg = match event::read() {
                Ok(ev) => TuiMsg::InputEvent(ev),
                Err(e) => TuiMsg::OpError(format!("input: {e}")),
            };
            if tx_in.blocking_send(msg).is_err() {
                break;
            }
        }
    });

    let mut shutdown_tick = shutdown.subscribe();
    let ticker = tokio::spawn(async move {
        let mut interval = time::interval(tick);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = shutdown_tick.recv() => break,
                _ = interval.tick() => {
                    if tx.is_closed() {
                        break;
                    }
                    // A full mailbox just skips this frame.
                    let _ = tx.try_send(TuiMsg::Tick);
                }
            }
        }
    });

    vec![input, ticker]
}
