//! Daemon process management
//!
//! Spawns the download daemon as a child process and owns its stdio:
//! - Requests are written to stdin and correlated with responses by id
//! - Unsolicited events are translated to [`ShellMessage`]s for the main loop
//! - stderr is drained into the trace log
//!
//! The reader tasks live on the Tokio runtime; the sync main loop only ever
//! sees channel messages.

use crate::config::BackendConfig;
use crate::services::async_bridge::ShellMessage;
use crate::services::backend::protocol::{
    decode_line, Incoming, LogPayload, Request, SplashPayload,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout, Command};
use tokio::sync::oneshot;

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value, String>>>>>;

/// Handle to a spawned daemon process
pub struct ProcessBackend {
    stdin: Arc<tokio::sync::Mutex<ChildStdin>>,
    pending: PendingMap,
    next_id: AtomicU64,
}

impl ProcessBackend {
    /// Spawn the daemon and wire its stdio to the bridge
    ///
    /// Must be called from within a Tokio runtime context.
    pub fn spawn(
        config: &BackendConfig,
        bridge_tx: std_mpsc::Sender<ShellMessage>,
    ) -> Result<Self, String> {
        tracing::info!("Spawning daemon: {} {:?}", config.command, config.args);

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);

        let mut process = cmd
            .spawn()
            .map_err(|e| format!("Failed to spawn daemon '{}': {}", config.command, e))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| "Failed to get daemon stdin".to_string())?;
        let stdout = BufReader::new(
            process
                .stdout
                .take()
                .ok_or_else(|| "Failed to get daemon stdout".to_string())?,
        );
        let stderr = process.stderr.take();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        Self::spawn_stdout_reader(stdout, pending.clone(), bridge_tx.clone());

        if let Some(stderr) = stderr {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!("daemon stderr: {}", line);
                }
            });
        }

        // Exit watcher owns the child; kill_on_drop covers shell shutdown
        let exit_tx = bridge_tx;
        tokio::spawn(async move {
            match process.wait().await {
                Ok(status) => {
                    tracing::warn!("Daemon exited with status {}", status);
                    let _ = exit_tx.send(ShellMessage::BackendExited {
                        code: status.code(),
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to wait on daemon: {}", e);
                    let _ = exit_tx.send(ShellMessage::BackendExited { code: None });
                }
            }
        });

        Ok(Self {
            stdin: Arc::new(tokio::sync::Mutex::new(stdin)),
            pending,
            next_id: AtomicU64::new(1),
        })
    }

    /// Read daemon stdout line by line, dispatching responses and events
    fn spawn_stdout_reader(
        stdout: BufReader<ChildStdout>,
        pending: PendingMap,
        bridge_tx: std_mpsc::Sender<ShellMessage>,
    ) {
        tokio::spawn(async move {
            let mut lines = stdout.lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match decode_line(&line) {
                            Ok(Incoming::Response(resp)) => {
                                let sender = {
                                    let mut pending = match pending.lock() {
                                        Ok(p) => p,
                                        Err(_) => break,
                                    };
                                    pending.remove(&resp.id)
                                };
                                if let Some(sender) = sender {
                                    let outcome = match resp.error {
                                        Some(err) => Err(err),
                                        None => Ok(resp.result.unwrap_or(Value::Null)),
                                    };
                                    let _ = sender.send(outcome);
                                } else {
                                    tracing::warn!(
                                        "Daemon response for unknown request id {}",
                                        resp.id
                                    );
                                }
                            }
                            Ok(Incoming::Event(frame)) => {
                                dispatch_event(&frame.event, frame.payload, &bridge_tx);
                            }
                            Err(e) => {
                                tracing::warn!("Undecodable daemon line: {} ({})", line, e);
                            }
                        }
                    }
                    Ok(None) => {
                        tracing::info!("Daemon stdout closed");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("Error reading daemon stdout: {}", e);
                        break;
                    }
                }
            }

            // Fail anything still waiting so callers do not hang
            if let Ok(mut pending) = pending.lock() {
                for (_, sender) in pending.drain() {
                    let _ = sender.send(Err("daemon channel closed".to_string()));
                }
            }
        });
    }

    /// Send a request and wait for the correlated response
    pub async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, String> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let request = Request::new(id, method, params);
        let line = request
            .encode()
            .map_err(|e| format!("Failed to encode request: {}", e))?;

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self
                .pending
                .lock()
                .map_err(|_| "pending map poisoned".to_string())?;
            pending.insert(id, tx);
        }

        let write_result = {
            let mut stdin = self.stdin.lock().await;
            match stdin.write_all(line.as_bytes()).await {
                Ok(()) => stdin.flush().await,
                Err(e) => Err(e),
            }
        };

        if let Err(e) = write_result {
            if let Ok(mut pending) = self.pending.lock() {
                pending.remove(&id);
            }
            return Err(format!("Failed to write to daemon stdin: {}", e));
        }

        tracing::trace!("Sent daemon request id={} method={}", id, method);

        rx.await
            .map_err(|_| "daemon channel closed".to_string())?
    }
}

/// Translate one daemon event frame into a bridge message
fn dispatch_event(event: &str, payload: Value, bridge_tx: &std_mpsc::Sender<ShellMessage>) {
    match event {
        "status" => match serde_json::from_value::<SplashPayload>(payload) {
            Ok(p) => {
                let _ = bridge_tx.send(ShellMessage::SplashStatus {
                    text: p.status,
                    can_skip: p.can_skip,
                    is_downloading: p.is_downloading,
                });
            }
            Err(e) => tracing::warn!("Bad status payload: {}", e),
        },
        "progress" => match serde_json::from_value::<SplashPayload>(payload) {
            Ok(p) => {
                let text = p.progress.unwrap_or(p.status);
                let _ = bridge_tx.send(ShellMessage::SplashProgress { text });
            }
            Err(e) => tracing::warn!("Bad progress payload: {}", e),
        },
        "finished" => {
            let _ = bridge_tx.send(ShellMessage::SplashFinished);
        }
        "log" => match serde_json::from_value::<LogPayload>(payload) {
            Ok(p) => {
                let _ = bridge_tx.send(ShellMessage::BackendLog { line: p.line });
            }
            Err(e) => tracing::warn!("Bad log payload: {}", e),
        },
        other => {
            tracing::debug!("Ignoring unknown daemon event: {}", other);
        }
    }
}
