use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};

use crate::cache::precomputed::lookup_precomputed;
use crate::eval::program::build_request;
use crate::eval::protocol::{EngineMessage, EngineRequest};
use crate::foundation::core::{Seed, Tick};
use crate::foundation::error::{TraceryError, TraceryResult};
use crate::scene::model::Shape;

/// Tokens occupy 48 bits so a float-typed engine binding carries them
/// exactly; uniqueness among outstanding requests is still checked against
/// the registry when minting.
const TOKEN_MASK: u64 = (1 << 48) - 1;

/// The engine's warm-up import failure. An artifact of initialization
/// ordering (a program can reach the engine before its script library is
/// unpacked), not a real script fault, so it is suppressed rather than
/// surfaced.
const WARMUP_IMPORT_ERROR: &str = "ModuleNotFoundError: No module named 'tracery'";

/// The engine-facing half of the evaluation channel.
///
/// Hand this to the worker hosting the script engine: it pulls requests from
/// `requests` and reports `replies` (one result or error per program run,
/// plus the one-shot ready signal).
pub struct EngineChannel {
    /// Requests for the engine to execute, in send order.
    pub requests: mpsc::Receiver<EngineRequest>,
    /// The engine's reply channel.
    pub replies: mpsc::Sender<EngineMessage>,
}

/// Dispatches evaluation requests to the script engine and correlates each
/// response back to its caller by token.
///
/// Many evaluations may be outstanding at once; completion order follows
/// response arrival, which is not guaranteed to match request order. There is
/// no cancellation: a superseded request still completes, and callers discard
/// stale results (see [`crate::Session`]).
pub struct Dispatcher {
    to_engine: mpsc::Sender<EngineRequest>,
    shared: Arc<Shared>,
}

struct Shared {
    pending: Mutex<HashMap<u64, mpsc::Sender<TraceryResult<Shape>>>>,
    ready: Mutex<ReadyGate>,
    token_seq: AtomicU64,
}

#[derive(Default)]
struct ReadyGate {
    fired: bool,
    callbacks: Vec<Box<dyn FnOnce() + Send>>,
}

impl Dispatcher {
    /// Create a dispatcher and the engine-facing half of its channel.
    ///
    /// A router thread takes ownership of the reply stream; it exits when the
    /// engine drops its side, failing whatever is still outstanding.
    pub fn connect() -> (Self, EngineChannel) {
        let (req_tx, req_rx) = mpsc::channel::<EngineRequest>();
        let (reply_tx, reply_rx) = mpsc::channel::<EngineMessage>();

        let shared = Arc::new(Shared {
            pending: Mutex::new(HashMap::new()),
            ready: Mutex::new(ReadyGate::default()),
            token_seq: AtomicU64::new(0),
        });

        let router_shared = Arc::clone(&shared);
        std::thread::spawn(move || route(router_shared, reply_rx));

        (
            Self {
                to_engine: req_tx,
                shared,
            },
            EngineChannel {
                requests: req_rx,
                replies: reply_tx,
            },
        )
    }

    /// Register a callback for engine readiness.
    ///
    /// Fires exactly once, the first time the engine signals it has finished
    /// loading; a callback registered after that point runs immediately on
    /// the caller's thread.
    pub fn on_ready(&self, callback: impl FnOnce() + Send + 'static) {
        let mut gate = lock(&self.shared.ready);
        if gate.fired {
            drop(gate);
            callback();
        } else {
            gate.callbacks.push(Box::new(callback));
        }
    }

    /// Whether the engine has signalled readiness.
    pub fn is_ready(&self) -> bool {
        lock(&self.shared.ready).fired
    }

    /// Evaluate `source` under `seed` (and optional `tick`), resolving to a
    /// scene value or an error.
    ///
    /// Precomputed inputs resolve immediately without touching the engine.
    /// Otherwise the request is sent to the engine; requests sent before the
    /// engine is ready queue in the channel rather than failing. A
    /// disconnected engine fails the evaluation with
    /// [`TraceryError::Backend`].
    #[tracing::instrument(skip(self, source), fields(len = source.len()))]
    pub fn evaluate(&self, source: &str, seed: Seed, tick: Option<Tick>) -> Evaluation {
        if let Some(hit) = lookup_precomputed(source, seed) {
            tracing::debug!("precomputed table hit");
            return Evaluation::settled(Ok(hit));
        }

        let (reply_tx, reply_rx) = mpsc::channel();
        let token = {
            let mut pending = lock(&self.shared.pending);
            let token = self.mint_token(&pending);
            pending.insert(token, reply_tx);
            token
        };

        let request = build_request(source, seed, tick, token);
        if self.to_engine.send(request).is_err() {
            lock(&self.shared.pending).remove(&token);
            return Evaluation::settled(Err(TraceryError::backend(
                "engine channel disconnected",
            )));
        }

        Evaluation::waiting(reply_rx)
    }

    /// Mint a token unique among outstanding requests. The sequence counter
    /// guarantees distinct mixer inputs; the registry check closes the
    /// masked-collision gap.
    fn mint_token(&self, pending: &HashMap<u64, mpsc::Sender<TraceryResult<Shape>>>) -> u64 {
        loop {
            let seq = self.shared.token_seq.fetch_add(1, Ordering::Relaxed);
            let token = splitmix64(seq) & TOKEN_MASK;
            if !pending.contains_key(&token) {
                return token;
            }
        }
    }
}

/// A single evaluation's completion handle. Yields its outcome exactly once.
pub struct Evaluation {
    state: EvalState,
}

enum EvalState {
    Settled(Option<TraceryResult<Shape>>),
    Waiting(mpsc::Receiver<TraceryResult<Shape>>),
}

impl Evaluation {
    fn settled(outcome: TraceryResult<Shape>) -> Self {
        Self {
            state: EvalState::Settled(Some(outcome)),
        }
    }

    fn waiting(rx: mpsc::Receiver<TraceryResult<Shape>>) -> Self {
        Self {
            state: EvalState::Waiting(rx),
        }
    }

    /// Block until the evaluation resolves.
    pub fn wait(self) -> TraceryResult<Shape> {
        match self.state {
            EvalState::Settled(outcome) => outcome.unwrap_or_else(|| {
                Err(TraceryError::evaluation("evaluation outcome already taken"))
            }),
            EvalState::Waiting(rx) => rx.recv().unwrap_or_else(|_| {
                Err(TraceryError::backend("dispatcher shut down mid-request"))
            }),
        }
    }

    /// Poll for the outcome without blocking.
    ///
    /// Returns `Some` exactly once when the evaluation has resolved, then
    /// `None` forever after; `None` before resolution means try again later.
    pub fn try_take(&mut self) -> Option<TraceryResult<Shape>> {
        match &mut self.state {
            EvalState::Settled(outcome) => outcome.take(),
            EvalState::Waiting(rx) => {
                let outcome = match rx.try_recv() {
                    Ok(outcome) => outcome,
                    Err(mpsc::TryRecvError::Empty) => return None,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        Err(TraceryError::backend("dispatcher shut down mid-request"))
                    }
                };
                self.state = EvalState::Settled(None);
                Some(outcome)
            }
        }
    }
}

/// Router loop: owns the engine's reply stream and settles pending requests.
fn route(shared: Arc<Shared>, replies: mpsc::Receiver<EngineMessage>) {
    while let Ok(message) = replies.recv() {
        match message {
            EngineMessage::Ready => fire_ready(&shared),
            EngineMessage::Results { token, value } => {
                let slot = lock(&shared.pending).remove(&token);
                match slot {
                    Some(slot) => {
                        let _ = slot.send(decode_scene(value));
                    }
                    // Superseded or unknown token: the caller stopped
                    // listening, drop the result.
                    None => tracing::debug!(token, "no listener for engine result"),
                }
            }
            EngineMessage::Error { message } => {
                if message.contains(WARMUP_IMPORT_ERROR) {
                    tracing::debug!("suppressing engine warm-up import failure");
                    continue;
                }
                // The channel carries no per-request error tag, so the error
                // cannot be attributed more precisely than "some outstanding
                // request": fail them all rather than guess one.
                let slots: Vec<_> = lock(&shared.pending).drain().collect();
                for (_, slot) in slots {
                    let _ = slot.send(Err(TraceryError::evaluation(message.clone())));
                }
            }
        }
    }

    // Engine dropped its side: nothing outstanding can ever resolve.
    let slots: Vec<_> = lock(&shared.pending).drain().collect();
    for (_, slot) in slots {
        let _ = slot.send(Err(TraceryError::backend("engine channel closed")));
    }
}

fn fire_ready(shared: &Shared) {
    let callbacks = {
        let mut gate = lock(&shared.ready);
        if gate.fired {
            return;
        }
        gate.fired = true;
        std::mem::take(&mut gate.callbacks)
    };
    for callback in callbacks {
        callback();
    }
}

fn decode_scene(value: serde_json::Value) -> TraceryResult<Shape> {
    let shape: Shape = serde_json::from_value(value)
        .map_err(|e| TraceryError::serde(format!("scene value did not decode: {e}")))?;
    shape.validate()?;
    Ok(shape)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_fit_the_mask_and_diverge() {
        let a = splitmix64(0) & TOKEN_MASK;
        let b = splitmix64(1) & TOKEN_MASK;
        assert!(a <= TOKEN_MASK);
        assert!(b <= TOKEN_MASK);
        assert_ne!(a, b);
    }

    #[test]
    fn decode_rejects_invalid_scene_values() {
        let bad = serde_json::json!({"type": "rect", "x": 0});
        assert!(matches!(
            decode_scene(bad),
            Err(TraceryError::Serde(_))
        ));

        let degenerate = serde_json::json!({
            "type": "polygon", "cx": 0, "cy": 0, "r": 1, "sides": 2,
        });
        assert!(matches!(
            decode_scene(degenerate),
            Err(TraceryError::Validation(_))
        ));
    }
}
