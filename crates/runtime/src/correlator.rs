//! Request/response correlation for outbound commands.
//!
//! Every command that expects a reply gets a [`CorrelationId`] and a
//! [`Continuation`]. The continuation runs exactly once: on the matching
//! reply, on a matching error, or when the session is torn down.
//!
//! # Message Flow
//!
//! 1. Caller issues a command; the correlator allocates an id and stores the
//!    continuation
//! 2. The id is stamped on the outbound message (`requestId`)
//! 3. The receiver replies with the same `requestId`
//! 4. The channel layer resolves the id; the continuation fires
//! 5. Late or duplicate replies find no entry and are logged and dropped

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{Error, Result};

/// Opaque token identifying one outstanding command.
///
/// Ids start at 1: `requestId: 0` is reserved on the wire for unsolicited
/// pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CorrelationId(u64);

impl CorrelationId {
	pub const fn new(id: u64) -> Self {
		Self(id)
	}

	pub const fn as_u64(self) -> u64 {
		self.0
	}
}

impl From<u64> for CorrelationId {
	fn from(id: u64) -> Self {
		Self(id)
	}
}

impl fmt::Display for CorrelationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Which capability issued a command. Used for logging and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
	Connect,
	Launch,
	Join,
	Media,
	Volume,
	App,
}

/// Single-shot callback receiving the command outcome.
pub type Continuation = Box<dyn FnOnce(Result<Value>) + Send>;

/// One outstanding command.
pub struct PendingCommand {
	id: CorrelationId,
	kind: CommandKind,
	namespace: Option<Arc<str>>,
	issued_at: Instant,
	continuation: Continuation,
}

impl PendingCommand {
	pub fn id(&self) -> CorrelationId {
		self.id
	}

	pub fn kind(&self) -> CommandKind {
		self.kind
	}

	/// Channel the command was sent on, if it was channel traffic.
	pub fn namespace(&self) -> Option<&str> {
		self.namespace.as_deref()
	}

	pub fn elapsed(&self) -> Duration {
		self.issued_at.elapsed()
	}

	/// Consumes the command and runs its continuation.
	fn resolve(self, result: Result<Value>) {
		tracing::debug!(
			id = %self.id,
			kind = ?self.kind,
			ok = result.is_ok(),
			elapsed = ?self.issued_at.elapsed(),
			"Resolving command"
		);
		(self.continuation)(result);
	}
}

impl fmt::Debug for PendingCommand {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingCommand")
			.field("id", &self.id)
			.field("kind", &self.kind)
			.field("namespace", &self.namespace)
			.field("issued_at", &self.issued_at)
			.finish_non_exhaustive()
	}
}

/// Table of pending commands keyed by correlation id.
pub struct Correlator {
	next_id: u64,
	pending: HashMap<CorrelationId, PendingCommand>,
}

impl Default for Correlator {
	fn default() -> Self {
		Self::new()
	}
}

impl Correlator {
	pub fn new() -> Self {
		Self {
			next_id: 1,
			pending: HashMap::new(),
		}
	}

	/// Registers a command and returns its fresh correlation id.
	///
	/// The id never collides with a currently pending one, even after the
	/// counter wraps.
	pub fn issue(
		&mut self,
		kind: CommandKind,
		namespace: Option<Arc<str>>,
		continuation: Continuation,
	) -> CorrelationId {
		let id = self.allocate();
		tracing::debug!(%id, ?kind, namespace = namespace.as_deref(), "Issuing command");
		self.pending.insert(
			id,
			PendingCommand {
				id,
				kind,
				namespace,
				issued_at: Instant::now(),
				continuation,
			},
		);
		id
	}

	/// Registers a command with separate success and failure continuations.
	pub fn issue_with<S, F>(
		&mut self,
		kind: CommandKind,
		namespace: Option<Arc<str>>,
		on_success: S,
		on_failure: F,
	) -> CorrelationId
	where
		S: FnOnce(Value) + Send + 'static,
		F: FnOnce(Error) + Send + 'static,
	{
		self.issue(
			kind,
			namespace,
			Box::new(move |result| match result {
				Ok(value) => on_success(value),
				Err(err) => on_failure(err),
			}),
		)
	}

	fn allocate(&mut self) -> CorrelationId {
		loop {
			let id = CorrelationId(self.next_id);
			self.next_id = self.next_id.checked_add(1).unwrap_or(1);
			if !self.pending.contains_key(&id) {
				return id;
			}
		}
	}

	/// Resolves a pending command with a successful reply.
	///
	/// Returns false (and logs) if the id is unknown or already resolved.
	pub fn resolve_success(&mut self, id: CorrelationId, value: Value) -> bool {
		self.resolve(id, Ok(value))
	}

	/// Resolves a pending command with an error.
	///
	/// Returns false (and logs) if the id is unknown or already resolved.
	pub fn resolve_failure(&mut self, id: CorrelationId, error: Error) -> bool {
		self.resolve(id, Err(error))
	}

	pub fn resolve(&mut self, id: CorrelationId, result: Result<Value>) -> bool {
		match self.pending.remove(&id) {
			Some(command) => {
				command.resolve(result);
				true
			}
			None => {
				tracing::warn!(%id, "Reply for unknown or already resolved command (ignored)");
				false
			}
		}
	}

	/// Fails every pending command sent on `namespace` with `error`.
	///
	/// Returns the number of commands resolved.
	pub fn cancel_namespace(&mut self, namespace: &str, error: Error) -> usize {
		let ids: Vec<CorrelationId> = self
			.pending
			.values()
			.filter(|command| command.namespace() == Some(namespace))
			.map(PendingCommand::id)
			.collect();

		for id in &ids {
			if let Some(command) = self.pending.remove(id) {
				command.resolve(Err(error.clone()));
			}
		}
		ids.len()
	}

	/// Fails every pending command with `error` and clears the table.
	///
	/// Returns the number of commands resolved.
	pub fn cancel_all(&mut self, error: Error) -> usize {
		let drained: Vec<PendingCommand> = self.pending.drain().map(|(_, command)| command).collect();
		let count = drained.len();
		for command in drained {
			command.resolve(Err(error.clone()));
		}
		if count > 0 {
			tracing::debug!(count, %error, "Cancelled pending commands");
		}
		count
	}

	pub fn is_pending(&self, id: CorrelationId) -> bool {
		self.pending.contains_key(&id)
	}

	pub fn kind_of(&self, id: CorrelationId) -> Option<CommandKind> {
		self.pending.get(&id).map(PendingCommand::kind)
	}

	pub fn len(&self) -> usize {
		self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}
}

/// Future resolving to the outcome of one issued command.
///
/// If the continuation is dropped without running (the session itself was
/// dropped) the future resolves to [`Error::SessionTerminated`].
#[derive(Debug)]
pub struct ResponseFuture {
	rx: oneshot::Receiver<Result<Value>>,
}

impl Future for ResponseFuture {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Ready(result) => Poll::Ready(result.unwrap_or(Err(Error::SessionTerminated))),
			Poll::Pending => Poll::Pending,
		}
	}
}

/// Creates a continuation that forwards its outcome to the returned future.
pub fn response_channel() -> (Continuation, ResponseFuture) {
	let (tx, rx) = oneshot::channel();
	let continuation: Continuation = Box::new(move |result| {
		let _ = tx.send(result);
	});
	(continuation, ResponseFuture { rx })
}
