use crate::error::{Result, TrackError};
use crate::merge::Fields;
use crate::scope::contribution::{Contribution, NormalizedContribution};
use crate::scope::snapshot::Snapshot;
use serde_json::Value;
use tracing::debug;

/// Resolution state of a [`Level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelState {
	Uninitialized,
	Resolved,
}

/// One tracking scope: its normalized contribution and latest snapshot.
#[derive(Debug, Clone)]
pub struct Level {
	contribution: NormalizedContribution,
	snapshot: Option<Snapshot>,
}

impl Level {
	/// Create an unresolved level. Deprecated aliases are folded here.
	pub fn new(contribution: Contribution) -> Self {
		Self {
			contribution: contribution.into(),
			snapshot: None,
		}
	}

	pub fn state(&self) -> LevelState {
		if self.snapshot.is_some() {
			LevelState::Resolved
		} else {
			LevelState::Uninitialized
		}
	}

	pub fn contribution(&self) -> &NormalizedContribution {
		&self.contribution
	}

	pub fn snapshot(&self) -> Option<&Snapshot> {
		self.snapshot.as_ref()
	}

	/// Resolve against `parent` (or the root snapshot), replacing any
	/// previous snapshot.
	pub fn resolve(&mut self, parent: Option<&Snapshot>) -> &Snapshot {
		let snapshot = match parent {
			Some(parent) => Snapshot::resolve(parent, &self.contribution),
			None => Snapshot::resolve(&Snapshot::root(), &self.contribution),
		};
		self.snapshot.insert(snapshot)
	}

	/// Swap in a new contribution and re-resolve against `parent`.
	pub fn update(&mut self, contribution: Contribution, parent: Option<&Snapshot>) -> &Snapshot {
		self.contribution = contribution.into();
		self.resolve(parent)
	}
}

/// An explicit stack of tracking scopes, outermost first.
///
/// Every level in the chain is resolved. Changing a level re-resolves it and
/// all of its descendants.
#[derive(Debug, Clone, Default)]
pub struct Chain {
	levels: Vec<Level>,
	root: Snapshot,
}

impl Chain {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a chain from contributions in parent-to-child order.
	pub fn from_contributions<I>(contributions: I) -> Self
	where
		I: IntoIterator<Item = Contribution>,
	{
		let mut chain = Self::new();
		for contribution in contributions {
			chain.push(contribution);
		}
		chain
	}

	pub fn len(&self) -> usize {
		self.levels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}

	pub fn levels(&self) -> &[Level] {
		&self.levels
	}

	/// Nest a new innermost scope and return its snapshot.
	pub fn push(&mut self, contribution: Contribution) -> &Snapshot {
		let mut level = Level::new(contribution);
		level.resolve(Some(self.snapshot()));
		debug!(depth = self.levels.len(), "pushed tracking scope");
		self.levels.push(level);
		self.snapshot()
	}

	/// Tear down the innermost scope.
	pub fn pop(&mut self) -> Option<Level> {
		self.levels.pop()
	}

	/// Replace the contribution at `depth` and re-resolve it and every
	/// scope nested below it.
	pub fn update(&mut self, depth: usize, contribution: Contribution) -> Result<&Snapshot> {
		if depth >= self.levels.len() {
			return Err(TrackError::LevelNotFound { depth });
		}

		let (ancestors, rest) = self.levels.split_at_mut(depth);
		let parent = ancestors.last().and_then(Level::snapshot);
		rest[0].update(contribution, parent);

		for index in depth + 1..self.levels.len() {
			let (ancestors, rest) = self.levels.split_at_mut(index);
			rest[0].resolve(ancestors.last().and_then(Level::snapshot));
		}
		debug!(depth, reresolved = self.levels.len() - depth, "updated tracking scope");

		Ok(self.snapshot_at(depth).unwrap_or(&self.root))
	}

	/// Snapshot of the innermost scope, or the root snapshot when empty.
	pub fn snapshot(&self) -> &Snapshot {
		self.levels
			.last()
			.and_then(Level::snapshot)
			.unwrap_or(&self.root)
	}

	pub fn snapshot_at(&self, depth: usize) -> Option<&Snapshot> {
		self.levels.get(depth).and_then(Level::snapshot)
	}

	/// Trigger through the innermost scope. With no scopes the event goes to
	/// the root snapshot's no-op sink.
	pub fn trigger(
		&self,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value> {
		self.snapshot().trigger(event, payload, options)
	}

	/// Trigger through the scope at `depth`, ignoring anything nested below it.
	pub fn trigger_at(
		&self,
		depth: usize,
		event: Option<&str>,
		payload: Option<&Fields>,
		options: Option<&Fields>,
	) -> Result<Value> {
		self.snapshot_at(depth)
			.ok_or(TrackError::LevelNotFound { depth })?
			.trigger(event, payload, options)
	}
}
