//! Scope tracking for clause ordering and alias visibility.
//!
//! A [`ScopeTracker`] is a stack of [`ScopeFrame`]s. The parser and the
//! validator push a frame when they enter a statement, a UNION branch or a
//! subquery body and pop it on the way out. Reads and writes always target
//! the top frame, and a popped frame is dropped without touching its parent,
//! so nothing recorded inside a subquery is visible outside it or vice versa.

use std::collections::BTreeSet;

use smol_str::SmolStr;

use crate::ast::ClauseKind;
use crate::dialect::OrderState;

/// Kind of nesting level a frame represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// A top-level statement or one of its UNION branches.
    Statement,
    /// The body of `EXISTS { }` or `CALL { }`.
    Subquery,
}

/// Ordering and alias state local to one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame {
    pub kind: ScopeKind,
    clauses: Vec<ClauseKind>,
    ordering: OrderState,
    visible: BTreeSet<SmolStr>,
}

impl ScopeFrame {
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            clauses: Vec::new(),
            ordering: OrderState::Start,
            visible: BTreeSet::new(),
        }
    }

    /// Clause kinds observed at this level, in source order.
    pub fn clauses(&self) -> &[ClauseKind] {
        &self.clauses
    }

    pub fn ordering(&self) -> OrderState {
        self.ordering
    }

    pub fn visible(&self) -> &BTreeSet<SmolStr> {
        &self.visible
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.visible.contains(name)
    }
}

/// Stack of scope frames for one parse invocation.
#[derive(Debug, Clone, Default)]
pub struct ScopeTracker {
    frames: Vec<ScopeFrame>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a new nesting level.
    pub fn push(&mut self, kind: ScopeKind) {
        tracing::trace!(?kind, depth = self.frames.len() + 1, "push scope");
        self.frames.push(ScopeFrame::new(kind));
    }

    /// Leaves the current nesting level, discarding its frame.
    pub fn pop(&mut self) -> Option<ScopeFrame> {
        let frame = self.frames.pop();
        tracing::trace!(depth = self.frames.len(), "pop scope");
        frame
    }

    pub fn current_frame(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut ScopeFrame> {
        self.frames.last_mut()
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// True when the current frame is nested inside another frame.
    pub fn is_nested(&self) -> bool {
        self.frames.len() > 1
    }

    /// Appends a clause kind to the current frame's sequence.
    pub fn record_clause(&mut self, kind: ClauseKind) {
        if let Some(frame) = self.frames.last_mut() {
            frame.clauses.push(kind);
        }
    }

    /// Moves the current frame to a new ordering state.
    pub fn set_ordering(&mut self, state: OrderState) {
        if let Some(frame) = self.frames.last_mut() {
            frame.ordering = state;
        }
    }

    /// Adds a binding to the current frame's visible set.
    pub fn bind(&mut self, name: SmolStr) {
        if let Some(frame) = self.frames.last_mut() {
            frame.visible.insert(name);
        }
    }

    /// Replaces the current frame's visible set, as a projection does.
    pub fn replace_visible(&mut self, names: BTreeSet<SmolStr>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.visible = names;
        }
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.current_frame()
            .is_some_and(|frame| frame.is_visible(name))
    }
}
