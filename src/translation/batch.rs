/*!
 * Batch planning.
 *
 * This module partitions a cue sequence into consecutive translation units. Each unit
 * owns a disjoint range of cues and may look at a few neighbours on either side for
 * context. Planning works on index ranges so the orchestrator can borrow the cues for
 * rendering and later mutate exactly the owned range.
 */

use log::debug;
use std::ops::Range;

use crate::subtitle_processor::Cue;

/// Index ranges describing one batch within the full cue sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSpan {
    /// Position of the batch in the plan, from 0
    pub index: usize,

    /// Cues translated by this batch
    pub items: Range<usize>,

    /// Neighbours immediately before `items`
    pub leading_context: Range<usize>,

    /// Neighbours immediately after `items`
    pub trailing_context: Range<usize>,
}

impl BatchSpan {
    /// Number of cues this batch translates
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for a batch without items (never produced by the planner)
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrow the cues this span refers to
    pub fn view<'a>(&self, cues: &'a [Cue]) -> Batch<'a> {
        Batch {
            index: self.index,
            items: &cues[self.items.clone()],
            leading_context: &cues[self.leading_context.clone()],
            trailing_context: &cues[self.trailing_context.clone()],
            range: self.items.clone(),
        }
    }
}

/// A batch of cues with its read-only context
#[derive(Debug, Clone)]
pub struct Batch<'a> {
    /// Position of the batch in the plan, from 0
    pub index: usize,

    /// Cues to translate, never empty
    pub items: &'a [Cue],

    /// Cues shown before the items, never translated by this batch
    pub leading_context: &'a [Cue],

    /// Cues shown after the items, never translated by this batch
    pub trailing_context: &'a [Cue],

    /// Positions of `items` within the full sequence
    pub range: Range<usize>,
}

/// Planner for fixed-size batches with bounded context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlanner {
    /// Maximum cues per batch
    batch_size: usize,

    /// Maximum context cues on each side
    context_size: usize,
}

impl BatchPlanner {
    /// Create a planner; a batch size of 0 is treated as 1
    pub fn new(batch_size: usize, context_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            context_size,
        }
    }

    /// Effective batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Effective context size
    pub fn context_size(&self) -> usize {
        self.context_size
    }

    /// Plan spans for a sequence of `total` cues
    ///
    /// Chunks are consecutive and non-overlapping; only the last may be shorter than the
    /// batch size. Context windows are clamped to the sequence bounds and never overlap
    /// the chunk itself. An empty sequence yields an empty plan.
    pub fn spans(&self, total: usize) -> Vec<BatchSpan> {
        let mut spans = Vec::with_capacity(total.div_ceil(self.batch_size));

        let mut start = 0;
        while start < total {
            let end = (start + self.batch_size).min(total);
            spans.push(BatchSpan {
                index: spans.len(),
                items: start..end,
                leading_context: start.saturating_sub(self.context_size)..start,
                trailing_context: end..(end + self.context_size).min(total),
            });
            start = end;
        }

        debug!("Planned {} batches for {} cues (batch size {}, context {})",
               spans.len(), total, self.batch_size, self.context_size);
        spans
    }

    /// Plan batches borrowing from `cues`
    pub fn plan<'a>(&self, cues: &'a [Cue]) -> Vec<Batch<'a>> {
        self.spans(cues.len())
            .iter()
            .map(|span| span.view(cues))
            .collect()
    }
}

/// Plan batches for `cues`, see [`BatchPlanner::spans`]
pub fn plan(cues: &[Cue], batch_size: usize, context_size: usize) -> Vec<Batch<'_>> {
    BatchPlanner::new(batch_size, context_size).plan(cues)
}
