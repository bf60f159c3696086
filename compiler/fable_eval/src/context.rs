//! The evaluation context stack.
//!
//! Two facts need to be visible to arbitrarily deep descendants without
//! threading extra parameters: which node is the innermost lambda-promotion
//! candidate, and which generator instances are mid-invocation (for the
//! re-entrancy check). Frames are pushed and popped around the evaluation
//! they scope.

use fable_ir::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ContextFrame {
    /// The node a failed name lookup below it promotes into a lambda.
    LambdaCandidate(NodeId),
    /// Identity of a generator instance currently executing.
    ActiveGenerator(usize),
}

#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    frames: Vec<ContextFrame>,
}

impl ContextStack {
    pub(crate) fn push(&mut self, frame: ContextFrame) {
        self.frames.push(frame);
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    /// The innermost lambda-promotion candidate, if any marker is live.
    pub(crate) fn innermost_candidate(&self) -> Option<NodeId> {
        self.frames.iter().rev().find_map(|frame| match frame {
            ContextFrame::LambdaCandidate(id) => Some(*id),
            ContextFrame::ActiveGenerator(_) => None,
        })
    }

    /// Is the generator with this identity already executing?
    pub(crate) fn generator_active(&self, address: usize) -> bool {
        self.frames
            .contains(&ContextFrame::ActiveGenerator(address))
    }
}
