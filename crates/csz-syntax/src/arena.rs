//! Node arena.

use crate::node::{NodeIndex, SyntaxData, SyntaxNode};
use csz_common::Span;

/// Flat storage for a parsed tree. Children refer to each other by [`NodeIndex`].
#[derive(Clone, Debug, Default)]
pub struct SyntaxArena {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, span: Span, data: SyntaxData) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode { span, data });
        idx
    }

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&SyntaxNode> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn data(&self, idx: NodeIndex) -> Option<&SyntaxData> {
        self.get(idx).map(|node| &node.data)
    }

    /// Span of `idx`, or [`Span::DUMMY`] for a missing index.
    #[inline]
    pub fn span(&self, idx: NodeIndex) -> Span {
        self.get(idx).map_or(Span::DUMMY, |node| node.span)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
