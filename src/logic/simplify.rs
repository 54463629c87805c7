//! # Smart AND / OR Constructors
//!
//! The only legal way to build conjunctions and disjunctions. Each
//! constructor applies a fixed sequence of algebraic laws — identity,
//! idempotent, absorption, and a recursive descent into same-operator
//! operands — and marks the surviving node as optimised when a law fired,
//! so later passes can recognise already-reduced subterms.
//!
//! The absent operand (`None`) is the identity element of both
//! constructors: it stands for "no requirement contributed" and the other
//! side is returned unchanged. Absorption checks see through `Grouping`
//! wrappers so `(A AND B) OR A` still collapses to `A`.
//!
//! YAML-gated function nodes are never dropped here: whether such a branch
//! disappears depends on the live options, which makes it an
//! evaluation-time decision.

use std::sync::Arc;

use super::Logic;

/// Disjunction constructor.
pub fn or<'a>(
    left: Option<Arc<Logic<'a>>>,
    right: Option<Arc<Logic<'a>>>,
) -> Option<Arc<Logic<'a>>> {
    match (left, right) {
        // Identity law.
        (None, other) | (other, None) => other,
        (Some(left), Some(right)) => Some(or_nodes(left, right)),
    }
}

/// Conjunction constructor.
pub fn and<'a>(
    left: Option<Arc<Logic<'a>>>,
    right: Option<Arc<Logic<'a>>>,
) -> Option<Arc<Logic<'a>>> {
    match (left, right) {
        // Identity law.
        (None, other) | (other, None) => other,
        (Some(left), Some(right)) => Some(and_nodes(left, right)),
    }
}

fn or_nodes<'a>(left: Arc<Logic<'a>>, right: Arc<Logic<'a>>) -> Arc<Logic<'a>> {
    // Idempotent: A OR A = A.
    if left == right {
        left.mark_optimised();
        return left;
    }

    // Absorption into an existing OR: (A OR B) OR A = A OR B.
    if let Some((a, b)) = left.as_or() {
        if *a == right || *b == right {
            left.mark_optimised();
            return left;
        }
    }
    if let Some((a, b)) = right.as_or() {
        if *a == left || *b == left {
            right.mark_optimised();
            return right;
        }
    }

    // Absorption: (A AND B) OR A = A.
    if let Some((a, b)) = left.as_and() {
        if *a == right || *b == right {
            right.mark_optimised();
            return right;
        }
    }
    if let Some((a, b)) = right.as_and() {
        if *a == left || *b == left {
            left.mark_optimised();
            return left;
        }
    }

    // Recursive descent: re-associate one operand at a time and keep the
    // result only when a deeper law actually fired.
    if let Some((a, b)) = left.as_or() {
        let (a, b) = (a.clone(), b.clone());
        let inner = or_nodes(b.clone(), right.clone());
        if inner.is_optimised() {
            let node = Logic::raw_or(a, inner);
            node.mark_optimised();
            return node;
        }
        let inner = or_nodes(a, right.clone());
        if inner.is_optimised() {
            let node = Logic::raw_or(b, inner);
            node.mark_optimised();
            return node;
        }
    }
    if let Some((c, d)) = right.as_or() {
        let (c, d) = (c.clone(), d.clone());
        let inner = or_nodes(left.clone(), d.clone());
        if inner.is_optimised() {
            let node = Logic::raw_or(c, inner);
            node.mark_optimised();
            return node;
        }
        let inner = or_nodes(left.clone(), c);
        if inner.is_optimised() {
            let node = Logic::raw_or(d, inner);
            node.mark_optimised();
            return node;
        }
    }

    Logic::raw_or(left, right)
}

fn and_nodes<'a>(left: Arc<Logic<'a>>, right: Arc<Logic<'a>>) -> Arc<Logic<'a>> {
    // Idempotent: A AND A = A.
    if left == right {
        left.mark_optimised();
        return left;
    }

    // Absorption into an existing AND: (A AND B) AND A = A AND B.
    if let Some((a, b)) = left.as_and() {
        if *a == right || *b == right {
            left.mark_optimised();
            return left;
        }
    }
    if let Some((a, b)) = right.as_and() {
        if *a == left || *b == left {
            right.mark_optimised();
            return right;
        }
    }

    // Absorption: (A OR B) AND A = A.
    if let Some((a, b)) = left.as_or() {
        if *a == right || *b == right {
            right.mark_optimised();
            return right;
        }
    }
    if let Some((a, b)) = right.as_or() {
        if *a == left || *b == left {
            left.mark_optimised();
            return left;
        }
    }

    // Recursive descent, mirroring `or_nodes`.
    if let Some((a, b)) = left.as_and() {
        let (a, b) = (a.clone(), b.clone());
        let inner = and_nodes(b.clone(), right.clone());
        if inner.is_optimised() {
            let node = Logic::raw_and(a, inner);
            node.mark_optimised();
            return node;
        }
        let inner = and_nodes(a, right.clone());
        if inner.is_optimised() {
            let node = Logic::raw_and(b, inner);
            node.mark_optimised();
            return node;
        }
    }
    if let Some((c, d)) = right.as_and() {
        let (c, d) = (c.clone(), d.clone());
        let inner = and_nodes(left.clone(), d.clone());
        if inner.is_optimised() {
            let node = Logic::raw_and(c, inner);
            node.mark_optimised();
            return node;
        }
        let inner = and_nodes(left.clone(), c);
        if inner.is_optimised() {
            let node = Logic::raw_and(d, inner);
            node.mark_optimised();
            return node;
        }
    }

    Logic::raw_and(left, right)
}
