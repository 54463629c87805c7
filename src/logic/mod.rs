//! # Logic Expression DAG
//!
//! Tagged nodes representing a parsed `requires` expression. Children are
//! `Arc`-shared: the simplifier rewrites by re-pointing at existing
//! subterms, so the structure is a DAG rather than a tree. Nodes are
//! immutable after construction except for the one-shot `optimised` flag,
//! which is a hint the simplifier sets when a rewrite law fired.
//!
//! Name and number operands are slices of the source text (ultimately the
//! decoded world-data strings); integers are parsed on demand.
//!
//! AND / OR nodes must be built through the smart constructors in
//! [`simplify`] — they are the rewrite system, and the evaluator relies on
//! observationally equal nodes being structurally equal after construction.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod simplify;

/// One node of the expression DAG.
#[derive(Debug)]
pub struct Logic<'a> {
    kind: LogicKind<'a>,
    optimised: AtomicBool,
}

/// The ten expression variants.
#[derive(Debug)]
pub enum LogicKind<'a> {
    /// Explicit parentheses, preserved so printing round-trips.
    Grouping(Arc<Logic<'a>>),
    /// Binary conjunction.
    And(Arc<Logic<'a>>, Arc<Logic<'a>>),
    /// Binary disjunction.
    Or(Arc<Logic<'a>>, Arc<Logic<'a>>),
    /// Player holds at least one of the named item.
    Item(&'a str),
    /// Player holds at least one item in the named category.
    Category(&'a str),
    /// Player holds at least `count` of the named item.
    ItemCount(&'a str, &'a str),
    /// Player holds at least `count` items across the named category.
    CategoryCount(&'a str, &'a str),
    /// Held share of the item's total supply reaches `percent`/100.
    ItemPercent(&'a str, &'a str),
    /// Held share of the category's total supply reaches `percent`/100.
    CategoryPercent(&'a str, &'a str),
    /// Built-in call; the argument list is carried unparsed.
    Function(&'a str, &'a str),
}

impl<'a> Logic<'a> {
    fn new(kind: LogicKind<'a>) -> Arc<Self> {
        Arc::new(Logic {
            kind,
            optimised: AtomicBool::new(false),
        })
    }

    pub fn grouping(child: Arc<Logic<'a>>) -> Arc<Self> {
        Self::new(LogicKind::Grouping(child))
    }

    pub fn item(name: &'a str) -> Arc<Self> {
        Self::new(LogicKind::Item(name))
    }

    pub fn category(name: &'a str) -> Arc<Self> {
        Self::new(LogicKind::Category(name))
    }

    pub fn item_count(name: &'a str, count: &'a str) -> Arc<Self> {
        Self::new(LogicKind::ItemCount(name, count))
    }

    pub fn category_count(name: &'a str, count: &'a str) -> Arc<Self> {
        Self::new(LogicKind::CategoryCount(name, count))
    }

    pub fn item_percent(name: &'a str, percent: &'a str) -> Arc<Self> {
        Self::new(LogicKind::ItemPercent(name, percent))
    }

    pub fn category_percent(name: &'a str, percent: &'a str) -> Arc<Self> {
        Self::new(LogicKind::CategoryPercent(name, percent))
    }

    pub fn function(name: &'a str, args: &'a str) -> Arc<Self> {
        Self::new(LogicKind::Function(name, args))
    }

    // Bypasses the rewrite system; the simplifier is the only caller.
    pub(crate) fn raw_and(left: Arc<Logic<'a>>, right: Arc<Logic<'a>>) -> Arc<Self> {
        Self::new(LogicKind::And(left, right))
    }

    pub(crate) fn raw_or(left: Arc<Logic<'a>>, right: Arc<Logic<'a>>) -> Arc<Self> {
        Self::new(LogicKind::Or(left, right))
    }

    pub fn kind(&self) -> &LogicKind<'a> {
        &self.kind
    }

    /// Whether a simplifier law has fired on this node.
    pub fn is_optimised(&self) -> bool {
        self.optimised.load(Ordering::Relaxed)
    }

    /// One-shot, set-once hint; safe under shared observation because the
    /// value only steers later simplifier passes.
    pub(crate) fn mark_optimised(&self) {
        self.optimised.store(true, Ordering::Relaxed);
    }

    /// View this node as a conjunction, seeing through `Grouping` wrappers.
    pub(crate) fn as_and(&self) -> Option<(&Arc<Logic<'a>>, &Arc<Logic<'a>>)> {
        match &self.kind {
            LogicKind::And(left, right) => Some((left, right)),
            LogicKind::Grouping(inner) => inner.as_and(),
            _ => None,
        }
    }

    /// View this node as a disjunction, seeing through `Grouping` wrappers.
    pub(crate) fn as_or(&self) -> Option<(&Arc<Logic<'a>>, &Arc<Logic<'a>>)> {
        match &self.kind {
            LogicKind::Or(left, right) => Some((left, right)),
            LogicKind::Grouping(inner) => inner.as_or(),
            _ => None,
        }
    }

    /// Whether this node is a call to one of the YAML-gating builtins.
    /// The evaluator short-circuits AND/OR around such residuals.
    pub fn is_yaml_function(&self) -> bool {
        matches!(
            &self.kind,
            LogicKind::Function(name, _)
                if matches!(name.trim(), "YamlCompare" | "YamlEnabled" | "YamlDisabled")
        )
    }

    /// Render with leaves renamed `A..Z,a..z` (modulo 52) in
    /// first-occurrence order and caller-supplied infix operators.
    /// Groupings are re-inserted as parentheses.
    pub fn to_algebra(&self, and_op: &str, or_op: &str) -> String {
        let mut out = String::new();
        let mut leaves: Vec<&Logic<'a>> = Vec::new();
        self.write_algebra(&mut out, and_op, or_op, &mut leaves);
        out
    }

    fn write_algebra<'s>(
        &'s self,
        out: &mut String,
        and_op: &str,
        or_op: &str,
        leaves: &mut Vec<&'s Logic<'a>>,
    ) {
        match &self.kind {
            LogicKind::Grouping(inner) => {
                out.push('(');
                inner.write_algebra(out, and_op, or_op, leaves);
                out.push(')');
            }
            LogicKind::And(left, right) => {
                left.write_algebra(out, and_op, or_op, leaves);
                out.push_str(and_op);
                right.write_algebra(out, and_op, or_op, leaves);
            }
            LogicKind::Or(left, right) => {
                left.write_algebra(out, and_op, or_op, leaves);
                out.push_str(or_op);
                right.write_algebra(out, and_op, or_op, leaves);
            }
            _ => {
                let index = match leaves.iter().position(|seen| *seen == self) {
                    Some(index) => index,
                    None => {
                        leaves.push(self);
                        leaves.len() - 1
                    }
                };
                out.push(letter(index));
            }
        }
    }
}

/// Leaf letter for the boolean-algebra printer.
fn letter(index: usize) -> char {
    let index = index % 52;
    if index < 26 {
        char::from(b'A' + index as u8)
    } else {
        char::from(b'a' + (index - 26) as u8)
    }
}

/// Parse a numeric operand slice. Non-numeric text is 0; overflow
/// saturates to `u64::MAX`.
pub(crate) fn number(text: &str) -> u64 {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    text.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

impl PartialEq for Logic<'_> {
    /// Structural equality: variants must match and operands compare
    /// recursively. AND and OR are equal up to commutativity of their two
    /// direct operands, but not up to associativity — the simplifier is
    /// responsible for deeper rearrangements.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (&self.kind, &other.kind) {
            (LogicKind::Grouping(a), LogicKind::Grouping(b)) => a == b,
            (LogicKind::And(l, r), LogicKind::And(l2, r2))
            | (LogicKind::Or(l, r), LogicKind::Or(l2, r2)) => {
                (l == l2 && r == r2) || (l == r2 && r == l2)
            }
            (LogicKind::Item(a), LogicKind::Item(b))
            | (LogicKind::Category(a), LogicKind::Category(b)) => a == b,
            (LogicKind::ItemCount(a, n), LogicKind::ItemCount(b, m))
            | (LogicKind::CategoryCount(a, n), LogicKind::CategoryCount(b, m))
            | (LogicKind::ItemPercent(a, n), LogicKind::ItemPercent(b, m))
            | (LogicKind::CategoryPercent(a, n), LogicKind::CategoryPercent(b, m))
            | (LogicKind::Function(a, n), LogicKind::Function(b, m)) => a == b && n == m,
            _ => false,
        }
    }
}

impl Eq for Logic<'_> {}

impl fmt::Display for Logic<'_> {
    /// Canonical form; parsing the output yields an equal DAG.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LogicKind::Grouping(inner) => write!(f, "({inner})"),
            LogicKind::And(left, right) => write!(f, "{left} AND {right}"),
            LogicKind::Or(left, right) => write!(f, "{left} OR {right}"),
            LogicKind::Item(name) => write!(f, "|{name}|"),
            LogicKind::Category(name) => write!(f, "|@{name}|"),
            LogicKind::ItemCount(name, count) => write!(f, "|{name}:{count}|"),
            LogicKind::CategoryCount(name, count) => write!(f, "|@{name}:{count}|"),
            LogicKind::ItemPercent(name, percent) => write!(f, "|{name}:{percent}%|"),
            LogicKind::CategoryPercent(name, percent) => write!(f, "|@{name}:{percent}%|"),
            LogicKind::Function(name, args) => write!(f, "{{{name}({args})}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commutative_equality() {
        let a = Logic::item("a");
        let b = Logic::item("b");
        let left = Logic::raw_and(a.clone(), b.clone());
        let right = Logic::raw_and(b, a);
        assert_eq!(left, right);
    }

    #[test]
    fn test_variants_do_not_cross_compare() {
        assert_ne!(Logic::item("x"), Logic::category("x"));
        assert_ne!(Logic::item_count("x", "2"), Logic::item_percent("x", "2"));
    }

    #[test]
    fn test_grouping_is_not_transparent_for_equality() {
        let a = Logic::item("a");
        assert_ne!(Logic::grouping(a.clone()), a);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(number("42"), 42);
        assert_eq!(number(""), 0);
        assert_eq!(number("4x"), 0);
        assert_eq!(number("99999999999999999999999999"), u64::MAX);
    }

    #[test]
    fn test_canonical_display() {
        let node = Logic::raw_or(
            Logic::grouping(Logic::raw_and(Logic::item("a"), Logic::category("b"))),
            Logic::item_percent("coin", "50"),
        );
        assert_eq!(node.to_string(), "(|a| AND |@b|) OR |coin:50%|");
    }

    #[test]
    fn test_algebra_printer_letters() {
        let a = Logic::item("a");
        let node = Logic::raw_or(Logic::raw_and(a.clone(), Logic::item("b")), a);
        assert_eq!(node.to_algebra(" * ", " + "), "A * B + A");
    }
}
