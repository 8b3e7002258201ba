//! Interleaving of selector sequences.
//!
//! Given the chains `.a .b` and `.c .d`, an element matched by a selector
//! that combines both must have ancestors matching `.a` and `.c` in some
//! order. Weaving enumerates those orders:
//!
//! ```text
//! weave([[.a], [.c, .d]])  =>  [.a .c .d], [.c .a .d]
//! ```
//!
//! Ancestors joined by descendant combinators may interleave freely; groups
//! glued by `>`, `+` or `~` move as a unit; a compound that is a
//! superselector of one on the other side is merged with it instead of
//! being repeated.

use std::collections::VecDeque;

use crate::node::{Node, sequences_equal};
use crate::selector::{Combinator, CompoundSelector, SimpleSelector};
use crate::superselector::{Superselector, is_sequence_superselector};

/// A sequence in node form: selector and combinator nodes, leftmost first.
pub type Sequence = Vec<Node>;

/// Weave a path of sequences into every sequence consistent with all of
/// them.
///
/// The innermost compound of each path element stays innermost relative to
/// that element's ancestors; everything before it is [`subweave`]d into
/// the prefixes accumulated so far.
#[must_use]
pub fn weave(path: &[Sequence]) -> Vec<Sequence> {
    let mut prefixes: Vec<Sequence> = vec![Vec::new()];
    for current in path {
        let Some((last, init)) = current.split_last() else {
            continue;
        };
        prefixes = prefixes
            .iter()
            .flat_map(|prefix| {
                subweave(prefix, init).into_iter().map(move |mut sequence| {
                    sequence.push(last.clone());
                    sequence
                })
            })
            .collect();
    }
    prefixes
}

/// Every interleaving of two ancestor sequences.
///
/// Returns an empty list when the two cannot be combined, e.g. when their
/// leading combinators conflict or two compounds forced together by
/// combinators fail to unify.
#[must_use]
pub fn subweave(seq1: &[Node], seq2: &[Node]) -> Vec<Sequence> {
    if seq1.is_empty() {
        return vec![seq2.to_vec()];
    }
    if seq2.is_empty() {
        return vec![seq1.to_vec()];
    }

    let mut seq1: VecDeque<Node> = seq1.iter().cloned().collect();
    let mut seq2: VecDeque<Node> = seq2.iter().cloned().collect();
    let Some(init) = merge_initial_ops(&mut seq1, &mut seq2) else {
        return Vec::new();
    };
    let mut seq1: Sequence = seq1.into();
    let mut seq2: Sequence = seq2.into();
    let Some(fin) = merge_final_ops(&mut seq1, &mut seq2) else {
        return Vec::new();
    };

    let mut groups1 = group_selectors(seq1);
    let mut groups2 = group_selectors(seq2);
    let common = lcs(
        groups2.make_contiguous(),
        groups1.make_contiguous(),
        |from2, from1| {
            if sequences_equal(from2, from1, false) {
                return Some(from2.clone());
            }
            if !(starts_with_selector(from2) && starts_with_selector(from1)) {
                return None;
            }
            if parent_superselector(from2, from1) {
                return Some(from1.clone());
            }
            if parent_superselector(from1, from2) {
                return Some(from2.clone());
            }
            None
        },
    );

    let mut diff: Vec<Vec<Sequence>> = vec![vec![init]];
    for group in common {
        diff.push(chunks(&mut groups1, &mut groups2, |groups| {
            groups
                .front()
                .is_none_or(|front| parent_superselector(front, &group))
        }));
        diff.push(vec![group]);
        let _ = groups1.pop_front();
        let _ = groups2.pop_front();
    }
    diff.push(chunks(&mut groups1, &mut groups2, VecDeque::is_empty));
    diff.extend(fin.into_iter().map(|op| match op {
        FinalOp::Node(node) => vec![vec![node]],
        FinalOp::Choices(choices) => choices,
    }));
    diff.retain(|choices| !choices.is_empty());

    paths(&diff)
        .into_iter()
        .map(|path| path.into_iter().flatten().collect())
        .collect()
}

/// One element of the merged trailing part of two sequences.
#[derive(Debug, Clone)]
enum FinalOp {
    /// A node every result ends with.
    Node(Node),
    /// Alternative endings; each result picks one.
    Choices(Vec<Sequence>),
}

/// Pop the leading combinators of both sequences and merge them.
///
/// One run of combinators must be a subsequence of the other; the longer
/// run is kept. Returns `None` otherwise.
fn merge_initial_ops(seq1: &mut VecDeque<Node>, seq2: &mut VecDeque<Node>) -> Option<Sequence> {
    let ops1 = pop_leading_ops(seq1);
    let ops2 = pop_leading_ops(seq2);
    let common = lcs(&ops1, &ops2, |a, b| (a == b).then(|| a.clone()));
    if common != ops1 && common != ops2 {
        return None;
    }
    Some(if ops1.len() > ops2.len() { ops1 } else { ops2 })
}

fn pop_leading_ops(seq: &mut VecDeque<Node>) -> Sequence {
    let mut ops = Vec::new();
    while seq.front().is_some_and(Node::is_combinator) {
        ops.extend(seq.pop_front());
    }
    ops
}

/// Pop the trailing combinators of a sequence, innermost first.
fn pop_trailing_ops(seq: &mut Sequence) -> Sequence {
    let mut ops = Vec::new();
    while seq.last().is_some_and(Node::is_combinator) {
        ops.extend(seq.pop());
    }
    ops
}

/// Pop the trailing combinators of both sequences, together with the
/// compounds they attach, and merge them.
///
/// Pairs of sibling combinators may produce alternative endings:
///
/// | left   | right  | result                                             |
/// |--------|--------|----------------------------------------------------|
/// | `a ~`  | `b ~`  | the more specific one, or `a ~ b ~` / `b ~ a ~` / `ab ~` |
/// | `a ~`  | `b +`  | `b +` if `a` covers `b`, else `a ~ b +` / `ab +`   |
/// | `a >`  | `b +`  | `b +`, with `a >` retried before it                |
/// | `a X`  | `b X`  | `ab X`                                             |
///
/// Returns `None` when the endings cannot be merged.
fn merge_final_ops(seq1: &mut Sequence, seq2: &mut Sequence) -> Option<Vec<FinalOp>> {
    let mut res: VecDeque<FinalOp> = VecDeque::new();
    loop {
        let ops1 = pop_trailing_ops(seq1);
        let ops2 = pop_trailing_ops(seq2);
        if ops1.is_empty() && ops2.is_empty() {
            return Some(res.into());
        }
        if ops1.len() > 1 || ops2.len() > 1 {
            let common = lcs(&ops1, &ops2, |a, b| (a == b).then(|| a.clone()));
            if common != ops1 && common != ops2 {
                return None;
            }
            let longer = if ops1.len() > ops2.len() { ops1 } else { ops2 };
            for op in longer {
                res.push_front(FinalOp::Node(op));
            }
            return Some(res.into());
        }

        match (ops1.into_iter().next(), ops2.into_iter().next()) {
            (Some(op1), Some(op2)) => {
                let sel1 = seq1.pop()?;
                let sel2 = seq2.pop()?;
                let comb1 = op1.as_combinator()?;
                let comb2 = op2.as_combinator()?;
                let compound1 = sel1.as_compound()?;
                let compound2 = sel2.as_compound()?;
                match (comb1, comb2) {
                    (Combinator::GeneralSibling, Combinator::GeneralSibling) => {
                        if compound1.is_superselector_of(compound2) {
                            push_pair(&mut res, sel2, op2);
                        } else if compound2.is_superselector_of(compound1) {
                            push_pair(&mut res, sel1, op1);
                        } else {
                            let merged = compound1.unify_with(compound2);
                            let mut choices = vec![
                                vec![sel1.clone(), op1.clone(), sel2.clone(), op2.clone()],
                                vec![sel2, op2, sel1, op1.clone()],
                            ];
                            if let Some(merged) = merged {
                                choices.push(vec![Node::compound(merged), op1]);
                            }
                            res.push_front(FinalOp::Choices(choices));
                        }
                    }
                    (Combinator::GeneralSibling, Combinator::Adjacent)
                    | (Combinator::Adjacent, Combinator::GeneralSibling) => {
                        let ((tilde_sel, tilde_op), (plus_sel, plus_op)) =
                            if *comb1 == Combinator::GeneralSibling {
                                ((sel1, op1), (sel2, op2))
                            } else {
                                ((sel2, op2), (sel1, op1))
                            };
                        let tilde = tilde_sel.as_compound()?;
                        let plus = plus_sel.as_compound()?;
                        if tilde.is_superselector_of(plus) {
                            push_pair(&mut res, plus_sel, plus_op);
                        } else {
                            let merged = plus.unify_with(tilde);
                            let mut choices = vec![vec![
                                tilde_sel.clone(),
                                tilde_op,
                                plus_sel.clone(),
                                plus_op.clone(),
                            ]];
                            if let Some(merged) = merged {
                                choices.push(vec![Node::compound(merged), plus_op]);
                            }
                            res.push_front(FinalOp::Choices(choices));
                        }
                    }
                    (Combinator::Child, Combinator::GeneralSibling | Combinator::Adjacent) => {
                        push_pair(&mut res, sel2, op2);
                        seq1.push(sel1);
                        seq1.push(op1);
                    }
                    (Combinator::GeneralSibling | Combinator::Adjacent, Combinator::Child) => {
                        push_pair(&mut res, sel1, op1);
                        seq2.push(sel2);
                        seq2.push(op2);
                    }
                    _ if comb1 == comb2 => {
                        let merged = compound1.unify_with(compound2)?;
                        push_pair(&mut res, Node::compound(merged), op1);
                    }
                    _ => return None,
                }
            }
            (Some(op1), None) => {
                let drop_other = op1.as_combinator() == Some(&Combinator::Child)
                    && matches!(
                        (seq2.last().and_then(Node::as_compound), seq1.last().and_then(Node::as_compound)),
                        (Some(theirs), Some(ours)) if theirs.is_superselector_of(ours)
                    );
                if drop_other {
                    let _ = seq2.pop();
                }
                let sel1 = seq1.pop()?;
                push_pair(&mut res, sel1, op1);
            }
            (None, Some(op2)) => {
                let drop_other = op2.as_combinator() == Some(&Combinator::Child)
                    && matches!(
                        (seq1.last().and_then(Node::as_compound), seq2.last().and_then(Node::as_compound)),
                        (Some(theirs), Some(ours)) if theirs.is_superselector_of(ours)
                    );
                if drop_other {
                    let _ = seq1.pop();
                }
                let sel2 = seq2.pop()?;
                push_pair(&mut res, sel2, op2);
            }
            (None, None) => return Some(res.into()),
        }
    }
}

/// Prepend `selector op` to the merged ending.
fn push_pair(res: &mut VecDeque<FinalOp>, selector: Node, op: Node) {
    res.push_front(FinalOp::Node(op));
    res.push_front(FinalOp::Node(selector));
}

/// Split a sequence into groups that must stay together: compounds glued
/// by non-descendant combinators, with any dangling combinators.
///
/// ```text
/// [a, >, b, c, +, d]  =>  [[a, >, b], [c, +, d]]
/// ```
#[must_use]
pub fn group_selectors(seq: Sequence) -> VecDeque<Sequence> {
    let mut groups = VecDeque::new();
    let mut tail: VecDeque<Node> = seq.into();
    while let Some(first) = tail.pop_front() {
        let mut head = vec![first];
        while (head.last().is_some_and(Node::is_combinator) && !tail.is_empty())
            || tail.front().is_some_and(Node::is_combinator)
        {
            head.extend(tail.pop_front());
        }
        groups.push_back(head);
    }
    groups
}

/// Longest common subsequence of `x` and `y`.
///
/// `select` decides whether two elements match and which value stands for
/// both in the result.
#[must_use]
pub fn lcs<T: Clone>(x: &[T], y: &[T], select: impl Fn(&T, &T) -> Option<T>) -> Vec<T> {
    let mut table = vec![vec![0_usize; y.len() + 1]; x.len() + 1];
    for (i, a) in x.iter().enumerate() {
        for (j, b) in y.iter().enumerate() {
            table[i + 1][j + 1] = if select(a, b).is_some() {
                table[i][j] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut result = Vec::new();
    let (mut i, mut j) = (x.len(), y.len());
    while i > 0 && j > 0 {
        if let Some(value) = select(&x[i - 1], &y[j - 1]) {
            result.push(value);
            i -= 1;
            j -= 1;
        } else if table[i][j - 1] > table[i - 1][j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }
    result.reverse();
    result
}

/// Take groups from the front of both queues until `done` holds for each,
/// and return the two ways of ordering what was taken.
fn chunks(
    seq1: &mut VecDeque<Sequence>,
    seq2: &mut VecDeque<Sequence>,
    done: impl Fn(&VecDeque<Sequence>) -> bool,
) -> Vec<Sequence> {
    let mut chunk1: Sequence = Vec::new();
    while !done(seq1) {
        match seq1.pop_front() {
            Some(group) => chunk1.extend(group),
            None => break,
        }
    }
    let mut chunk2: Sequence = Vec::new();
    while !done(seq2) {
        match seq2.pop_front() {
            Some(group) => chunk2.extend(group),
            None => break,
        }
    }
    match (chunk1.is_empty(), chunk2.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![chunk2],
        (false, true) => vec![chunk1],
        (false, false) => {
            let mut forward = chunk1.clone();
            forward.extend(chunk2.iter().cloned());
            let mut backward = chunk2;
            backward.extend(chunk1);
            vec![forward, backward]
        }
    }
}

/// The cartesian product of a list of choices, varying the earliest
/// choice fastest.
///
/// ```text
/// paths([[1, 2], [3, 4]])  =>  [[1, 3], [2, 3], [1, 4], [2, 4]]
/// ```
#[must_use]
pub fn paths<T: Clone>(choices: &[Vec<T>]) -> Vec<Vec<T>> {
    choices.iter().fold(vec![Vec::new()], |paths, choice| {
        choice
            .iter()
            .flat_map(|element| {
                paths.iter().map(move |path| {
                    let mut path = path.clone();
                    path.push(element.clone());
                    path
                })
            })
            .collect()
    })
}

/// Whether `seq1` covers `seq2` when both are read as ancestor chains of
/// the same element.
fn parent_superselector(seq1: &[Node], seq2: &[Node]) -> bool {
    let anchor = Node::compound(CompoundSelector::from(vec![SimpleSelector::Placeholder(
        "<temp>".to_string(),
    )]));
    let mut lhs = seq1.to_vec();
    lhs.push(anchor.clone());
    let mut rhs = seq2.to_vec();
    rhs.push(anchor);
    is_sequence_superselector(&lhs, &rhs)
}

fn starts_with_selector(group: &[Node]) -> bool {
    group.first().is_some_and(Node::is_selector)
}
