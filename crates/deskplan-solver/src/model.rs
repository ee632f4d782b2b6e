//! Solver-independent constraint representation.
//!
//! Rules emit constraints against this small IR instead of talking to the
//! backend directly. That keeps rule emission pure (and parallelizable) and
//! lets the orchestrator build the same model twice: once gated-on for the
//! optimizing solve, once under assumptions for infeasibility diagnosis.

/// A variable reference inside a constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarRef {
    /// A 0/1 decision variable, indexed by the decision space.
    Assignment(usize),
    /// A bounded auxiliary variable declared by the emitting rule. Indices
    /// are local to the emission until [`rebased`](ConstraintExpr::rebase_aux)
    /// during model assembly.
    Aux(usize),
}

/// Domain of one auxiliary variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuxDomain {
    pub lb: i32,
    pub ub: i32,
}

/// One weighted variable in a linear expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term {
    pub coeff: i64,
    pub var: VarRef,
}

impl Term {
    pub fn assignment(coeff: i64, index: usize) -> Self {
        Self {
            coeff,
            var: VarRef::Assignment(index),
        }
    }

    pub fn aux(coeff: i64, index: usize) -> Self {
        Self {
            coeff,
            var: VarRef::Aux(index),
        }
    }
}

/// Comparison operator of a linear constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Le,
    Ge,
}

/// One constraint in the model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstraintExpr {
    /// `sum(coeff * var) op rhs`
    Linear {
        terms: Vec<Term>,
        op: CmpOp,
        rhs: i64,
    },
    /// `magnitude == |value|`
    AbsEquality { value: VarRef, magnitude: VarRef },
    /// `result == max(over)`
    MaxEquality { over: Vec<VarRef>, result: VarRef },
}

impl ConstraintExpr {
    pub fn sum(terms: Vec<Term>, op: CmpOp, rhs: i64) -> Self {
        ConstraintExpr::Linear { terms, op, rhs }
    }

    /// Shift local aux indices by `offset` when merging emissions into one
    /// model-wide aux table.
    pub fn rebase_aux(&mut self, offset: usize) {
        let rebase = |var: &mut VarRef| {
            if let VarRef::Aux(index) = var {
                *index += offset;
            }
        };
        match self {
            ConstraintExpr::Linear { terms, .. } => {
                for term in terms {
                    rebase(&mut term.var);
                }
            }
            ConstraintExpr::AbsEquality { value, magnitude } => {
                rebase(value);
                rebase(magnitude);
            }
            ConstraintExpr::MaxEquality { over, result } => {
                for var in over {
                    rebase(var);
                }
                rebase(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rebase_leaves_assignment_refs_alone() {
        let mut expr = ConstraintExpr::sum(
            vec![Term::assignment(1, 3), Term::aux(-1, 0)],
            CmpOp::Eq,
            0,
        );
        expr.rebase_aux(7);
        assert_eq!(
            expr,
            ConstraintExpr::sum(vec![Term::assignment(1, 3), Term::aux(-1, 7)], CmpOp::Eq, 0)
        );
    }

    #[test]
    fn rebase_shifts_every_aux_position() {
        let mut expr = ConstraintExpr::MaxEquality {
            over: vec![VarRef::Assignment(0), VarRef::Aux(1)],
            result: VarRef::Aux(2),
        };
        expr.rebase_aux(10);
        assert_eq!(
            expr,
            ConstraintExpr::MaxEquality {
                over: vec![VarRef::Assignment(0), VarRef::Aux(11)],
                result: VarRef::Aux(12),
            }
        );
    }
}
