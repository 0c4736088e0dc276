//! # Symbolic Expression Simplification Module
//!
//! Algebraic clean-up of expressions produced by the differentiator, so that `2*pow(x,2-1)*1`
//! reads as `2*x`.
//!
//! ## Simplification Strategy
//!
//! 1. **Constant Folding**: arithmetic between constants, kept only when the result is finite
//! 2. **Algebraic Identities**: x + 0 = x, x * 1 = x, 0 * x = 0, x - x = 0, x / x = 1
//! 3. **Sign Handling**: negations are pushed into constants and merged with + and -
//! 4. **Power Rules**: x^0 = 1, x^1 = x, (x^a)^b = x^(a*b), x*x = x^2
//!
//! One bottom-up pass is `simplify_()`; `simplify()` repeats it until the tree stops changing.

use crate::symbolic::symbolic_engine::{Expr, Func};

const MAX_SIMPLIFY_PASSES: usize = 16;

// a folded constant is only useful when it is a real number
fn folded(value: f64) -> Option<Expr> {
    if value.is_finite() {
        Some(Expr::Const(value))
    } else {
        None
    }
}

fn as_const(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Const(value) => Some(*value),
        _ => None,
    }
}

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// One bottom-up simplification pass: children first, then the rules of the node.
    pub fn simplify_(&self) -> Expr {
        match self {
            Expr::Var(_) | Expr::Const(_) => self.clone(),
            Expr::Add(lhs, rhs) => simplify_add(lhs.simplify_(), rhs.simplify_()),
            Expr::Sub(lhs, rhs) => simplify_sub(lhs.simplify_(), rhs.simplify_()),
            Expr::Mul(lhs, rhs) => simplify_mul(lhs.simplify_(), rhs.simplify_()),
            Expr::Div(lhs, rhs) => simplify_div(lhs.simplify_(), rhs.simplify_()),
            Expr::Pow(base, exp) => simplify_pow(base.simplify_(), exp.simplify_()),
            Expr::Neg(expr) => simplify_neg(expr.simplify_()),
            Expr::Call(func, arg) => simplify_call(*func, arg.simplify_()),
        }
    }

    /// Public interface for expression simplification.
    ///
    /// Repeats [`Expr::simplify_`] until a fixed point is reached (bounded number of passes).
    pub fn simplify(&self) -> Expr {
        let mut current = self.clone();
        for _ in 0..MAX_SIMPLIFY_PASSES {
            let next = current.simplify_();
            if next == current {
                return next;
            }
            current = next;
        }
        current
    }
}

fn simplify_add(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (as_const(&lhs), as_const(&rhs)) {
        if let Some(sum) = folded(a + b) {
            return sum;
        }
    }
    if lhs.is_zero() {
        return rhs;
    }
    if rhs.is_zero() {
        return lhs;
    }
    match rhs {
        Expr::Neg(inner) => return Expr::Sub(lhs.boxed(), inner),
        Expr::Const(c) if c < 0.0 => return Expr::Sub(lhs.boxed(), Expr::Const(-c).boxed()),
        _ => {}
    }
    if lhs == rhs {
        return Expr::Const(2.0) * lhs;
    }
    Expr::Add(lhs.boxed(), rhs.boxed())
}

fn simplify_sub(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (as_const(&lhs), as_const(&rhs)) {
        if let Some(difference) = folded(a - b) {
            return difference;
        }
    }
    if rhs.is_zero() {
        return lhs;
    }
    if lhs.is_zero() {
        return Expr::Neg(rhs.boxed());
    }
    if lhs == rhs {
        return Expr::Const(0.0);
    }
    match rhs {
        Expr::Neg(inner) => Expr::Add(lhs.boxed(), inner),
        Expr::Const(c) if c < 0.0 => Expr::Add(lhs.boxed(), Expr::Const(-c).boxed()),
        rhs => Expr::Sub(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_mul(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (as_const(&lhs), as_const(&rhs)) {
        if let Some(product) = folded(a * b) {
            return product;
        }
    }
    if lhs.is_zero() || rhs.is_zero() {
        return Expr::Const(0.0);
    }
    if lhs.is_const(1.0) {
        return rhs;
    }
    if rhs.is_const(1.0) {
        return lhs;
    }
    if lhs.is_const(-1.0) {
        return Expr::Neg(rhs.boxed());
    }
    if rhs.is_const(-1.0) {
        return Expr::Neg(lhs.boxed());
    }
    // constants go to the left
    if as_const(&rhs).is_some() && as_const(&lhs).is_none() {
        return Expr::Mul(rhs.boxed(), lhs.boxed());
    }
    match (lhs, rhs) {
        (Expr::Const(c1), Expr::Mul(inner_lhs, inner_rhs)) => match *inner_lhs {
            Expr::Const(c2) if (c1 * c2).is_finite() => {
                Expr::Mul(Expr::Const(c1 * c2).boxed(), inner_rhs)
            }
            inner_lhs => Expr::Mul(
                Expr::Const(c1).boxed(),
                Expr::Mul(inner_lhs.boxed(), inner_rhs).boxed(),
            ),
        },
        (Expr::Neg(inner), rhs) => Expr::Neg(Expr::Mul(inner, rhs.boxed()).boxed()),
        (lhs, Expr::Neg(inner)) => Expr::Neg(Expr::Mul(lhs.boxed(), inner).boxed()),
        (lhs, rhs) if lhs == rhs => lhs.pow(Expr::Const(2.0)),
        (Expr::Pow(base, exp), rhs) if *base == rhs && as_const(&exp).is_some() => {
            Expr::Pow(base, (*exp + Expr::Const(1.0)).boxed())
        }
        (lhs, Expr::Pow(base, exp)) if *base == lhs && as_const(&exp).is_some() => {
            Expr::Pow(base, (*exp + Expr::Const(1.0)).boxed())
        }
        (lhs, rhs) => Expr::Mul(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_div(lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (as_const(&lhs), as_const(&rhs)) {
        if b != 0.0 {
            if let Some(quotient) = folded(a / b) {
                return quotient;
            }
        }
    }
    if rhs.is_zero() {
        return Expr::Div(lhs.boxed(), rhs.boxed());
    }
    if lhs.is_zero() {
        return Expr::Const(0.0);
    }
    if rhs.is_const(1.0) {
        return lhs;
    }
    if rhs.is_const(-1.0) {
        return Expr::Neg(lhs.boxed());
    }
    if lhs == rhs {
        return Expr::Const(1.0);
    }
    match lhs {
        Expr::Neg(inner) => Expr::Neg(Expr::Div(inner, rhs.boxed()).boxed()),
        lhs => Expr::Div(lhs.boxed(), rhs.boxed()),
    }
}

fn simplify_pow(base: Expr, exp: Expr) -> Expr {
    if let (Some(a), Some(b)) = (as_const(&base), as_const(&exp)) {
        if let Some(power) = folded(a.powf(b)) {
            return power;
        }
    }
    if exp.is_zero() {
        return Expr::Const(1.0);
    }
    if exp.is_const(1.0) {
        return base;
    }
    if base.is_const(1.0) {
        return Expr::Const(1.0);
    }
    match (base, exp) {
        (Expr::Pow(inner_base, inner_exp), Expr::Const(outer)) => match *inner_exp {
            Expr::Const(inner) => Expr::Pow(inner_base, Expr::Const(inner * outer).boxed()),
            inner_exp => Expr::Pow(
                Expr::Pow(inner_base, inner_exp.boxed()).boxed(),
                Expr::Const(outer).boxed(),
            ),
        },
        (base, exp) => Expr::Pow(base.boxed(), exp.boxed()),
    }
}

fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Const(c) => Expr::Const(-c),
        Expr::Neg(inner) => *inner,
        Expr::Mul(lhs, rhs) => match *lhs {
            Expr::Const(c) => Expr::Mul(Expr::Const(-c).boxed(), rhs),
            lhs => Expr::Neg(Expr::Mul(lhs.boxed(), rhs).boxed()),
        },
        expr => Expr::Neg(expr.boxed()),
    }
}

fn simplify_call(func: Func, arg: Expr) -> Expr {
    if let Expr::Const(c) = arg {
        let value = func.apply(c);
        // only exact values are folded, sin(1) stays symbolic
        if value.is_finite() && value.fract() == 0.0 {
            return Expr::Const(value);
        }
    }
    if func == Func::Ln && arg == Expr::var("e") {
        return Expr::Const(1.0);
    }
    Expr::Call(func, arg.boxed())
}
