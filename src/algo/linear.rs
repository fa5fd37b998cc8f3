//! Matrix-free conjugate gradient.
//!
//! The heat pipeline's two linear systems are symmetric positive
//! (semi-)definite and are only ever touched through matrix-vector
//! products, so the solver takes the operator as a callback and never
//! materialises a matrix.

/// Outcome of a conjugate-gradient solve.
///
/// Non-convergence is not an error: the best iterate found is returned
/// and the caller decides what to do with it.
#[derive(Debug, Clone)]
pub struct CgOutcome {
    /// The final iterate.
    pub x: Vec<f64>,
    /// Whether the residual norm dropped below the tolerance.
    pub converged: bool,
    /// Iterations performed.
    pub iterations: usize,
    /// Final residual norm `‖b − Ax‖`.
    pub residual: f64,
}

/// Solve `A x = b` for a symmetric positive (semi-)definite operator.
///
/// `apply` computes `out = A x`. The initial guess is zero and the
/// stopping rule is an absolute bound on the residual norm.
pub fn conjugate_gradient<A>(apply: A, b: &[f64], max_iter: usize, tolerance: f64) -> CgOutcome
where
    A: Fn(&[f64], &mut [f64]),
{
    let n = b.len();
    let mut x = vec![0.0; n];
    let mut ap = vec![0.0; n];

    apply(&x, &mut ap);
    let mut r: Vec<f64> = b.iter().zip(&ap).map(|(bi, ai)| bi - ai).collect();
    let mut p = r.clone();

    let mut rs_old = dot(&r, &r);
    if rs_old.sqrt() < tolerance {
        return CgOutcome {
            x,
            converged: true,
            iterations: 0,
            residual: rs_old.sqrt(),
        };
    }

    for iter in 1..=max_iter {
        apply(&p, &mut ap);
        let denom = dot(&p, &ap);
        // Breakdown: the operator annihilated the search direction.
        if denom.abs() < 1e-20 {
            return CgOutcome {
                x,
                converged: false,
                iterations: iter - 1,
                residual: rs_old.sqrt(),
            };
        }
        let alpha = rs_old / denom;
        for i in 0..n {
            x[i] += alpha * p[i];
        }
        for i in 0..n {
            r[i] -= alpha * ap[i];
        }
        let rs_new = dot(&r, &r);
        if rs_new.sqrt() < tolerance {
            return CgOutcome {
                x,
                converged: true,
                iterations: iter,
                residual: rs_new.sqrt(),
            };
        }
        let beta = rs_new / rs_old;
        for i in 0..n {
            p[i] = r[i] + beta * p[i];
        }
        rs_old = rs_new;
    }

    CgOutcome {
        x,
        converged: false,
        iterations: max_iter,
        residual: rs_old.sqrt(),
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
