//! Classical fourth-order Runge–Kutta, fixed step.
//!
//! The source program threads the simulation and its scratch argument
//! buffer through module-level globals because its RK4 callback has no
//! user-data slot (spec §9, first Design Note). Here the derivative
//! callback is an ordinary closure, so there is no global mutable state
//! anywhere in this crate.

/// Advance `y` (width `y.len()`) by `steps` fixed steps of size
/// `time_span / steps`, calling `dydt(t, y, out)` on each of the four
/// RK4 stages per step. `y` is updated in place; only the final state is
/// ever observed by the caller (spec §4.5).
///
/// `dydt` receives the stage time, the stage state vector, and a
/// scratch output buffer to fill with the derivative at that state.
pub fn integrate<F>(y: &mut [f64], steps: u32, time_span: f64, mut dydt: F)
where
    F: FnMut(f64, &[f64], &mut [f64]),
{
    let n = y.len();
    let h = time_span / steps as f64;

    let mut k1 = vec![0.0; n];
    let mut k2 = vec![0.0; n];
    let mut k3 = vec![0.0; n];
    let mut k4 = vec![0.0; n];
    let mut scratch = vec![0.0; n];

    let mut t = 0.0;
    for _ in 0..steps {
        dydt(t, y, &mut k1);

        for i in 0..n {
            scratch[i] = y[i] + h * 0.5 * k1[i];
        }
        dydt(t + h * 0.5, &scratch, &mut k2);

        for i in 0..n {
            scratch[i] = y[i] + h * 0.5 * k2[i];
        }
        dydt(t + h * 0.5, &scratch, &mut k3);

        for i in 0..n {
            scratch[i] = y[i] + h * k3[i];
        }
        dydt(t + h, &scratch, &mut k4);

        for i in 0..n {
            y[i] += (h / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }

        t += h;
    }
}
