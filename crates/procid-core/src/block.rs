//! Sample-by-sample element of the fallback loop
//!
//! Every sub-step runs in two phases: `update(t)` reads the output from the
//! current state and latched input, then `step(t, dt)` moves the state on
//! to `t + dt`.

/// Single-input, single-output block
pub trait Block {
    /// Latch the input for the current sub-step
    fn set_input(&mut self, u: f64);

    /// Output at `t` for the latched input
    fn update(&mut self, t: f64) -> f64;

    /// Advance internal state by `dt`; no-op for static blocks
    fn step(&mut self, _t: f64, _dt: f64) {}
}
