//! Precomputed event streams.

use crate::{types::SimulationError, variate::VariateGenerator};

/// Upper bound on the up-front allocation for one stream
const MAX_PREALLOCATED: usize = 1 << 24;

/// Times of a Poisson process at `rate` on `[0, horizon]`.
///
/// Gaps are accumulated until the running time passes the horizon; that last
/// time is not part of the stream.
pub fn poisson_times(
    variates: &mut VariateGenerator,
    rate: f64,
    horizon: f64,
) -> Result<Vec<f64>, SimulationError> {
    let expected = (rate * horizon).ceil().clamp(0.0, MAX_PREALLOCATED as f64) as usize;
    let mut times = Vec::with_capacity(expected);
    let mut now = 0.0;
    loop {
        now += variates.exponential(rate)?;
        if now > horizon {
            break;
        }
        times.push(now);
    }
    Ok(times)
}

/// Departure times of a FCFS, work-conserving server with no losses:
/// `d_i = max(a_i, d_{i-1}) + s_i`.
pub fn fcfs_departures<F>(arrivals: &[f64], mut service_time: F) -> Result<Vec<f64>, SimulationError>
where
    F: FnMut() -> Result<f64, SimulationError>,
{
    let mut departures = Vec::with_capacity(arrivals.len());
    let mut last = 0.0_f64;
    for &arrival in arrivals {
        last = arrival.max(last) + service_time()?;
        departures.push(last);
    }
    Ok(departures)
}
