//! Angular wraparound helpers (degrees).

const FULL_TURN: f64 = 360.0;
const HALF_TURN: f64 = 180.0;

/// Remove ±360° jumps so consecutive samples differ by at most 180°.
pub fn unwrap_degrees(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut correction = 0.0;

    for (i, &v) in values.iter().enumerate() {
        if i > 0 {
            let delta = v - values[i - 1];
            if delta.abs() > HALF_TURN {
                let mut wrapped = (delta + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
                if wrapped == -HALF_TURN && delta > 0.0 {
                    wrapped = HALF_TURN;
                }
                correction += wrapped - delta;
            }
        }
        out.push(v + correction);
    }
    out
}

/// Map an angle into `(-180, 180]`.
pub fn wrap_degrees(v: f64) -> f64 {
    let wrapped = (v + HALF_TURN).rem_euclid(FULL_TURN) - HALF_TURN;
    if wrapped == -HALF_TURN {
        HALF_TURN
    } else {
        wrapped
    }
}
