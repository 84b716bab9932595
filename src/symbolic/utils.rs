/// `num_values` evenly spaced points from `start` to `end`, both ends included
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    if num_values < 2 {
        return vec![start; num_values];
    }
    let mut values = Vec::with_capacity(num_values);
    let step = (end - start) / (num_values as f64 - 1.0);

    for i in 0..num_values {
        let value = start + (i as f64 * step);
        values.push(value);
    }

    values
}

/// central difference (f(x+h) - f(x-h)) / 2h at every point
pub fn numerical_derivative<F>(f: F, x_values: &[f64], h: f64) -> Vec<f64>
where
    F: Fn(f64) -> f64,
{
    let mut derivatives = Vec::with_capacity(x_values.len());

    for &x in x_values {
        let f_x_plus_h = f(x + h);
        let f_x_minus_h = f(x - h);
        let derivative = (f_x_plus_h - f_x_minus_h) / (2.0 * h);
        derivatives.push(derivative);
    }

    derivatives
}

// compute norm of two vectors; entries past the end of the shorter one are ignored
pub fn norm(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    (1.0 / n as f64)
        * x.iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
}

/// i! as a float; exact up to 22!
pub fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

/// true if `val` is an integer within `eps`
pub fn is_integer(val: f64, eps: f64) -> bool {
    val.is_finite() && (val - val.round()).abs() < eps
}
