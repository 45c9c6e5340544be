use anyhow::Result;

/// Fitted single-variable linear trend. Immutable once fit; lives for a
/// single request only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares of `ys` on `xs`, closed form, no regularization.
///
/// With no spread in `xs` (a single sample) the slope is taken as zero and
/// the intercept as the mean, which keeps a one-row history well defined.
pub fn fit(xs: &[f64], ys: &[f64]) -> Result<LinearTrend> {
    anyhow::ensure!(
        xs.len() == ys.len(),
        "feature/target length mismatch: {} vs {}",
        xs.len(),
        ys.len()
    );
    anyhow::ensure!(!xs.is_empty(), "cannot fit a trend on zero samples");

    let n = xs.len() as f64;
    let x_mean = xs.iter().sum::<f64>() / n;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        num += (x - x_mean) * (y - y_mean);
        den += (x - x_mean) * (x - x_mean);
    }

    if den.abs() < f64::EPSILON {
        return Ok(LinearTrend {
            slope: 0.0,
            intercept: y_mean,
        });
    }

    let slope = num / den;
    Ok(LinearTrend {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
