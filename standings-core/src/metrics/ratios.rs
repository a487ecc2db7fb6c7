//! Risk-adjusted ratios: Sharpe, Sortino, Calmar.
//!
//! Sharpe and Sortino annualize as if each return were one trading day
//! (`TRADING_DAYS_PER_YEAR`), with a zero risk-free rate. Live series are
//! sampled far more often than daily, so the annualized figures are not
//! comparable to textbook daily-data ratios. The constant is kept as-is so
//! that values match what the dashboard has always shown.

/// Periods per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized Sharpe ratio from fractional returns.
///
/// Sample (Bessel-corrected) standard deviation. Returns 0.0 with fewer than
/// two observations or when every return is identical.
pub fn sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(returns);
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    let std = variance.sqrt();
    if std == 0.0 || is_constant(returns) {
        return 0.0;
    }
    annualize(mean, std)
}

/// Annualized Sortino ratio from fractional returns.
///
/// The numerator is the mean of all returns. The denominator is the downside
/// deviation: root mean square of the negative returns only, measured against
/// zero. Returns 0.0 with fewer than two observations or no negative return.
pub fn sortino(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = mean_f64(returns);

    let downside: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }

    let downside_var = downside.iter().map(|r| r * r).sum::<f64>() / downside.len() as f64;
    let downside_std = downside_var.sqrt();
    if downside_std == 0.0 {
        return 0.0;
    }
    annualize(mean, downside_std)
}

/// Calmar ratio from a total return and a max drawdown, both in percent.
///
/// Both are converted back to fractions before dividing. Returns 0.0 when
/// there was no drawdown.
pub fn calmar(total_return_pct: f64, max_drawdown_pct: f64) -> f64 {
    if max_drawdown_pct == 0.0 {
        return 0.0;
    }
    (total_return_pct / 100.0) / (max_drawdown_pct / 100.0)
}

fn annualize(mean: f64, deviation: f64) -> f64 {
    let annual_mean = mean * TRADING_DAYS_PER_YEAR;
    let annual_dev = deviation * TRADING_DAYS_PER_YEAR.sqrt();
    annual_mean / annual_dev
}

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// Summation error can leave a tiny non-zero deviation for equal inputs.
fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
