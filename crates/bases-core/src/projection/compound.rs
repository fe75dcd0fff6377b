//! Compound-interest projection used by the simulation contract

use serde::{Deserialize, Serialize};

/// Projected wealth after a number of months of compounding
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundProjection {
    pub projected_wealth: f64,
    /// Profit over the total invested, in percent
    pub return_pct: f64,
}

/// Future value of `principal` plus a monthly contribution.
///
/// `M = P(1+r)^n + A((1+r)^n - 1)/r` with `r = annual_rate_pct / 100 / 12`.
pub fn compound_interest(
    principal: f64,
    monthly_contribution: f64,
    annual_rate_pct: f64,
    months: u32,
) -> CompoundProjection {
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let n = f64::from(months);
    let invested = principal + monthly_contribution * n;

    if monthly_rate == 0.0 {
        return CompoundProjection {
            projected_wealth: invested,
            return_pct: 0.0,
        };
    }

    let growth = (1.0 + monthly_rate).powf(n);
    let projected_wealth =
        principal * growth + monthly_contribution * ((growth - 1.0) / monthly_rate);

    let return_pct = if invested > 0.0 {
        (projected_wealth - invested) / invested * 100.0
    } else {
        0.0
    };

    CompoundProjection {
        projected_wealth,
        return_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_is_linear() {
        let p = compound_interest(1000.0, 100.0, 0.0, 12);
        assert_eq!(p.projected_wealth, 2200.0);
        assert_eq!(p.return_pct, 0.0);
    }

    #[test]
    fn test_principal_only() {
        // 12% a year -> 1% a month, 12 months
        let p = compound_interest(1000.0, 0.0, 12.0, 12);
        assert!((p.projected_wealth - 1126.825).abs() < 0.001);
        assert!((p.return_pct - 12.6825).abs() < 0.001);
    }

    #[test]
    fn test_contributions_only() {
        let p = compound_interest(0.0, 100.0, 12.0, 2);
        // 100 * 1.01 + 100
        assert!((p.projected_wealth - 201.0).abs() < 1e-9);
    }

    #[test]
    fn test_nothing_invested() {
        let p = compound_interest(0.0, 0.0, 10.0, 12);
        assert_eq!(p.projected_wealth, 0.0);
        assert_eq!(p.return_pct, 0.0);
    }
}
