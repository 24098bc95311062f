use crate::error::SimulatorError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// ROI differences within this band are reported as "no change".
const ROI_TOLERANCE: Decimal = dec!(0.01);

/// The current cost structure, as entered on the calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineCosts {
    pub production: Decimal,
    pub raw: Decimal,
    pub transport: Decimal,
    pub bills: Decimal,
    /// Never perturbed by the simulation.
    pub other: Decimal,
}

impl BaselineCosts {
    /// The sum of every cost line, or `None` if it leaves the decimal range.
    pub fn total(&self) -> Option<Decimal> {
        [self.raw, self.transport, self.bills, self.other]
            .into_iter()
            .try_fold(self.production, Decimal::checked_add)
    }
}

/// Percentage changes applied to the adjustable cost components (`10` means +10%).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostDeltas {
    pub raw: Decimal,
    pub transport: Decimal,
    pub production: Decimal,
    pub bills: Decimal,
}

/// Direction of the ROI change between baseline and simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiTrend {
    Improvement,
    Regression,
    Neutral,
}

impl RoiTrend {
    pub fn classify(roi_delta: Decimal) -> Self {
        if roi_delta > ROI_TOLERANCE {
            RoiTrend::Improvement
        } else if roi_delta < -ROI_TOLERANCE {
            RoiTrend::Regression
        } else {
            RoiTrend::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub baseline_total: Decimal,
    pub baseline_profit: Decimal,
    /// Percent. Zero when there are no costs.
    pub baseline_roi: Decimal,
    pub simulated_costs: BaselineCosts,
    pub simulated_total: Decimal,
    pub simulated_profit: Decimal,
    pub simulated_roi: Decimal,
    pub roi_delta: Decimal,
    pub trend: RoiTrend,
}

/// Recomputes profit and ROI after applying `deltas` to the baseline costs.
///
/// Inputs whose results fall outside the decimal range are rejected rather than
/// rounded.
pub fn simulate(
    baseline: &BaselineCosts,
    income: Decimal,
    deltas: &CostDeltas,
) -> Result<SimulationResult, SimulatorError> {
    let baseline_total = baseline.total().ok_or(SimulatorError::Overflow("baseline cost"))?;
    let baseline_profit = income
        .checked_sub(baseline_total)
        .ok_or(SimulatorError::Overflow("baseline profit"))?;
    let baseline_roi = roi(baseline_profit, baseline_total)?;

    let simulated_costs = BaselineCosts {
        production: adjust(baseline.production, deltas.production)?,
        raw: adjust(baseline.raw, deltas.raw)?,
        transport: adjust(baseline.transport, deltas.transport)?,
        bills: adjust(baseline.bills, deltas.bills)?,
        other: baseline.other,
    };
    let simulated_total = simulated_costs
        .total()
        .ok_or(SimulatorError::Overflow("simulated cost"))?;
    let simulated_profit = income
        .checked_sub(simulated_total)
        .ok_or(SimulatorError::Overflow("simulated profit"))?;
    let simulated_roi = roi(simulated_profit, simulated_total)?;

    let roi_delta = simulated_roi
        .checked_sub(baseline_roi)
        .ok_or(SimulatorError::Overflow("ROI change"))?;

    Ok(SimulationResult {
        baseline_total,
        baseline_profit,
        baseline_roi,
        simulated_costs,
        simulated_total,
        simulated_profit,
        simulated_roi,
        roi_delta,
        trend: RoiTrend::classify(roi_delta),
    })
}

fn adjust(cost: Decimal, percent: Decimal) -> Result<Decimal, SimulatorError> {
    (percent / Decimal::ONE_HUNDRED)
        .checked_add(Decimal::ONE)
        .and_then(|factor| cost.checked_mul(factor))
        .ok_or(SimulatorError::Overflow("adjusted cost"))
}

fn roi(profit: Decimal, total_cost: Decimal) -> Result<Decimal, SimulatorError> {
    if total_cost.is_zero() {
        return Ok(Decimal::ZERO);
    }
    profit
        .checked_div(total_cost)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(SimulatorError::Overflow("ROI"))
}
