//! Minimum fee/gas/storage computation from a preapply simulation result
//! (spec §4.7).

use crate::config::{
    BASE_SAFETY_MARGIN_GAS, HARD_GAS_LIMIT_PER_OPERATION, HARD_STORAGE_LIMIT_PER_OPERATION,
    MINIMAL_FEES, MINIMAL_NANOTEZ_PER_BYTE, MINIMAL_NANOTEZ_PER_GAS_UNIT,
};

/// One operation's consumed resources as reported by a node's preapply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationResult {
    /// Sum of main-operation and internal-operation consumed milligas.
    pub consumed_milligas: u64,
    /// Net paid storage diff in bytes, reported by the node.
    pub paid_storage_size_diff: u64,
}

fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator - 1) / denominator
}

/// Minimum fee/gas/storage calculator (spec §4.7's formula). A zero-sized
/// type carrying only associated functions, mirroring the ambient stack's
/// calculator pattern.
pub struct FeeCalculator;

impl FeeCalculator {
    /// Computes the `gas_limit` to request: consumed milligas rounded up to
    /// whole gas units, plus a fixed safety margin.
    pub fn calculate_gas_limit(sim: &SimulationResult) -> u64 {
        let gas = ceil_div(sim.consumed_milligas, 1000);
        (gas + BASE_SAFETY_MARGIN_GAS).min(HARD_GAS_LIMIT_PER_OPERATION)
    }

    /// Computes the `storage_limit` to request from the reported paid
    /// storage diff, capped at the network's hard per-operation limit.
    pub fn calculate_storage_limit(sim: &SimulationResult) -> u64 {
        sim.paid_storage_size_diff.min(HARD_STORAGE_LIMIT_PER_OPERATION)
    }

    /// Computes the minimum fee (in mutez/nanotez units per spec §4.7) for
    /// an operation whose forged byte size is `byte_size` and whose gas
    /// requirement is `gas`.
    pub fn calculate_fee(byte_size: usize, gas: u64) -> u64 {
        let byte_cost = byte_size as u64 * MINIMAL_NANOTEZ_PER_BYTE;
        let gas_cost = gas * MINIMAL_NANOTEZ_PER_GAS_UNIT;
        MINIMAL_FEES + ceil_div(byte_cost + gas_cost, 1000)
    }

    /// Computes the minimum fee directly from a simulation result and the
    /// forged byte size of the operation (placeholder fee already applied
    /// so the size measurement reflects the real wire format).
    pub fn calculate_fee_for_simulation(sim: &SimulationResult, byte_size: usize) -> u64 {
        let gas = Self::calculate_gas_limit(sim);
        Self::calculate_fee(byte_size, gas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_limit_rounds_up_and_adds_margin() {
        let sim = SimulationResult { consumed_milligas: 1_234_500, paid_storage_size_diff: 0 };
        assert_eq!(FeeCalculator::calculate_gas_limit(&sim), 1235 + BASE_SAFETY_MARGIN_GAS);
    }

    #[test]
    fn gas_limit_is_capped_at_hard_limit() {
        let sim = SimulationResult { consumed_milligas: u64::MAX / 2, paid_storage_size_diff: 0 };
        assert_eq!(FeeCalculator::calculate_gas_limit(&sim), HARD_GAS_LIMIT_PER_OPERATION);
    }

    #[test]
    fn storage_limit_is_capped_at_hard_limit() {
        let sim = SimulationResult { consumed_milligas: 0, paid_storage_size_diff: 1_000_000 };
        assert_eq!(
            FeeCalculator::calculate_storage_limit(&sim),
            HARD_STORAGE_LIMIT_PER_OPERATION
        );
    }

    #[test]
    fn fee_formula_matches_spec() {
        let byte_size = 150usize;
        let gas = 10_600u64;
        let expected = MINIMAL_FEES
            + ceil_div(byte_size as u64 * MINIMAL_NANOTEZ_PER_BYTE + gas * MINIMAL_NANOTEZ_PER_GAS_UNIT, 1000);
        assert_eq!(FeeCalculator::calculate_fee(byte_size, gas), expected);
    }

    #[test]
    fn fee_increases_with_byte_size_and_gas() {
        let low = FeeCalculator::calculate_fee(100, 1000);
        let high = FeeCalculator::calculate_fee(500, 50_000);
        assert!(high > low);
    }
}
