//! C5 — principal/fee split. Every swap's reported delta is split into the
//! part that counts toward `total_tokens_sold`/`total_proceeds` and the part
//! that is routed to `fees_accrued`, at `MAX_FEE` parts-per-million scale.

use crate::constants::MAX_FEE;
use crate::error::{EngineError, Result};

/// Splits `amount` into `(principal, fee)` given a swap fee in
/// parts-per-million of `MAX_FEE`.
pub fn principal_and_fee(amount: u64, swap_fee_ppm: u32) -> Result<(u64, u64)> {
    if swap_fee_ppm > MAX_FEE {
        return Err(EngineError::MathOverflow);
    }
    let amount = amount as u128;
    let max_fee = MAX_FEE as u128;
    let principal = amount
        .checked_mul(max_fee - swap_fee_ppm as u128)
        .ok_or(EngineError::MathOverflow)?
        / max_fee;
    let fee = amount - principal;
    Ok((principal as u64, fee as u64))
}
