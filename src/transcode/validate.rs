use ethereum_types::U256;

use crate::config::LimitsSection;
use crate::error::{GatewayError, ValidationKind};
use crate::types::{Address20, EthereumTx};

// Homestead-era intrinsic gas table (Yellow Paper, appendix G).
const G_TRANSACTION: u64 = 21_000;
const G_TX_CREATE: u64 = 32_000;
const G_TX_DATA_ZERO: u64 = 4;
const G_TX_DATA_NONZERO: u64 = 68;

pub fn check_size(rlp_len: usize, max: usize) -> Result<(), GatewayError> {
    if rlp_len > max {
        return Err(GatewayError::validation(
            ValidationKind::Size,
            format!("rlp length {rlp_len} exceeds max {max}"),
        ));
    }
    Ok(())
}

pub fn check_gas_limit(gas_limit: u64, limits: &LimitsSection) -> Result<(), GatewayError> {
    if gas_limit < limits.min_gas_limit {
        return Err(GatewayError::validation(
            ValidationKind::GasLimit,
            format!("{gas_limit} below min {}", limits.min_gas_limit),
        ));
    }
    if gas_limit > limits.max_gas_limit {
        return Err(GatewayError::validation(
            ValidationKind::GasLimit,
            format!("{gas_limit} above max {}", limits.max_gas_limit),
        ));
    }
    Ok(())
}

pub fn check_gas_price(gas_price: u128, limits: &LimitsSection) -> Result<(), GatewayError> {
    if gas_price < limits.min_gas_price {
        return Err(GatewayError::validation(
            ValidationKind::GasPrice,
            format!("{gas_price} below min {}", limits.min_gas_price),
        ));
    }
    if gas_price > limits.max_gas_price {
        return Err(GatewayError::validation(
            ValidationKind::GasPrice,
            format!("{gas_price} above max {}", limits.max_gas_price),
        ));
    }
    Ok(())
}

/// Base cost of carrying the transaction, before any execution.
pub fn intrinsic_gas(tx: &EthereumTx) -> u64 {
    let zero = tx.data.iter().filter(|&&b| b == 0).count() as u64;
    let nonzero = tx.data.len() as u64 - zero;
    let create = if tx.is_create() { G_TX_CREATE } else { 0 };
    G_TRANSACTION + create + nonzero * G_TX_DATA_NONZERO + zero * G_TX_DATA_ZERO
}

pub fn check_intrinsic_gas(tx: &EthereumTx) -> Result<(), GatewayError> {
    let required = intrinsic_gas(tx);
    if tx.gas_limit < required {
        return Err(GatewayError::validation(
            ValidationKind::IntrinsicGas,
            format!("gas limit {} below intrinsic cost {required}", tx.gas_limit),
        ));
    }
    Ok(())
}

/// `value + gas_limit * gas_price`, widened so the product cannot overflow.
pub fn required_balance(tx: &EthereumTx) -> U256 {
    U256::from(tx.value) + U256::from(tx.gas_limit) * U256::from(tx.gas_price)
}

pub fn check_enough_balance(
    balance: U256,
    tx: &EthereumTx,
    address: Address20,
) -> Result<(), GatewayError> {
    let required = required_balance(tx);
    if balance < required {
        return Err(GatewayError::InsufficientBalance { required, got: balance, address });
    }
    Ok(())
}
