use crate::types::Address20;
use ethereum_types::U256;
use thiserror::Error;

/// Which validator rejected the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    GasLimit,
    GasPrice,
    IntrinsicGas,
    Size,
}

impl std::fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ValidationKind::GasLimit => "gas limit",
            ValidationKind::GasPrice => "gas price",
            ValidationKind::IntrinsicGas => "intrinsic gas",
            ValidationKind::Size => "size",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("signature error: {0}")]
    Signature(String),

    #[error("{kind} check failed: {context}")]
    Validation { kind: ValidationKind, context: String },

    #[error("insufficient balance for 0x{}: required {required}, got {got}", hex::encode(.address))]
    InsufficientBalance {
        required: U256,
        got: U256,
        address: Address20,
    },

    #[error("recipient account not found: 0x{}", hex::encode(.address))]
    RecipientNotFound { address: Address20 },

    #[error("rollup rpc error: {0}")]
    Upstream(String),

    #[error("config error: {0}")]
    Config(String),
}

impl GatewayError {
    pub fn validation(kind: ValidationKind, context: impl Into<String>) -> Self {
        GatewayError::Validation { kind, context: context.into() }
    }

    /// Prepend a breadcrumb to the error's context, preserving the root cause.
    /// Higher layers extend the chain as the error propagates outward.
    pub fn pad_context(self, note: &str) -> Self {
        match self {
            GatewayError::Decode(c) => GatewayError::Decode(format!("{note}: {c}")),
            GatewayError::Signature(c) => GatewayError::Signature(format!("{note}: {c}")),
            GatewayError::Validation { kind, context } => {
                GatewayError::Validation { kind, context: format!("{note}: {context}") }
            }
            GatewayError::Upstream(c) => GatewayError::Upstream(format!("{note}: {c}")),
            GatewayError::Config(c) => GatewayError::Config(format!("{note}: {c}")),
            other => other,
        }
    }
}
