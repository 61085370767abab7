use crate::address::Address;
use thiserror::Error;

use crate::contract::context::TxContext;

/// Transaction context module
pub mod context;

/// Interface for the executable part of a deployed contract. Implementations
/// are pure: they take the contract's current state and a call, and either
/// produce the successor state plus effects, or fail, which reverts the whole
/// transaction at submission.
pub trait ContractCode<State, Call>: Send + Sync {
    /// Run the contract against `state` for the given `call`
    fn execute(&self, state: State, call: Call, ctx: TxContext) -> ContractResult<Transition<State>>;

    /// The deterministic address the contract's state lives at
    fn address(&self) -> ContractResult<Address>;
}

/// Result of a successful contract execution: the successor state plus any
/// ledger effects it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<State> {
    state: State,
    effects: Vec<Effect>,
}

impl<State> Transition<State> {
    /// Constructor for a `Transition` with no effects
    pub fn new(state: State) -> Self {
        Transition {
            state,
            effects: Vec::new(),
        }
    }

    /// Add a mint effect crediting `amount` of the contract's token to `recipient`
    pub fn with_mint(mut self, amount: u64, asset_name: Option<String>, recipient: &Address) -> Self {
        let effect = Effect::Mint {
            amount,
            asset_name,
            recipient: recipient.clone(),
        };
        self.effects.push(effect);
        self
    }

    /// Getter for the successor state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Getter for the effects
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Decompose into successor state and effects
    pub fn into_parts(self) -> (State, Vec<Effect>) {
        (self.state, self.effects)
    }
}

/// A ledger-side effect produced by contract execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Credit newly created tokens to an account
    Mint {
        /// Number of tokens created
        amount: u64,
        /// Optional asset name within the contract's token id
        asset_name: Option<String>,
        /// Account credited with the tokens
        recipient: Address,
    },
}

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("Caller is not authorized: {0}")]
    Unauthorized(String),
    #[error("Failed to execute: {0}")]
    FailedToExecute(String),
    #[error("Failed to construct: {0}")]
    FailedToConstruct(String),
}

#[allow(missing_docs)]
pub type ContractResult<T> = Result<T, ContractError>;
