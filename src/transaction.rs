use crate::{address::Address, asset_id::AssetId, contract::ContractCode};

/// Identifier for a submitted transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxId(String);

impl TxId {
    /// Constructor for a `TxId`
    pub fn new(id_str: &str) -> Self {
        TxId(id_str.to_string())
    }

    /// Getter for the inner id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An individual step a transaction takes against the chain
pub enum Action<State, Call> {
    /// Move `amount` of `asset_id` from the signer to `recipient`
    Transfer {
        /// Amount moved
        amount: u64,
        /// Account credited
        recipient: Address,
        /// Asset moved
        asset_id: AssetId,
    },
    /// Install `state` at the contract's address
    Deploy {
        /// The contract's initial state
        state: State,
        /// The contract code, which determines the deployment address
        code: Box<dyn ContractCode<State, Call>>,
    },
    /// Run the contract at its address with the given call
    Invoke {
        /// The call to execute
        call: Call,
        /// The contract code to execute it with
        code: Box<dyn ContractCode<State, Call>>,
    },
}

/// The domain-level description of a transaction, produced by
/// [`ContractLogic`] endpoint handlers before submission.
///
/// [`ContractLogic`]: crate::logic::ContractLogic
pub struct TxActions<State, Call> {
    /// Steps the transaction takes, in order
    pub actions: Vec<Action<State, Call>>,
}

impl<State, Call> Default for TxActions<State, Call> {
    fn default() -> Self {
        TxActions {
            actions: Vec::new(),
        }
    }
}

impl<State, Call> TxActions<State, Call> {
    /// Add a transfer to the actions
    pub fn with_transfer(mut self, amount: u64, recipient: &Address, asset_id: AssetId) -> Self {
        let action = Action::Transfer {
            amount,
            recipient: recipient.clone(),
            asset_id,
        };
        self.actions.push(action);
        self
    }

    /// Add a contract deployment to the actions
    pub fn with_deploy(mut self, state: State, code: Box<dyn ContractCode<State, Call>>) -> Self {
        let action = Action::Deploy { state, code };
        self.actions.push(action);
        self
    }

    /// Add a contract invocation to the actions
    pub fn with_invoke(mut self, call: Call, code: Box<dyn ContractCode<State, Call>>) -> Self {
        let action = Action::Invoke { call, code };
        self.actions.push(action);
        self
    }

    /// Regroup the actions into an [`UnbuiltTransaction`] ready for submission
    pub fn to_unbuilt_tx(self) -> UnbuiltTransaction<State, Call> {
        let mut transfers = Vec::new();
        let mut deploys = Vec::new();
        let mut invokes = Vec::new();
        for action in self.actions {
            match action {
                Action::Transfer {
                    amount,
                    recipient,
                    asset_id,
                } => transfers.push((amount, recipient, asset_id)),
                Action::Deploy { state, code } => deploys.push((state, code)),
                Action::Invoke { call, code } => invokes.push((call, code)),
            }
        }
        UnbuiltTransaction {
            transfers,
            deploys,
            invokes,
        }
    }
}

/// A transaction ready to hand to a [`ChainClient`] for submission
///
/// [`ChainClient`]: crate::chain_client::ChainClient
pub struct UnbuiltTransaction<State, Call> {
    /// Transfers debited from the signer
    pub transfers: Vec<(u64, Address, AssetId)>,
    /// Contract deployments with their initial states
    pub deploys: Vec<(State, Box<dyn ContractCode<State, Call>>)>,
    /// Contract invocations
    pub invokes: Vec<(Call, Box<dyn ContractCode<State, Call>>)>,
}

impl<State, Call> Default for UnbuiltTransaction<State, Call> {
    fn default() -> Self {
        UnbuiltTransaction {
            transfers: Vec::new(),
            deploys: Vec::new(),
            invokes: Vec::new(),
        }
    }
}
