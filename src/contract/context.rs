use crate::Address;

/// The transaction-level facts a contract can see while executing
#[derive(Clone, Debug)]
pub struct TxContext {
    /// The account that signed the transaction
    pub caller: Address,
    /// Posix time of the block the transaction lands in
    pub block_time: i64,
}

/// Builder for [`TxContext`], for exercising contract code directly in tests
pub struct ContextBuilder {
    caller: Address,
    block_time: i64,
}

impl ContextBuilder {
    /// Constructor for a builder with the given caller
    pub fn new(caller: Address) -> Self {
        ContextBuilder {
            caller,
            block_time: 0,
        }
    }

    /// Specify the block time
    pub fn with_block_time(mut self, block_time: i64) -> Self {
        self.block_time = block_time;
        self
    }

    /// Build the [`TxContext`]
    pub fn build(&self) -> TxContext {
        TxContext {
            caller: self.caller.clone(),
            block_time: self.block_time,
        }
    }
}
