#![allow(non_snake_case)]

use super::*;
use crate::{
    address::ADDRESS_LENGTH,
    contract::{ContractCode, ContractError, ContractResult, Transition},
};

#[derive(Clone, Debug, PartialEq, Eq)]
enum CounterCall {
    Increment,
    MintReward,
    AlwaysFail,
}

struct CounterContract;

const COUNTER_ADDRESS: [u8; ADDRESS_LENGTH] = [0xC0; ADDRESS_LENGTH];

impl ContractCode<u64, CounterCall> for CounterContract {
    fn execute(
        &self,
        state: u64,
        call: CounterCall,
        ctx: TxContext,
    ) -> ContractResult<Transition<u64>> {
        match call {
            CounterCall::Increment => Ok(Transition::new(state + 1)),
            CounterCall::MintReward => {
                Ok(Transition::new(state).with_mint(1, Some("RWD".to_string()), &ctx.caller))
            }
            CounterCall::AlwaysFail => {
                Err(ContractError::FailedToExecute("unconditional".to_string()))
            }
        }
    }

    fn address(&self) -> ContractResult<Address> {
        Ok(Address::new(COUNTER_ADDRESS))
    }
}

fn deploy_tx(start: u64) -> UnbuiltTransaction<u64, CounterCall> {
    UnbuiltTransaction {
        transfers: vec![],
        deploys: vec![(start, Box::new(CounterContract))],
        invokes: vec![],
    }
}

fn invoke_tx(call: CounterCall) -> UnbuiltTransaction<u64, CounterCall> {
    UnbuiltTransaction {
        transfers: vec![],
        deploys: vec![],
        invokes: vec![(call, Box::new(CounterContract))],
    }
}

#[tokio::test]
async fn balance_at_address() {
    let signer = Address::new([1; ADDRESS_LENGTH]);
    let starting_amount = 10_000_000;
    let mut values = Values::default();
    values.add_one_value(&AssetId::Coin, starting_amount);
    let accounts = vec![(signer.clone(), values)];
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(signer.clone(), accounts, 1000);
    let expected = starting_amount;
    let actual = client
        .balance_at_address(&signer, &AssetId::Coin)
        .await
        .unwrap();
    assert_eq!(expected, actual);
}

#[tokio::test]
async fn submit_transfer__moves_balance_and_keeps_remainder() {
    let sender = Address::new([1; ADDRESS_LENGTH]);
    let recipient = Address::new([2; ADDRESS_LENGTH]);
    let starting_amount = 10_000_000;
    let transfer_amount = 3_000_000;
    let mut values = Values::default();
    values.add_one_value(&AssetId::Coin, starting_amount);
    let accounts = vec![(sender.clone(), values)];
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(sender.clone(), accounts, 1000);

    let tx = UnbuiltTransaction {
        transfers: vec![(transfer_amount, recipient.clone(), AssetId::Coin)],
        deploys: vec![],
        invokes: vec![],
    };
    let tx_id = client.submit(tx).await.unwrap();
    assert_eq!(tx_id.as_str().len(), 64);

    let recipient_balance = client
        .balance_at_address(&recipient, &AssetId::Coin)
        .await
        .unwrap();
    assert_eq!(recipient_balance, transfer_amount);
    let sender_balance = client
        .balance_at_address(&sender, &AssetId::Coin)
        .await
        .unwrap();
    assert_eq!(sender_balance, starting_amount - transfer_amount);
}

#[tokio::test]
async fn submit_transfer__fails_on_insufficient_funds() {
    let sender = Address::new([1; ADDRESS_LENGTH]);
    let recipient = Address::new([2; ADDRESS_LENGTH]);
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(sender.clone(), vec![(sender.clone(), Values::default())], 1000);

    let tx = UnbuiltTransaction {
        transfers: vec![(1, recipient.clone(), AssetId::Coin)],
        deploys: vec![],
        invokes: vec![],
    };
    let err = client.submit(tx).await.unwrap_err();
    assert!(matches!(err, ChainClientError::FailedToSubmitTx(_)));
    let recipient_balance = client
        .balance_at_address(&recipient, &AssetId::Coin)
        .await
        .unwrap();
    assert_eq!(recipient_balance, 0);
}

#[tokio::test]
async fn deploy_installs_state_and_redeploy_fails() {
    let signer = Address::new([1; ADDRESS_LENGTH]);
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(signer.clone(), vec![], 1000);

    client.submit(deploy_tx(5)).await.unwrap();
    let state = client
        .contract_state(&Address::new(COUNTER_ADDRESS))
        .await
        .unwrap();
    assert_eq!(state, Some(5));

    let err = client.submit(deploy_tx(9)).await.unwrap_err();
    assert!(matches!(err, ChainClientError::FailedToSubmitTx(_)));
    let state = client
        .contract_state(&Address::new(COUNTER_ADDRESS))
        .await
        .unwrap();
    assert_eq!(state, Some(5));
}

#[tokio::test]
async fn invoke_updates_state_and_credits_mints() {
    let signer = Address::new([1; ADDRESS_LENGTH]);
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(signer.clone(), vec![], 1000);

    client.submit(deploy_tx(0)).await.unwrap();
    client.submit(invoke_tx(CounterCall::Increment)).await.unwrap();
    client
        .submit(invoke_tx(CounterCall::MintReward))
        .await
        .unwrap();

    let state = client
        .contract_state(&Address::new(COUNTER_ADDRESS))
        .await
        .unwrap();
    assert_eq!(state, Some(1));

    let reward_asset = AssetId::token(
        &Address::new(COUNTER_ADDRESS).to_hex(),
        &Some("RWD".to_string()),
    );
    let reward_balance = client
        .balance_at_address(&signer, &reward_asset)
        .await
        .unwrap();
    assert_eq!(reward_balance, 1);
}

#[tokio::test]
async fn invoke_against_undeployed_contract_fails() {
    let signer = Address::new([1; ADDRESS_LENGTH]);
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(signer.clone(), vec![], 1000);

    let err = client
        .submit(invoke_tx(CounterCall::Increment))
        .await
        .unwrap_err();
    assert!(matches!(err, ChainClientError::FailedToSubmitTx(_)));
}

#[tokio::test]
async fn reverted_invoke_leaves_chain_untouched() {
    let signer = Address::new([1; ADDRESS_LENGTH]);
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(signer.clone(), vec![], 1000);

    client.submit(deploy_tx(3)).await.unwrap();
    let time_before = client.current_time().await.unwrap();

    let tx = UnbuiltTransaction {
        transfers: vec![],
        deploys: vec![],
        invokes: vec![
            (CounterCall::Increment, Box::new(CounterContract) as _),
            (CounterCall::AlwaysFail, Box::new(CounterContract) as _),
        ],
    };
    let err = client.submit(tx).await.unwrap_err();
    assert!(matches!(err, ChainClientError::FailedToSubmitTx(_)));

    let state = client
        .contract_state(&Address::new(COUNTER_ADDRESS))
        .await
        .unwrap();
    assert_eq!(state, Some(3));
    assert_eq!(client.current_time().await.unwrap(), time_before);
}

#[tokio::test]
async fn each_submission_advances_time_one_block() {
    let signer = Address::new([1; ADDRESS_LENGTH]);
    let block_length = 1000;
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(signer.clone(), vec![], block_length);

    client.submit(deploy_tx(0)).await.unwrap();
    client.submit(invoke_tx(CounterCall::Increment)).await.unwrap();

    assert_eq!(client.current_time().await.unwrap(), 2 * block_length);
}

#[tokio::test]
async fn switch_signer__changes_caller_and_rejects_unknown_accounts() {
    let alice = Address::new([1; ADDRESS_LENGTH]);
    let bob = Address::new([2; ADDRESS_LENGTH]);
    let stranger = Address::new([3; ADDRESS_LENGTH]);
    let accounts = vec![
        (alice.clone(), Values::default()),
        (bob.clone(), Values::default()),
    ];
    let client: TestChainClient<u64, CounterCall, _> =
        TestChainClient::new_in_memory(alice.clone(), accounts, 1000);

    client.submit(deploy_tx(0)).await.unwrap();
    client.switch_signer(&bob).await.unwrap();
    assert_eq!(client.signer_address().await.unwrap(), bob);

    client
        .submit(invoke_tx(CounterCall::MintReward))
        .await
        .unwrap();
    let reward_asset = AssetId::token(
        &Address::new(COUNTER_ADDRESS).to_hex(),
        &Some("RWD".to_string()),
    );
    let bob_reward = client
        .balance_at_address(&bob, &reward_asset)
        .await
        .unwrap();
    assert_eq!(bob_reward, 1);
    let alice_reward = client
        .balance_at_address(&alice, &reward_asset)
        .await
        .unwrap();
    assert_eq!(alice_reward, 0);

    let err = client.switch_signer(&stranger).await.unwrap_err();
    assert!(matches!(err, ChainClientError::BadAddress(_)));
}
