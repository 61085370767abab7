use dromon::{
    address::{Address, ADDRESS_LENGTH},
    asset_id::AssetId,
    contract::{context::TxContext, ContractCode, ContractError, ContractResult, Transition},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// 19 ASCII bytes + NUL.
const MEMBERSHIP_CONTRACT_ADDRESS: [u8; ADDRESS_LENGTH] = *b"membership-token-v1\0";

/// The address the membership contract's state lives at
pub fn contract_address() -> Address {
    Address::new(MEMBERSHIP_CONTRACT_ADDRESS)
}

/// Stored state of the membership token contract. The deployer becomes the
/// admin and a member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipState {
    /// Display name of the token
    pub name: String,
    /// Token symbol, used as the asset name of minted tokens
    pub symbol: String,
    /// The administrating account
    pub admin: Address,
    /// Accounts admitted as members
    pub members: BTreeSet<Address>,
    /// Accounts that have already received their token
    pub minted: BTreeSet<Address>,
    /// Shared prefix for per-token metadata locations
    pub base_uri: Option<String>,
}

impl MembershipState {
    /// Constructor for the state of a freshly deployed contract
    pub fn new(name: &str, symbol: &str, admin: &Address) -> Self {
        let mut members = BTreeSet::new();
        members.insert(admin.clone());
        MembershipState {
            name: name.to_string(),
            symbol: symbol.to_string(),
            admin: admin.clone(),
            members,
            minted: BTreeSet::new(),
            base_uri: None,
        }
    }

    /// Whether `address` has been admitted as a member
    pub fn is_member(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    /// The asset id of the tokens this contract mints
    pub fn asset_id(&self) -> AssetId {
        AssetId::token(&contract_address().to_hex(), &Some(self.symbol.clone()))
    }
}

/// Calls the membership contract accepts
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MembershipCall {
    /// Bulk membership registration, admin only
    AddMembers(Vec<Address>),
    /// Store the shared metadata URI prefix, admin only
    SetBaseUri(String),
    /// Mint the caller's token, admin only
    MintAdmin,
    /// Mint the caller's token, members only
    Mint,
}

/// The executable membership contract
pub struct MembershipContract;

impl ContractCode<MembershipState, MembershipCall> for MembershipContract {
    fn execute(
        &self,
        state: MembershipState,
        call: MembershipCall,
        ctx: TxContext,
    ) -> ContractResult<Transition<MembershipState>> {
        match call {
            MembershipCall::AddMembers(new_members) => {
                require_admin(&state, &ctx.caller)?;
                let mut state = state;
                state.members.extend(new_members);
                Ok(Transition::new(state))
            }
            MembershipCall::SetBaseUri(base_uri) => {
                require_admin(&state, &ctx.caller)?;
                let mut state = state;
                state.base_uri = Some(base_uri);
                Ok(Transition::new(state))
            }
            MembershipCall::MintAdmin => {
                require_admin(&state, &ctx.caller)?;
                Ok(mint_once(state, &ctx.caller))
            }
            MembershipCall::Mint => {
                if !state.is_member(&ctx.caller) {
                    return Err(ContractError::Unauthorized(
                        "only members may mint".to_string(),
                    ));
                }
                Ok(mint_once(state, &ctx.caller))
            }
        }
    }

    fn address(&self) -> ContractResult<Address> {
        Ok(contract_address())
    }
}

// A repeat mint from the same account is accepted but creates nothing.
fn mint_once(mut state: MembershipState, recipient: &Address) -> Transition<MembershipState> {
    if state.minted.contains(recipient) {
        return Transition::new(state);
    }
    state.minted.insert(recipient.clone());
    let symbol = state.symbol.clone();
    Transition::new(state).with_mint(1, Some(symbol), recipient)
}

fn require_admin(state: &MembershipState, caller: &Address) -> ContractResult<()> {
    if &state.admin != caller {
        return Err(ContractError::Unauthorized(
            "only the admin may call this".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dromon::contract::{context::ContextBuilder, Effect};

    fn admin() -> Address {
        Address::new([1; ADDRESS_LENGTH])
    }

    fn member() -> Address {
        Address::new([2; ADDRESS_LENGTH])
    }

    fn fresh_state() -> MembershipState {
        MembershipState::new("Digital New Union", "DNU", &admin())
    }

    #[test]
    fn deployer_is_admin_and_member() {
        let state = fresh_state();
        assert_eq!(state.admin, admin());
        assert!(state.is_member(&admin()));
        assert!(!state.is_member(&member()));
    }

    #[test]
    fn non_admin_cannot_add_members() {
        let ctx = ContextBuilder::new(member()).build();
        let err = MembershipContract
            .execute(
                fresh_state(),
                MembershipCall::AddMembers(vec![member()]),
                ctx,
            )
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized(_)));
    }

    #[test]
    fn admin_adds_members_with_duplicates() {
        let ctx = ContextBuilder::new(admin()).build();
        let transition = MembershipContract
            .execute(
                fresh_state(),
                MembershipCall::AddMembers(vec![admin(), member(), member()]),
                ctx,
            )
            .unwrap();
        assert!(transition.state().is_member(&member()));
        assert_eq!(transition.state().members.len(), 2);
        assert!(transition.effects().is_empty());
    }

    #[test]
    fn set_base_uri_stores_prefix() {
        let ctx = ContextBuilder::new(admin()).build();
        let uri = "QmaWR24s73r45QPVGfMH1RF8Dx4E8eGVUQwxUsSQauHZAB";
        let transition = MembershipContract
            .execute(
                fresh_state(),
                MembershipCall::SetBaseUri(uri.to_string()),
                ctx,
            )
            .unwrap();
        assert_eq!(transition.state().base_uri.as_deref(), Some(uri));
    }

    #[test]
    fn admin_mint_produces_one_token() {
        let ctx = ContextBuilder::new(admin()).build();
        let transition = MembershipContract
            .execute(fresh_state(), MembershipCall::MintAdmin, ctx)
            .unwrap();
        assert_eq!(
            transition.effects(),
            &[Effect::Mint {
                amount: 1,
                asset_name: Some("DNU".to_string()),
                recipient: admin(),
            }]
        );
    }

    #[test]
    fn repeat_mint_is_a_no_op() {
        let ctx = ContextBuilder::new(admin()).build();
        let first = MembershipContract
            .execute(fresh_state(), MembershipCall::MintAdmin, ctx.clone())
            .unwrap();
        let second = MembershipContract
            .execute(first.state().clone(), MembershipCall::MintAdmin, ctx)
            .unwrap();
        assert!(second.effects().is_empty());
        assert_eq!(second.state(), first.state());
    }

    #[test]
    fn added_member_can_mint_but_stranger_cannot() {
        let admin_ctx = ContextBuilder::new(admin()).build();
        let member_ctx = ContextBuilder::new(member()).build();

        let err = MembershipContract
            .execute(fresh_state(), MembershipCall::Mint, member_ctx.clone())
            .unwrap_err();
        assert!(matches!(err, ContractError::Unauthorized(_)));

        let admitted = MembershipContract
            .execute(
                fresh_state(),
                MembershipCall::AddMembers(vec![member()]),
                admin_ctx,
            )
            .unwrap();
        let minted = MembershipContract
            .execute(admitted.state().clone(), MembershipCall::Mint, member_ctx)
            .unwrap();
        assert_eq!(minted.effects().len(), 1);
    }
}
