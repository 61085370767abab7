use anyhow::{anyhow, bail, Result};
use clap::Parser;
use dromon::{
    address::{Address, ADDRESS_LENGTH},
    devnet::{
        get_devnet_chain_client_from_file, init_devnet, path_to_devnet_config_dir, DevnetConfig,
    },
    smart_contract::{SmartContract, SmartContractTrait},
};
use membership_token::{
    contract::{MembershipCall, MembershipState},
    logic::{MembershipEndpoints, MembershipLogic, MembershipLookupResponses, MembershipLookups},
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    action: ActionParams,
}

#[derive(clap::Subcommand, Debug)]
enum ActionParams {
    /// Create a local devnet with a freshly generated, funded signer
    Init,
    /// Deploy the membership contract
    Deploy { name: String, symbol: String },
    /// Register members by bech32 address
    AddMembers { addresses: Vec<String> },
    /// Set the shared metadata URI prefix
    SetBaseUri { base_uri: String },
    /// Mint the signer's token through the admin gate
    MintAdmin,
    /// Mint the signer's token through the membership gate
    Mint,
    /// Token balance of an address
    Balance { address: String },
    /// Membership status of an address
    IsMember { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let ActionParams::Init = args.action {
        return init_impl().await;
    }

    let chain_client =
        get_devnet_chain_client_from_file::<MembershipState, MembershipCall>().await?;
    let contract = SmartContract::new(MembershipLogic, chain_client);

    match args.action {
        ActionParams::Init => unreachable!("handled above"),
        ActionParams::Deploy { name, symbol } => {
            let tx_id = contract
                .hit_endpoint(MembershipEndpoints::Deploy { name, symbol })
                .await?;
            println!("Deployed membership contract: {}", tx_id.as_str());
        }
        ActionParams::AddMembers { addresses } => {
            let members = addresses
                .iter()
                .map(|raw| parse_address(raw))
                .collect::<Result<Vec<_>>>()?;
            contract
                .hit_endpoint(MembershipEndpoints::AddMembers { members })
                .await?;
            println!("Members added");
        }
        ActionParams::SetBaseUri { base_uri } => {
            contract
                .hit_endpoint(MembershipEndpoints::SetBaseUri { base_uri })
                .await?;
            println!("Base URI updated");
        }
        ActionParams::MintAdmin => {
            contract
                .hit_endpoint(MembershipEndpoints::MintAdmin)
                .await?;
            println!("Minted admin token");
        }
        ActionParams::Mint => {
            contract.hit_endpoint(MembershipEndpoints::Mint).await?;
            println!("Minted member token");
        }
        ActionParams::Balance { address } => {
            let address = parse_address(&address)?;
            match contract
                .lookup(MembershipLookups::BalanceOf { address })
                .await?
            {
                MembershipLookupResponses::Balance(balance) => {
                    println!("Balance: {balance}");
                }
                _ => bail!("Failed to retrieve balance"),
            }
        }
        ActionParams::IsMember { address } => {
            let address = parse_address(&address)?;
            match contract
                .lookup(MembershipLookups::IsMember { address })
                .await?
            {
                MembershipLookupResponses::IsMember(flag) => {
                    println!("Member: {flag}");
                }
                _ => bail!("Failed to retrieve membership status"),
            }
        }
    }
    Ok(())
}

async fn init_impl() -> Result<()> {
    let bytes: [u8; ADDRESS_LENGTH] = rand::random();
    let signer = Address::new(bytes);
    let chain_dir = path_to_devnet_config_dir()?.join("devnet");
    let starting_coin = 100_000_000;
    let config = DevnetConfig::new(chain_dir, &signer, starting_coin);
    init_devnet(&config).await?;
    println!("Devnet initialized with signer: {signer}");
    Ok(())
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_bech32(raw).map_err(|e| anyhow!("Bad address {raw}: {e}"))
}
