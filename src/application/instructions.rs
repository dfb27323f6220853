//! Ordered instruction lists for every action.
//!
//! Everything here is pure: addresses are derived locally and the network facts
//! (rent, blockhash) are passed in by the builder.

use mpl_token_metadata::{
    accounts::{MasterEdition, Metadata},
    instructions::{CreateMasterEditionV3Builder, CreateMetadataAccountV3Builder},
    types::{Collection, Creator, DataV2},
};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    program_pack::Pack,
    pubkey::Pubkey,
};
use solana_system_interface::{instruction as system_instruction, program as system_program};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};
use spl_token::state::Mint;

use crate::domain::{errors::ActionError, models::MintRequest};

pub const MEMO_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr");

/// Royalty charged on secondary sales of a minted NFT, in basis points.
pub const SELLER_FEE_BASIS_POINTS: u16 = 100;

/// Size of the SPL mint account created for every NFT.
pub const MINT_ACCOUNT_LEN: usize = Mint::LEN;

/// Addresses taking part in an NFT mint.
#[derive(Clone, Debug, PartialEq)]
pub struct MintAccounts {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub collection: Pubkey,
    pub associated_token_account: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

impl MintAccounts {
    /// Derives the token account, metadata and master edition addresses for `mint`.
    pub fn derive(owner: Pubkey, mint: Pubkey, collection: Pubkey) -> Self {
        Self {
            owner,
            mint,
            collection,
            associated_token_account: get_associated_token_address(&owner, &mint),
            metadata: Metadata::find_pda(&mint).0,
            master_edition: MasterEdition::find_pda(&mint).0,
        }
    }
}

pub fn transfer_instructions(from: &Pubkey, to: &Pubkey, lamports: u64) -> Vec<Instruction> {
    vec![system_instruction::transfer(from, to, lamports)]
}

/// Builds the six NFT mint instructions. The order is a contract: the mint account
/// must exist before it is initialized, and the token must be minted before the
/// master edition freezes the supply.
pub fn mint_nft_instructions(
    accounts: &MintAccounts,
    request: &MintRequest,
    mint_rent: u64,
) -> Result<Vec<Instruction>, ActionError> {
    let owner = accounts.owner;
    let mint = accounts.mint;
    let token_program = spl_token::id();

    let create_mint_account = system_instruction::create_account(
        &owner,
        &mint,
        mint_rent,
        MINT_ACCOUNT_LEN as u64,
        &token_program,
    );

    let initialize_mint =
        spl_token::instruction::initialize_mint(&token_program, &mint, &owner, Some(&owner), 0)?;

    let create_metadata = CreateMetadataAccountV3Builder::new()
        .metadata(accounts.metadata)
        .mint(mint)
        .mint_authority(owner)
        .payer(owner)
        .update_authority(owner, true)
        .system_program(system_program::id())
        .data(DataV2 {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri: request.uri.clone(),
            seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
            creators: Some(vec![Creator {
                address: owner,
                verified: true,
                share: 100,
            }]),
            collection: Some(Collection {
                verified: false,
                key: accounts.collection,
            }),
            uses: None,
        })
        .is_mutable(true)
        .instruction();

    let create_token_account =
        create_associated_token_account(&owner, &owner, &mint, &token_program);

    let mint_to = spl_token::instruction::mint_to(
        &token_program,
        &mint,
        &accounts.associated_token_account,
        &owner,
        &[],
        1,
    )?;

    let create_master_edition = CreateMasterEditionV3Builder::new()
        .edition(accounts.master_edition)
        .mint(mint)
        .update_authority(owner)
        .mint_authority(owner)
        .payer(owner)
        .metadata(accounts.metadata)
        .token_program(token_program)
        .system_program(system_program::id())
        .max_supply(0)
        .instruction();

    Ok(vec![
        create_mint_account,
        initialize_mint,
        create_metadata,
        create_token_account,
        mint_to,
        create_master_edition,
    ])
}

pub fn memo_instructions(signer: &Pubkey, message: &str) -> Vec<Instruction> {
    vec![Instruction::new_with_bytes(
        MEMO_PROGRAM_ID,
        message.as_bytes(),
        vec![AccountMeta::new_readonly(*signer, true)],
    )]
}
