use solana_sdk::{
    message::Message, pubkey::Pubkey, signature::Keypair, signer::Signer,
    transaction::Transaction,
};
use typed_builder::TypedBuilder;

use super::instructions::{
    memo_instructions, mint_nft_instructions, transfer_instructions, MintAccounts,
    MINT_ACCOUNT_LEN,
};
use crate::{
    domain::{
        errors::{ActionError, ValidationError},
        models::{MemoRequest, MintRequest, UnsignedTransaction},
    },
    infrastructure::bc_client::BcClient,
};

impl UnsignedTransaction {
    /// Wraps the instructions in a legacy transaction whose signatures are left empty.
    pub fn into_transaction(self) -> Transaction {
        let message = Message::new_with_blockhash(
            &self.instructions,
            Some(&self.fee_payer),
            &self.recent_blockhash,
        );
        Transaction::new_unsigned(message)
    }

    /// Serializes the unsigned transaction to its wire format.
    pub fn serialize(self) -> Result<Vec<u8>, ActionError> {
        let transaction = self.into_transaction();
        Ok(bincode::serialize(&transaction)?)
    }
}

/// Assembles unsigned transactions for every action.
#[derive(Clone, TypedBuilder)]
pub struct TransactionBuilder<C> {
    bc_client: C,
}

impl<C> TransactionBuilder<C>
where
    C: BcClient,
{
    /// Native transfer from `from` to `to`. The recipient must end up rent exempt.
    pub async fn transfer(
        &self,
        from: &Pubkey,
        to: &Pubkey,
        lamports: u64,
    ) -> Result<UnsignedTransaction, ActionError> {
        let minimum_balance = self
            .bc_client
            .get_minimum_balance_for_rent_exemption(0)
            .await?;
        if lamports < minimum_balance {
            return Err(ValidationError::invalid(
                "amount",
                format!("account may not be rent exempt: {to}"),
            )
            .into());
        }

        let recent_blockhash = self.bc_client.get_latest_blockhash().await?;

        Ok(UnsignedTransaction {
            instructions: transfer_instructions(from, to, lamports),
            fee_payer: *from,
            recent_blockhash,
        })
    }

    /// NFT mint with a master edition, owned and paid for by the requesting account.
    /// Returns the transaction together with the address of the new mint.
    pub async fn mint_nft(
        &self,
        request: &MintRequest,
    ) -> Result<(UnsignedTransaction, Pubkey), ActionError> {
        let mint = Keypair::new().pubkey();
        let collection = Keypair::new().pubkey();
        let accounts = MintAccounts::derive(request.account, mint, collection);
        tracing::debug!(
            "Mint {} with metadata {} and token account {}",
            accounts.mint,
            accounts.metadata,
            accounts.associated_token_account
        );

        let mint_rent = self
            .bc_client
            .get_minimum_balance_for_rent_exemption(MINT_ACCOUNT_LEN)
            .await?;
        let recent_blockhash = self.bc_client.get_latest_blockhash().await?;

        let instructions = mint_nft_instructions(&accounts, request, mint_rent)?;

        Ok((
            UnsignedTransaction {
                instructions,
                fee_payer: request.account,
                recent_blockhash,
            },
            mint,
        ))
    }

    pub async fn memo(&self, request: &MemoRequest) -> Result<UnsignedTransaction, ActionError> {
        let recent_blockhash = self.bc_client.get_latest_blockhash().await?;

        Ok(UnsignedTransaction {
            instructions: memo_instructions(&request.account, &request.message),
            fee_payer: request.account,
            recent_blockhash,
        })
    }
}
