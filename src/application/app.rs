use super::builder::TransactionBuilder;
use super::formatter::format_response;
use crate::config::Config;
use crate::domain::errors::ActionError;
use crate::domain::models::{ActionPostResponse, MemoRequest, MintRequest, TransferRequest};
use crate::domain::validation::sol_to_lamports;
use crate::infrastructure::bc_client::BcClient;
use crate::infrastructure::solana_client::SolanaClient;
use solana_sdk::{signature::Keypair, signer::Signer};

#[async_trait::async_trait]
pub trait Application {
    async fn transfer_sol(
        &self,
        request: TransferRequest,
    ) -> Result<ActionPostResponse, ActionError>;
    async fn mint_nft(&self, request: MintRequest) -> Result<ActionPostResponse, ActionError>;
    async fn write_memo(&self, request: MemoRequest) -> Result<ActionPostResponse, ActionError>;
}

#[derive(Clone)]
pub struct App<C> {
    builder: TransactionBuilder<C>,
}

impl App<SolanaClient> {
    pub fn new(config: &Config) -> Self {
        let bc_client = SolanaClient::from_url(
            &config.rpc_endpoint,
            config.rpc_timeout(),
            config.num_retries,
        );
        tracing::info!("Solana rpc client targeting {}", bc_client.url());
        Self::with_client(bc_client)
    }
}

impl<C> App<C>
where
    C: BcClient,
{
    pub fn with_client(bc_client: C) -> Self {
        Self {
            builder: TransactionBuilder::builder().bc_client(bc_client).build(),
        }
    }
}

#[async_trait::async_trait]
impl<C> Application for App<C>
where
    C: BcClient + Send + Sync + 'static,
{
    async fn transfer_sol(
        &self,
        request: TransferRequest,
    ) -> Result<ActionPostResponse, ActionError> {
        let lamports = sol_to_lamports(request.amount)?;
        let to = request.to.unwrap_or_else(|| Keypair::new().pubkey());
        tracing::info!(
            "Building transfer of {} lamports from {} to {}",
            lamports,
            request.account,
            to
        );

        let serialized = self
            .builder
            .transfer(&request.account, &to, lamports)
            .await?
            .serialize()?;
        Ok(format_response(
            &serialized,
            format!("Send {} SOL to {}", request.amount, to),
        ))
    }

    async fn mint_nft(&self, request: MintRequest) -> Result<ActionPostResponse, ActionError> {
        tracing::info!("Building NFT mint '{}' for {}", request.name, request.account);

        let (unsigned, mint) = self.builder.mint_nft(&request).await?;
        let serialized = unsigned.serialize()?;
        tracing::info!("NFT mint {} prepared", mint);
        Ok(format_response(
            &serialized,
            format!("Mint NFT {}", request.name),
        ))
    }

    async fn write_memo(&self, request: MemoRequest) -> Result<ActionPostResponse, ActionError> {
        tracing::info!("Building memo for {}", request.account);

        let serialized = self.builder.memo(&request).await?.serialize()?;
        Ok(format_response(
            &serialized,
            format!("Write memo: \"{}\"", request.message),
        ))
    }
}
