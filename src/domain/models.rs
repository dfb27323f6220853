use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, instruction::Instruction, pubkey::Pubkey};
use std::{fmt, str::FromStr};

use super::errors::ActionError;

/// Native SOL transfer requested by a wallet.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferRequest {
    /// Sender and fee payer
    pub account: Pubkey,
    /// Amount of SOL to send
    pub amount: f64,
    /// Explicit recipient. A fresh key is generated when absent
    pub to: Option<Pubkey>,
}

/// NFT mint requested by a wallet.
#[derive(Clone, Debug, PartialEq)]
pub struct MintRequest {
    /// Fee payer, mint authority and owner of the minted token
    pub account: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

/// On-chain memo requested by a wallet.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoRequest {
    pub account: Pubkey,
    pub message: String,
}

/// Instructions bound to a fee payer and a blockhash, not signed by anyone.
#[derive(Clone, Debug)]
pub struct UnsignedTransaction {
    pub instructions: Vec<Instruction>,
    pub fee_payer: Pubkey,
    pub recent_blockhash: Hash,
}

/// Body of the `POST /api/actions/{action}` request.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ActionPostRequest {
    /// Base58 encoded public key of the account that will sign the transaction
    pub account: Option<String>,
}

/// Body of a successful `POST /api/actions/{action}` response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionPostResponse {
    /// Base64 encoded serialized transaction
    pub transaction: String,
    /// Describes the nature of the transaction
    pub message: String,
}

/// Body returned on every failed request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionErrorResponse {
    pub message: String,
}

/// Metadata returned by `GET /api/actions/{action}`.
#[derive(Clone, Debug, Serialize)]
pub struct ActionGetResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub label: String,
    pub links: ActionLinks,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LinkedAction {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ActionParameter>>,
}

/// User input accepted by a linked action.
#[derive(Clone, Debug, Serialize)]
pub struct ActionParameter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    pub name: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

/// `actions.json` rule document.
#[derive(Clone, Debug, Serialize)]
pub struct ActionsJson {
    pub rules: Vec<ActionRule>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    pub path_pattern: String,
    pub api_path: String,
}

/// Actions served under `/api/actions/{action}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    TransferSol,
    MintNft,
    Memo,
}

impl ActionKind {
    pub fn path(&self) -> &'static str {
        match self {
            ActionKind::TransferSol => "transfer-sol",
            ActionKind::MintNft => "mint-nft",
            ActionKind::Memo => "memo",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for ActionKind {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer-sol" => Ok(ActionKind::TransferSol),
            // older clients link the underscore form
            "mint-nft" | "mint_nft" => Ok(ActionKind::MintNft),
            "memo" => Ok(ActionKind::Memo),
            other => Err(ActionError::UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_from_path() {
        assert_eq!(
            "transfer-sol".parse::<ActionKind>().unwrap(),
            ActionKind::TransferSol
        );
        assert_eq!("mint_nft".parse::<ActionKind>().unwrap(), ActionKind::MintNft);
        assert_eq!("mint-nft".parse::<ActionKind>().unwrap(), ActionKind::MintNft);
        assert!(matches!(
            "stake".parse::<ActionKind>(),
            Err(ActionError::UnknownAction(name)) if name == "stake"
        ));
    }

    #[test]
    fn test_action_parameter_skips_empty_fields() {
        let parameter = ActionParameter {
            kind: None,
            name: "amount".to_string(),
            label: "Enter the amount of SOL to send".to_string(),
            required: true,
            min: None,
            max: None,
        };
        let value = serde_json::to_value(parameter).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "amount",
                "label": "Enter the amount of SOL to send",
                "required": true,
            })
        );
    }

    #[test]
    fn test_action_rule_is_camel_case() {
        let rule = ActionRule {
            path_pattern: "/*".to_string(),
            api_path: "/api/actions/*".to_string(),
        };
        let value = serde_json::to_value(rule).unwrap();
        assert_eq!(value["pathPattern"], "/*");
        assert_eq!(value["apiPath"], "/api/actions/*");
    }
}
