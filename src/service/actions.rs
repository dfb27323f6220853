use crate::domain::models::{
    ActionGetResponse, ActionKind, ActionLinks, ActionParameter, ActionRule, ActionsJson,
    LinkedAction,
};
use crate::domain::validation::MAX_MEMO_LEN;

pub const ACTIONS_ICON: &str = "https://solana-actions.vercel.app/solana_devs.jpg";

/// Maps website paths to the action API.
pub fn actions_json() -> ActionsJson {
    ActionsJson {
        rules: vec![
            ActionRule {
                path_pattern: "/*".to_string(),
                api_path: "/api/actions/*".to_string(),
            },
            ActionRule {
                path_pattern: "/api/actions/**".to_string(),
                api_path: "/api/actions/**".to_string(),
            },
        ],
    }
}

fn parameter(name: &str, label: &str) -> ActionParameter {
    ActionParameter {
        kind: None,
        name: name.to_string(),
        label: label.to_string(),
        required: true,
        min: None,
        max: None,
    }
}

fn link(label: &str, href: String, parameters: Option<Vec<ActionParameter>>) -> LinkedAction {
    LinkedAction {
        label: label.to_string(),
        href,
        parameters,
    }
}

pub fn describe(action: ActionKind) -> ActionGetResponse {
    let base_href = format!("/api/actions/{}", action.path());
    let (title, description, label, actions) = match action {
        ActionKind::TransferSol => (
            "Actions Example - Transfer Native SOL",
            "Transfer SOL to another Solana wallet",
            "Transfer",
            vec![
                link("Send 1 SOL", format!("{base_href}?amount=1"), None),
                link("Send 5 SOL", format!("{base_href}?amount=5"), None),
                link("Send 10 SOL", format!("{base_href}?amount=10"), None),
                link(
                    "Send SOL",
                    format!("{base_href}?amount={{amount}}"),
                    Some(vec![parameter("amount", "Enter the amount of SOL to send")]),
                ),
            ],
        ),
        ActionKind::MintNft => (
            "Actions Example - Mint NFT",
            "Mint an NFT with a master edition to your wallet",
            "Mint",
            vec![link(
                "Mint NFT",
                format!("{base_href}?name={{name}}&symbol={{symbol}}&uri={{uri}}"),
                Some(vec![
                    parameter("name", "Enter the Name of the NFT"),
                    parameter("symbol", "Enter the Symbol of the NFT"),
                    parameter("uri", "Enter the Uri of the NFT"),
                ]),
            )],
        ),
        ActionKind::Memo => (
            "Actions Example - Write Memo",
            "Write a message to the Solana network",
            "Write",
            vec![link(
                "Write Message",
                format!("{base_href}?message={{message}}"),
                Some(vec![ActionParameter {
                    kind: Some("textarea"),
                    min: Some(1),
                    max: Some(MAX_MEMO_LEN as u32),
                    ..parameter("message", "Enter your message")
                }]),
            )],
        ),
    };

    ActionGetResponse {
        kind: "action",
        icon: ACTIONS_ICON.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        label: label.to_string(),
        links: ActionLinks { actions },
    }
}
