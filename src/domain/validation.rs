//! Turns raw query parameters and the JSON body into typed requests.

use mpl_token_metadata::{MAX_NAME_LENGTH, MAX_SYMBOL_LENGTH, MAX_URI_LENGTH};
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};
use std::{collections::HashMap, str::FromStr};

use super::{
    errors::ValidationError,
    models::{MemoRequest, MintRequest, TransferRequest},
};

/// Longest memo accepted, in characters.
pub const MAX_MEMO_LEN: usize = 256;

pub type QueryParams = HashMap<String, String>;

pub fn parse_account(account: Option<&str>) -> Result<Pubkey, ValidationError> {
    let account = account
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or(ValidationError::MissingField("account"))?;
    parse_pubkey("account", account)
}

fn parse_pubkey(field: &'static str, value: &str) -> Result<Pubkey, ValidationError> {
    Pubkey::from_str(value).map_err(|e| ValidationError::invalid(field, e.to_string()))
}

fn required<'a>(params: &'a QueryParams, field: &'static str) -> Result<&'a str, ValidationError> {
    params
        .get(field)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))
}

/// Token metadata limits are in bytes, not characters.
fn bounded(value: &str, field: &'static str, max: usize) -> Result<String, ValidationError> {
    if value.len() > max {
        return Err(ValidationError::invalid(
            field,
            format!("must be at most {max} bytes"),
        ));
    }
    Ok(value.to_string())
}

/// Converts SOL to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(amount: f64) -> Result<u64, ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::invalid("amount", "must be greater than 0"));
    }
    let lamports = (amount * LAMPORTS_PER_SOL as f64).round();
    if lamports < 1.0 {
        return Err(ValidationError::invalid("amount", "less than one lamport"));
    }
    if lamports >= u64::MAX as f64 {
        return Err(ValidationError::invalid("amount", "too large"));
    }
    Ok(lamports as u64)
}

pub fn parse_transfer(
    params: &QueryParams,
    account: Option<&str>,
) -> Result<TransferRequest, ValidationError> {
    let amount = required(params, "amount")?;
    let amount = amount.parse::<f64>().map_err(|_| {
        ValidationError::invalid("amount", format!("'{amount}' is not a number"))
    })?;
    sol_to_lamports(amount)?;

    let to = match params.get("to").map(|v| v.trim()).filter(|v| !v.is_empty()) {
        Some(to) => Some(parse_pubkey("to", to)?),
        None => None,
    };

    Ok(TransferRequest {
        account: parse_account(account)?,
        amount,
        to,
    })
}

pub fn parse_mint(
    params: &QueryParams,
    account: Option<&str>,
) -> Result<MintRequest, ValidationError> {
    let name = bounded(required(params, "name")?, "name", MAX_NAME_LENGTH)?;
    let symbol = bounded(required(params, "symbol")?, "symbol", MAX_SYMBOL_LENGTH)?;
    let uri = bounded(required(params, "uri")?, "uri", MAX_URI_LENGTH)?;

    Ok(MintRequest {
        account: parse_account(account)?,
        name,
        symbol,
        uri,
    })
}

pub fn parse_memo(
    params: &QueryParams,
    account: Option<&str>,
) -> Result<MemoRequest, ValidationError> {
    let message = params
        .get("message")
        .filter(|m| !m.is_empty())
        .ok_or(ValidationError::MissingField("message"))?;
    if message.chars().count() > MAX_MEMO_LEN {
        return Err(ValidationError::invalid(
            "message",
            format!("must be at most {MAX_MEMO_LEN} characters"),
        ));
    }

    Ok(MemoRequest {
        account: parse_account(account)?,
        message: message.clone(),
    })
}
