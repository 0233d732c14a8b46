use alloy::primitives::{Address, Bytes, TxHash, U256};
use safe_clone::{ChainDeploymentStatus, DeployMethod, DeploymentReceipt, ReconciledAllowance};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap());
}

fn method_label(method: DeployMethod) -> &'static str {
    match method {
        DeployMethod::Factory => "factory",
        DeployMethod::DirectReplay => "direct replay",
        DeployMethod::None => "none",
    }
}

#[derive(Serialize)]
pub struct LocateOutput {
    pub address: Address,
    pub chain_id: u64,
    pub tx_hash: TxHash,
    pub variant: String,
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub salt_nonce: U256,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_receiver: Option<Address>,
}

impl LocateOutput {
    pub fn print(&self, json: bool) {
        if json {
            print_json(self);
        } else {
            println!("Safe: {}", self.address);
            println!("  Created on chain: {}", self.chain_id);
            println!("  Tx Hash: {}", self.tx_hash);
            println!("  Variant: {}", self.variant);
            println!("  Salt Nonce: {}", self.salt_nonce);
            println!("  Threshold: {}", self.threshold);
            if let Some(receiver) = self.payment_receiver {
                println!("  Payment Receiver: {}", receiver);
            }
            println!("  Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("    {}: {}", i + 1, owner);
            }
        }
    }
}

#[derive(Serialize)]
pub struct StatusOutput {
    pub address: Address,
    pub created_on: u64,
    pub chains: Vec<ChainDeploymentStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl StatusOutput {
    pub fn print(&self, json: bool) {
        if json {
            print_json(self);
        } else {
            println!("Safe: {} (created on chain {})", self.address, self.created_on);
            for status in &self.chains {
                let state = if status.is_deployed {
                    "deployed".to_string()
                } else if status.can_deploy {
                    format!("deployable ({})", method_label(status.method))
                } else {
                    "cannot deploy".to_string()
                };
                println!("  {:>10}: {}", status.chain_id, state);
            }
            for error in &self.errors {
                println!("  ! {}", error);
            }
        }
    }
}

#[derive(Serialize)]
pub struct DeployOutput {
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<DeploymentReceipt>,
    pub already_deployed: bool,
}

impl DeployOutput {
    pub fn print(&self, json: bool) {
        if json {
            print_json(self);
        } else if self.already_deployed {
            println!("Safe {} is already deployed", self.address);
        } else if let Some(receipt) = &self.receipt {
            println!("Safe Deployed:");
            println!("  Address: {}", self.address);
            println!("  Chain: {}", receipt.chain_id);
            println!("  Method: {}", method_label(receipt.method));
            println!("  Tx Hash: {}", receipt.tx_hash);
            if let Some(fee) = receipt.fee {
                println!("  Fee: {} wei", fee);
            }
            if let Some(warning) = &receipt.gas_warning {
                println!("  Warning: {}", warning);
            }
            match (&receipt.status, &receipt.recheck_error) {
                (Some(status), _) => println!("  Code at address: {}", status.is_deployed),
                (None, Some(error)) => println!("  Status re-check failed: {}", error),
                (None, None) => {}
            }
        }
    }
}

#[derive(Serialize)]
pub struct PredictOutput {
    pub safe_address: Address,
    pub variant: String,
    pub owners: Vec<Address>,
    pub threshold: u64,
    pub salt_nonce: U256,
    pub already_deployed: bool,
    pub initializer: Bytes,
    pub create_call: Bytes,
}

impl PredictOutput {
    pub fn print(&self, json: bool) {
        if json {
            print_json(self);
        } else {
            println!("Safe Address: {}", self.safe_address);
            if self.already_deployed {
                println!("  Status: Already deployed");
            }
            println!("  Variant: {}", self.variant);
            println!("  Salt Nonce: {}", self.salt_nonce);
            println!("  Threshold: {}", self.threshold);
            println!("  Owners:");
            for (i, owner) in self.owners.iter().enumerate() {
                println!("    {}: {}", i + 1, owner);
            }
            println!("  Factory Calldata: {}", self.create_call);
        }
    }
}

#[derive(Serialize)]
pub struct AllowancesOutput {
    pub owner: Address,
    pub chain_id: u64,
    pub head: u64,
    pub allowances: Vec<ReconciledAllowance>,
}

impl AllowancesOutput {
    pub fn print(&self, json: bool) {
        if json {
            // one line per update so --follow output stays parseable
            println!("{}", serde_json::to_string(self).unwrap());
        } else {
            println!(
                "Allowances of {} on chain {} (block {}):",
                self.owner, self.chain_id, self.head
            );
            if self.allowances.is_empty() {
                println!("  none");
            }
            for allowance in &self.allowances {
                let value = if allowance.value == U256::MAX {
                    "unlimited".to_string()
                } else {
                    allowance.value.to_string()
                };
                println!(
                    "  token {} spender {}: {} (approved in block {})",
                    allowance.token, allowance.spender, value, allowance.last_event.block_number
                );
            }
        }
    }
}

pub fn confirm_prompt(message: &str) -> bool {
    use dialoguer::Confirm;

    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}
