use alloy::primitives::{Address, U256};
use color_eyre::eyre::{bail, Result};
use safe_clone::{ExecutorConfig, FeeConfig, ScanConfig, Session, SessionConfig};
use tracing::info;

use crate::cli::DeployArgs;
use crate::config;
use crate::output::{confirm_prompt, DeployOutput};
use crate::wallet::create_signer;

fn fee_config(args: &DeployArgs) -> Result<FeeConfig> {
    let receiver = match &args.fee_receiver {
        Some(receiver) => receiver.parse()?,
        None => Address::ZERO,
    };
    Ok(FeeConfig {
        receiver,
        amount: args.fee_wei.parse::<U256>()?,
        exempt_chains: args.fee_exempt.clone(),
    })
}

pub async fn run(args: DeployArgs, json: bool) -> Result<()> {
    let address: Address = args.address.parse()?;
    let entries = config::load_chains(&args.chains.path)?;
    let signer = create_signer(&args.wallet)?;
    let account = signer.address();

    let session_config = SessionConfig {
        scan: ScanConfig {
            log_window: args.chains.log_window,
        },
        fees: fee_config(&args)?,
        executor: ExecutorConfig {
            confirmations: args.confirmations,
        },
    };
    let mut session = Session::connect(
        account,
        config::wallet_chains(&entries, signer),
        config::indexer(&entries),
        session_config,
    );

    let recovered = session.recover(address).await?;
    let mut board = session.board(address, recovered.params.clone());
    let status = session
        .check_chain(
            args.chain,
            &recovered.params,
            address,
            Some(&recovered.transaction),
        )
        .await?;
    board.update(status);

    if status.is_deployed {
        DeployOutput {
            address,
            receipt: None,
            already_deployed: true,
        }
        .print(json);
        return Ok(());
    }
    if !status.can_deploy {
        bail!(
            "Safe {} cannot be reproduced on chain {} (variant {})",
            address,
            args.chain,
            recovered.params.variant
        );
    }

    info!(chain_id = args.chain, method = ?status.method, %account, "deployment is feasible");

    if !args.no_confirm && !json {
        let mut message = format!(
            "Deploy Safe {} on chain {} from {} ({:?})",
            address, args.chain, account, status.method
        );
        if let Some(fee) = session.config().fees.fee_for(args.chain) {
            message.push_str(&format!(" with a fee of {} wei", fee));
        }
        if !confirm_prompt(&format!("{}?", message)) {
            println!("Aborted");
            return Ok(());
        }
    }

    let result = session
        .deploy_on_board(&mut board, args.chain, Some(&recovered.transaction))
        .await;
    session.disconnect();
    for notice in board.notices() {
        info!(chain_id = notice.chain_id, kind = ?notice.kind, "{}", notice.message);
    }
    let receipt = result?;

    DeployOutput {
        address,
        receipt: Some(receipt),
        already_deployed: false,
    }
    .print(json);

    Ok(())
}
