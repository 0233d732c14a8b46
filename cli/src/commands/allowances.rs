use std::time::Duration;

use alloy::primitives::Address;
use color_eyre::eyre::{eyre, Result};
use safe_clone::allowance::{AllowanceReconciler, AllowanceSet, Erc20AllowanceReader};
use safe_clone::AllowanceConfig;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::AllowancesArgs;
use crate::config;
use crate::output::AllowancesOutput;

fn output(owner: Address, chain_id: u64, head: u64, set: &AllowanceSet, all: bool) -> AllowancesOutput {
    let allowances = if all {
        set.iter().cloned().collect()
    } else {
        set.non_zero().cloned().collect()
    };
    AllowancesOutput {
        owner,
        chain_id,
        head,
        allowances,
    }
}

pub async fn run(args: AllowancesArgs, json: bool) -> Result<()> {
    let owner: Address = args.owner.parse()?;
    let tokens = args
        .tokens
        .iter()
        .map(|token| token.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;

    let entries = config::load_chains(&args.chains.path)?;
    let entry = entries
        .iter()
        .find(|entry| entry.chain_id == args.chain)
        .ok_or_else(|| eyre!("chain {} is not in the chains file", args.chain))?;
    let chain = config::read_only_chains(std::slice::from_ref(entry))
        .into_iter()
        .next()
        .ok_or_else(|| eyre!("no client for chain {}", args.chain))?;
    let client = chain.client;

    let mut reconciler = AllowanceReconciler::new(
        args.chain,
        owner,
        tokens,
        AllowanceConfig {
            page_size: args.page_size,
            start_block: args.from_block,
        },
    );

    if !args.follow {
        let report = reconciler.sync(&client).await?;
        if report.failed_pages > 0 {
            warn!(
                failed_pages = report.failed_pages,
                "some log pages failed; results may be incomplete"
            );
        }
        let set = reconciler
            .reconcile(&Erc20AllowanceReader::new(&client))
            .await;
        output(owner, args.chain, report.head, &set, args.all).print(json);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            let _ = shutdown_tx.send(true);
        }
    });

    let chain_id = args.chain;
    let all = args.all;
    let mut last_printed: Option<AllowanceSet> = None;
    reconciler
        .follow(
            &client,
            Duration::from_secs(args.interval),
            shutdown_rx,
            |head, set| {
                if last_printed.as_ref() == Some(set) {
                    return;
                }
                output(owner, chain_id, head, set, all).print(json);
                last_printed = Some(set.clone());
            },
        )
        .await?;

    Ok(())
}
