use alloy::primitives::Address;
use color_eyre::eyre::Result;
use safe_clone::{ScanConfig, Session, SessionConfig};

use crate::cli::LocateArgs;
use crate::config;
use crate::output::LocateOutput;

pub async fn run(args: LocateArgs, json: bool) -> Result<()> {
    let address: Address = args.address.parse()?;
    let entries = config::load_chains(&args.chains.path)?;

    let session_config = SessionConfig {
        scan: ScanConfig {
            log_window: args.chains.log_window,
        },
        ..Default::default()
    };
    let session = Session::read_only(
        config::read_only_chains(&entries),
        config::indexer(&entries),
        session_config,
    );

    let recovered = session.recover(address).await?;
    let params = &recovered.params;

    let output = LocateOutput {
        address,
        chain_id: recovered.chain_id,
        tx_hash: recovered.transaction.hash,
        variant: params.variant.to_string(),
        owners: params.owners.clone(),
        threshold: params.threshold,
        salt_nonce: params.salt,
        payment_receiver: params.payment_receiver,
    };

    output.print(json);

    Ok(())
}
