use alloy::primitives::Address;
use color_eyre::eyre::Result;
use safe_clone::{NoticeKind, ScanConfig, Session, SessionConfig};

use crate::cli::StatusArgs;
use crate::config;
use crate::output::StatusOutput;

pub async fn run(args: StatusArgs, json: bool) -> Result<()> {
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
    let mut board = session.board(address, recovered.params.clone());
    session
        .refresh_board(&mut board, Some(&recovered.transaction))
        .await;

    let errors = board
        .notices()
        .into_iter()
        .filter(|notice| notice.kind == NoticeKind::Error)
        .map(|notice| format!("chain {}: {}", notice.chain_id, notice.message))
        .collect();

    let output = StatusOutput {
        address,
        created_on: recovered.chain_id,
        chains: board.statuses().to_vec(),
        errors,
    };

    output.print(json);

    Ok(())
}
