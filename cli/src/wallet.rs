use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::{eyre, Result};

use crate::cli::WalletArgs;

pub fn create_signer(args: &WalletArgs) -> Result<PrivateKeySigner> {
    // Priority: interactive > keystore > private_key
    if args.interactive {
        let key = rpassword::prompt_password("Enter private key: ")?;
        parse_private_key(&key)
    } else if let Some(keystore) = &args.keystore {
        let password = match &args.password {
            Some(password) => password.clone(),
            None => rpassword::prompt_password("Keystore password: ")?,
        };
        PrivateKeySigner::decrypt_keystore(keystore, password)
            .map_err(|e| eyre!("Failed to decrypt keystore {}: {}", keystore.display(), e))
    } else if let Some(private_key) = &args.private_key {
        parse_private_key(private_key)
    } else {
        Err(eyre!(
            "No wallet specified. Use --private-key, --keystore or --interactive"
        ))
    }
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    let key = key.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);

    key.parse::<PrivateKeySigner>()
        .map_err(|e| eyre!("Invalid private key: {}", e))
}
