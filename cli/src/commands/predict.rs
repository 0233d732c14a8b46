use alloy::network::AnyNetwork;
use alloy::primitives::{Address, U256};
use alloy::providers::{Provider, ProviderBuilder};
use color_eyre::eyre::Result;
use safe_clone::contracts::ISafeProxyFactory;
use safe_clone::{DeploymentParameters, ImplementationVariant};

use crate::cli::PredictArgs;
use crate::output::PredictOutput;

fn parameters(args: &PredictArgs) -> Result<DeploymentParameters> {
    let owners = args
        .owners
        .iter()
        .map(|owner| owner.parse::<Address>())
        .collect::<Result<Vec<_>, _>>()?;
    let variant: ImplementationVariant = args.variant.parse()?;
    let params = DeploymentParameters::new(
        owners,
        args.threshold,
        args.salt_nonce.parse::<U256>()?,
        variant,
    )?;
    Ok(match &args.payment_receiver {
        Some(receiver) => params.with_payment_receiver(receiver.parse()?),
        None => params,
    })
}

pub async fn run(args: PredictArgs, json: bool) -> Result<()> {
    let params = parameters(&args)?;

    let provider = ProviderBuilder::new()
        .network::<AnyNetwork>()
        .connect_http(args.rpc_url.parse()?);

    let factory = ISafeProxyFactory::new(params.addresses().proxy_factory, &provider);
    let creation_code = factory.proxyCreationCode().call().await?;

    let safe_address = params.predicted_address(&creation_code);
    let code = provider.get_code_at(safe_address).await?;

    let output = PredictOutput {
        safe_address,
        variant: params.variant.to_string(),
        owners: params.owners.clone(),
        threshold: params.threshold,
        salt_nonce: params.salt,
        already_deployed: !code.is_empty(),
        initializer: params.initializer(),
        create_call: params.create_call(),
    };

    output.print(json);

    Ok(())
}
