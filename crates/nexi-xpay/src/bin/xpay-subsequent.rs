use tracing_subscriber::EnvFilter;
use xpay::{
    PaymentSystemSettings, ReqwestTransport, ResponseOutcome, SubsequentPaymentService, XPayConfig,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "subsequent payment failed");
        if e.is_security_failure() {
            eprintln!("ERROR: response failed MAC validation -- payment NOT confirmed.");
        } else {
            eprintln!("ERROR: {e}");
        }
        std::process::exit(1);
    }
}

async fn run() -> xpay::Result<()> {
    let settings = PaymentSystemSettings::from_env()?;
    let config = XPayConfig::default();

    let contract_id = std::env::var("XPAY_CONTRACT_ID")
        .map_err(|_| xpay::XPayError::Config("XPAY_CONTRACT_ID is required".to_string()))?;
    let order_total: f64 = std::env::var("XPAY_ORDER_TOTAL")
        .map_err(|_| xpay::XPayError::Config("XPAY_ORDER_TOTAL is required".to_string()))?
        .parse()
        .map_err(|_| {
            xpay::XPayError::InvalidAmount("XPAY_ORDER_TOTAL is not a number".to_string())
        })?;
    let expiry = std::env::var("XPAY_EXPIRY").ok().filter(|s| !s.is_empty());

    println!("Charging recurring contract...");
    println!("  Alias:       {}", settings.alias());
    println!("  Environment: {}", settings.environment());
    println!("  Contract:    {contract_id}");
    println!("  Total:       {order_total:.2}");

    let transport = ReqwestTransport::new(config.request_timeout)?;
    let service = SubsequentPaymentService::new(transport, settings, config);
    let outcome = service
        .execute(&contract_id, order_total, expiry.as_deref())
        .await?;

    match outcome {
        ResponseOutcome::Positive(p) => {
            println!("\nAuthorized.");
            println!("  idOperazione:         {}", p.base.id_operazione);
            println!("  codiceAutorizzazione: {}", p.mandatory.codice_autorizzazione);
            println!("  brand:                {}", p.mandatory.brand);
            Ok(())
        }
        negative @ ResponseOutcome::Negative(_) => negative.into_positive().map(|_| ()),
    }
}
