use anyhow::{Context, Result, anyhow};
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_glacier as glacier;
use config::{Config, Environment, File};
use serde::Deserialize;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, Deserialize)]
pub struct GlacierConfig {
    pub region: String,
    pub profile: String,
    pub vault: Option<String>,
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub glacier: GlacierConfig,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub vault: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Settings for one run, fixed before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub region: String,
    pub profile: String,
    pub vault: String,
    pub endpoint_url: Option<String>,
}

impl AppConfig {
    /// Load and MERGE, later sources winning:
    ///  - built-in defaults (region, profile)
    ///  - config file, if it exists
    ///  - environment (EMPTIER_* with "__" nesting, e.g. EMPTIER_GLACIER__VAULT)
    ///  - command-line overrides
    pub fn load_merged(config_path: &str, overrides: &Overrides) -> Result<Self> {
        let builder = Config::builder()
            .set_default("glacier.region", DEFAULT_REGION)?
            .set_default("glacier.profile", DEFAULT_PROFILE)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("EMPTIER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("glacier.region", overrides.region.clone())?
            .set_override_option("glacier.profile", overrides.profile.clone())?
            .set_override_option("glacier.vault", overrides.vault.clone())?
            .set_override_option("glacier.endpoint_url", overrides.endpoint_url.clone())?;

        let cfg = builder.build().context("building merged config")?;
        let out: AppConfig = cfg.try_deserialize().context("deserializing AppConfig")?;
        Ok(out)
    }

    pub fn into_run_config(self) -> Result<RunConfig> {
        let GlacierConfig {
            region,
            profile,
            vault,
            endpoint_url,
        } = self.glacier;

        let vault = vault
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("--vault must be set"))?;
        if region.is_empty() {
            return Err(anyhow!("--region must not be empty"));
        }

        Ok(RunConfig {
            region,
            profile,
            vault,
            endpoint_url,
        })
    }
}

pub async fn build_glacier_client(cfg: &RunConfig) -> Result<glacier::Client> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(cfg.region.clone()));

    // An explicit endpoint means LocalStack: use static dummy creds to bypass
    // SSO/profile resolution.
    if cfg.endpoint_url.is_some() {
        let creds = Credentials::new("test", "test", None, None, "localstack");
        loader = loader.credentials_provider(SharedCredentialsProvider::new(creds));
    } else {
        loader = loader.profile_name(&cfg.profile);
    }

    let shared_cfg = loader.load().await;
    if cfg.endpoint_url.is_none() {
        check_credentials(shared_cfg.credentials_provider(), &cfg.profile).await?;
    }

    let mut b = glacier::config::Builder::from(&shared_cfg);
    if let Some(ep) = &cfg.endpoint_url {
        b = b.endpoint_url(ep.clone());
    }
    Ok(glacier::Client::from_conf(b.build()))
}

/// Resolve credentials once so a bad profile fails before any Glacier call.
async fn check_credentials(
    provider: Option<SharedCredentialsProvider>,
    profile: &str,
) -> Result<()> {
    let provider =
        provider.ok_or_else(|| anyhow!("no credentials provider for profile {profile}"))?;
    provider
        .provide_credentials()
        .await
        .with_context(|| format!("loading credentials for profile {profile}"))?;
    Ok(())
}
