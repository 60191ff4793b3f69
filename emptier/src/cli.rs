use anyhow::Result;
use clap::Args as ClapArgs;

use crate::config::{AppConfig, Overrides, RunConfig};

/// Flags selecting the vault and how to reach it.
/// Use with `#[command(flatten)] vault: VaultArgs`.
#[derive(Clone, Debug, ClapArgs)]
pub struct VaultArgs {
    /// Optional config file; missing is fine
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// AWS region [default: us-east-1]
    #[arg(long)]
    pub region: Option<String>,

    /// AWS shared config profile name [default: default]
    #[arg(long)]
    pub profile: Option<String>,

    /// Vault name to empty (required here, in the config file, or via EMPTIER_GLACIER__VAULT)
    #[arg(long)]
    pub vault: Option<String>,

    /// Custom endpoint, e.g. LocalStack
    #[arg(long)]
    pub endpoint_url: Option<String>,
}

/// Merge defaults + config file + env + flags into the run's settings.
pub fn run_config(args: &VaultArgs) -> Result<RunConfig> {
    let overrides = Overrides {
        region: args.region.clone(),
        profile: args.profile.clone(),
        vault: args.vault.clone(),
        endpoint_url: args.endpoint_url.clone(),
    };
    AppConfig::load_merged(&args.config, &overrides)?.into_run_config()
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser, Debug)]
    struct Args {
        #[command(flatten)]
        vault: VaultArgs,
    }

    #[test]
    fn flags_reach_run_config() {
        let args = Args::parse_from([
            "empty_vault",
            "--config",
            "does-not-exist.toml",
            "--vault",
            "v1",
            "--region",
            "ap-south-1",
        ]);
        let cfg = run_config(&args.vault).unwrap();
        assert_eq!(cfg.vault, "v1");
        assert_eq!(cfg.region, "ap-south-1");
        assert_eq!(cfg.profile, "default");
    }

    #[test]
    fn empty_vault_flag_is_fatal() {
        let args = Args::parse_from(["empty_vault", "--config", "nope.toml", "--vault", ""]);
        assert!(run_config(&args.vault).is_err());
    }
}
