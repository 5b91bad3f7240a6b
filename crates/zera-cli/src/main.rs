use clap::{Parser, Subcommand, ValueEnum};
use zera_crypto::Algorithm;
use zera_rpc::{NodeConfig, RpcConfig};
use zera_types::constants::{DEFAULT_INDEXER_URL, NATIVE_CONTRACT_ID};
use zera_types::HashToken;

mod commands;

/// ZERA wallet command-line interface.
#[derive(Parser)]
#[command(name = "zera-wallet-cli")]
#[command(about = "Build, sign and submit ZERA transactions")]
#[command(version)]
struct Cli {
    /// Indexer base URL.
    #[arg(long, env = "ZERA_INDEXER_URL", default_value = DEFAULT_INDEXER_URL)]
    indexer: String,

    /// Indexer API key or bearer token.
    #[arg(long, env = "ZERA_INDEXER_AUTH", default_value = "", hide_env_values = true)]
    indexer_auth: String,

    /// Validator host (ports 50051/50052 are added when missing).
    #[arg(long, env = "ZERA_VALIDATOR")]
    validator: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlgorithmArg {
    Ed25519,
    Ed448,
}

impl AlgorithmArg {
    fn to_algorithm(self) -> Algorithm {
        match self {
            Self::Ed25519 => Algorithm::Ed25519,
            Self::Ed448 => Algorithm::Ed448,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HashArg {
    Blake3,
    #[value(name = "sha3-256")]
    Sha3_256,
    #[value(name = "sha3-512")]
    Sha3_512,
}

impl HashArg {
    fn to_token(self) -> HashToken {
        match self {
            Self::Blake3 => HashToken::Blake3,
            Self::Sha3_256 => HashToken::Sha3_256,
            Self::Sha3_512 => HashToken::Sha3_512,
        }
    }
}

/// Signing identity shared by every building command.
#[derive(clap::Args)]
struct SignerArgs {
    /// Public key text, e.g. `A_c_...` or `r_A_c_...`.
    #[arg(long)]
    public_key: String,

    /// Base58 private key.
    #[arg(long, env = "ZERA_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Network fee in ZRA.
    #[arg(long, default_value = "0.01")]
    fee: String,

    /// Memo stored on the transaction.
    #[arg(long)]
    memo: Option<String>,

    /// Submit to the validator instead of printing the signed transaction.
    #[arg(long)]
    submit: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair, randomly or from a passphrase.
    Keygen {
        #[arg(long, value_enum, default_value = "ed25519")]
        algorithm: AlgorithmArg,

        /// Address hash domain.
        #[arg(long = "hash", value_enum, default_value = "blake3")]
        hash: HashArg,

        /// Derive deterministically from this phrase.
        #[arg(long)]
        phrase: Option<String>,
    },

    /// Show the wallet address of a public key.
    Address {
        public_key: String,
    },

    /// Look up the next nonce of one or more addresses.
    Nonce {
        #[arg(required = true)]
        addresses: Vec<String>,

        /// Ask the validator instead of the indexer.
        #[arg(long)]
        from_validator: bool,
    },

    /// Look up parts per whole coin of a contract.
    Scale {
        symbol: String,
    },

    /// Transfer coins from one wallet.
    Transfer {
        #[command(flatten)]
        signer: SignerArgs,

        /// Recipient address.
        #[arg(long)]
        to: String,

        /// Amount in whole units of the asset.
        #[arg(long)]
        amount: String,

        #[arg(long, default_value = NATIVE_CONTRACT_ID)]
        asset: String,
    },

    /// Mint new supply of a token. Needs a restricted key.
    Mint {
        #[command(flatten)]
        signer: SignerArgs,

        #[arg(long)]
        contract: String,

        /// Amount in whole units of the token.
        #[arg(long)]
        amount: String,

        #[arg(long)]
        to: String,
    },

    /// Vote on a governance proposal.
    Vote {
        #[command(flatten)]
        signer: SignerArgs,

        #[arg(long)]
        contract: String,

        /// Hex proposal id.
        #[arg(long)]
        proposal: String,

        /// Yes/no vote.
        #[arg(long)]
        support: Option<bool>,

        /// Option index of a multiple-choice proposal.
        #[arg(long)]
        option: Option<u32>,
    },
}

/// Application context shared across commands.
struct AppContext {
    indexer: RpcConfig,
    validator: Option<String>,
    node: NodeConfig,
}

impl AppContext {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            indexer: RpcConfig::new(&cli.indexer, &cli.indexer_auth),
            validator: cli.validator.clone(),
            node: NodeConfig::default(),
        }
    }

    fn validator(&self) -> Result<&str, String> {
        self.validator
            .as_deref()
            .ok_or_else(|| "no validator configured (use --validator or ZERA_VALIDATOR)".to_string())
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ctx = AppContext::from_cli(&cli);

    let result = match cli.command {
        Commands::Keygen { algorithm, hash, phrase } => {
            commands::keygen(algorithm.to_algorithm(), hash.to_token(), phrase.as_deref())
        }
        Commands::Address { public_key } => commands::show_address(&public_key),
        Commands::Nonce {
            addresses,
            from_validator,
        } => commands::show_nonces(&ctx, addresses, from_validator).await,
        Commands::Scale { symbol } => commands::show_scale(&ctx, &symbol).await,
        Commands::Transfer {
            signer,
            to,
            amount,
            asset,
        } => commands::transfer(&ctx, &signer, &to, &amount, &asset).await,
        Commands::Mint {
            signer,
            contract,
            amount,
            to,
        } => commands::mint(&ctx, &signer, &contract, &amount, &to).await,
        Commands::Vote {
            signer,
            contract,
            proposal,
            support,
            option,
        } => commands::vote(&ctx, &signer, &contract, &proposal, support, option).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
