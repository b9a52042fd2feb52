//! Command-line interface for proto-payload
//!
//! # Usage Examples
//!
//! ```bash
//! # Encode a JSON payload read from stdin
//! echo '{"id": "user_001", "age": 30}' | proto-payload encode \
//!   --proto user.proto \
//!   --type accounts.v1.User > user.bin
//!
//! # Decode with several schema files merged into one root
//! proto-payload decode \
//!   --proto user.proto,common.proto \
//!   --type accounts.v1.User \
//!   --input user.bin --defaults
//!
//! # Schema settings can come from the environment
//! PROTO_PAYLOAD_PROTO=user.proto PROTO_PAYLOAD_TYPE=User proto-payload decode --input user.bin
//!
//! # List the message types a schema defines
//! proto-payload list-types --proto user.proto
//! ```

use clap::{Parser, Subcommand};
use proto_payload::{ConversionOpts, IoOpts, SchemaOpts, TypeOpts};

#[derive(Parser)]
#[command(name = "proto-payload")]
#[command(about = "Encode and decode protobuf payloads using .proto schemas loaded at runtime")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON payload into a protobuf wire buffer
    Encode {
        #[command(flatten)]
        schema: SchemaOpts,

        #[command(flatten)]
        ty: TypeOpts,

        #[command(flatten)]
        io: IoOpts,
    },

    /// Decode a protobuf wire buffer into a JSON payload
    Decode {
        #[command(flatten)]
        schema: SchemaOpts,

        #[command(flatten)]
        ty: TypeOpts,

        #[command(flatten)]
        io: IoOpts,

        #[command(flatten)]
        conversion: ConversionOpts,
    },

    /// Rebuild a JSON value with arrays turned into index-keyed objects
    Extract {
        #[command(flatten)]
        io: IoOpts,
    },

    /// List the message types defined by a schema
    ListTypes {
        #[command(flatten)]
        schema: SchemaOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { schema, ty, io } => {
            proto_payload::run_encode(&schema, &ty, &io).await?;
        }
        Commands::Decode {
            schema,
            ty,
            io,
            conversion,
        } => {
            proto_payload::run_decode(&schema, &ty, &io, &conversion).await?;
        }
        Commands::Extract { io } => {
            proto_payload::run_extract(&io)?;
        }
        Commands::ListTypes { schema } => {
            for name in proto_payload::run_list_types(&schema).await? {
                println!("{name}");
            }
        }
    }

    Ok(())
}
