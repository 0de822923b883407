use anyhow::Result;
use clap::Parser;

mod cli;

use cli::commands::{
    feedback::FeedbackCommand,
    init::InitCommand,
    peek::PeekCommand,
    register::RegisterCommand,
    review::{Decision, ReviewCommand},
    show_how_to_get_started,
    status::StatusCommand,
    submit::{DirectionCommand, UploadCommand},
    Command, PortalContext,
};
use cli::{Cli, Commands};
use content_portal::config::PortalConfig;
use content_portal::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    PortalConfig::load_env_file()?;

    // `init` may be asked to create the file named by --config
    let config_path = match (&cli.command, &cli.config) {
        (Some(Commands::Init { .. }), Some(path)) if !path.exists() => None,
        (_, path) => path.as_deref(),
    };
    let config = PortalConfig::load_from(config_path)?;
    init_telemetry(&config.observability)?;

    let context = PortalContext::new(config, cli.snapshot.clone(), cli.now.as_deref())?;
    let runtime = tokio::runtime::Runtime::new()?;

    match cli.command {
        // Default behavior: no subcommand - explain how to get started
        None => runtime.block_on(show_how_to_get_started()),
        Some(Commands::Status { client, attention, json }) => runtime.block_on(async {
            StatusCommand::new(client)
                .with_attention_only(attention)
                .with_json(json)
                .execute(&context)
                .await
        }),
        Some(Commands::Peek { client, content }) => {
            runtime.block_on(async { PeekCommand::new(client, content).execute(&context).await })
        }
        Some(Commands::Register {
            client,
            contents,
            name,
            direction_deadline,
            content_deadline,
        }) => runtime.block_on(async {
            RegisterCommand::new(client, contents)
                .with_display_name(name)
                .with_deadlines(direction_deadline, content_deadline)
                .execute(&context)
                .await
        }),
        Some(Commands::Direction {
            client,
            content,
            text,
            file_url,
        }) => runtime.block_on(async {
            DirectionCommand {
                client,
                content,
                text,
                file_url,
            }
            .execute(&context)
            .await
        }),
        Some(Commands::Upload {
            client,
            content,
            file_url,
            caption,
        }) => runtime.block_on(async {
            UploadCommand {
                client,
                content,
                file_url,
                caption,
            }
            .execute(&context)
            .await
        }),
        Some(Commands::Feedback {
            client,
            content,
            text,
            file_url,
        }) => runtime.block_on(async {
            FeedbackCommand {
                client,
                content,
                text,
                file_url,
            }
            .execute(&context)
            .await
        }),
        Some(Commands::Approve { client, content }) => runtime.block_on(async {
            ReviewCommand::new(client, content, Decision::Approve)
                .execute(&context)
                .await
        }),
        Some(Commands::Complete { client, content }) => runtime.block_on(async {
            ReviewCommand::new(client, content, Decision::Complete)
                .execute(&context)
                .await
        }),
        Some(Commands::Init { force, dry_run }) => runtime.block_on(async {
            InitCommand::new(force, dry_run)
                .with_config_path(cli.config)
                .execute(&context)
                .await
        }),
    }
}
