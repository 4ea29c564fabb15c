//! Agent Cockpit demo binary
//!
//! Drives the coordinator with a scripted in-process transport so the
//! full flow can be watched without a real agent backend: spawn, event
//! ingestion, approval resolution, cost reporting, teardown.
//!
//! Run with: cargo run
//!
//! For help: cargo run -- --help

use std::sync::Arc;

use agent_cockpit::coordinator::Coordinator;
use agent_cockpit::transport::{SimTransport, SpawnRequest};
use agent_cockpit::types::{MessagePayload, UsageTotals};
use clap::Parser;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = agent_cockpit::cli::Cli::parse();
    agent_cockpit::logging::init(&cli)?;

    let transport = Arc::new(SimTransport::new());
    let coordinator = Coordinator::new(transport.clone());

    let session_id = coordinator
        .spawn_session(SpawnRequest {
            working_dir: cli.working_dir.clone(),
            initial_prompt: Some("describe this project".to_string()),
            model: cli.model.clone(),
            permission_mode: cli.permission_mode,
        })
        .await?;
    println!("spawned session {session_id}");

    // Feed the event streams the way a live backend would
    let events = coordinator.event_sender();
    events.send_status(&session_id, "Connected");
    events.send_message(
        &session_id,
        MessagePayload::from_value(json!({
            "type": "assistant",
            "message": {"content": [{"type": "text", "text": "Looking around..."}]}
        })),
    );
    events.send_message(
        &session_id,
        MessagePayload::from_value(json!({
            "type": "control_request",
            "request": {
                "subtype": "can_use_tool",
                "request_id": "req-1",
                "tool_name": "Bash",
                "tool_use_id": "tu-1",
                "input": {"command": "ls -la"}
            }
        })),
    );
    events.send_usage(
        &session_id,
        UsageTotals {
            input_tokens: 1_200,
            output_tokens: 450,
            cache_creation_input_tokens: 300,
            cache_read_input_tokens: 2_000,
        },
    );
    events.flush().await;

    coordinator.send_message(&session_id, "go ahead").await?;

    if let Some(approval) = coordinator.actionable_approval(&session_id) {
        println!(
            "approval requested: {} {}",
            approval.tool_name, approval.tool_input
        );
        coordinator
            .approve_tool(&session_id, &approval.request_id, true, None)
            .await?;
        println!("approved {}", approval.request_id);
    }

    let cost = coordinator.session_cost(&session_id)?;
    println!(
        "usage: {} in / {} out, estimated ${:.6} ({})",
        cost.input_tokens,
        cost.output_tokens,
        cost.estimated_cost_usd,
        cost.model
            .as_deref()
            .unwrap_or(agent_cockpit::pricing::DEFAULT_PRICING_MODEL)
    );

    for session in coordinator.list_sessions() {
        println!(
            "session {} [{}] mode={} dir={}",
            session.id,
            session.status.as_str(),
            session.permission_mode.as_str(),
            session.working_dir
        );
    }

    coordinator.kill_session(&session_id).await?;
    println!(
        "session removed; {} transport commands issued",
        transport.command_count()
    );

    Ok(())
}
