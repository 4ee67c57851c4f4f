use anyhow::Context;
use passdown_core::payload::{display_rows, BeneficiaryDisplay};
use passdown_core::will::{ApprovalRequest, CreateWillRequest, DeathCondition};
use serde::Serialize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::script::WillScript;

/// Everything produced for one replayed will script.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub chain: String,
    pub beneficiaries: Vec<BeneficiaryDisplay>,
    pub death_conditions: Vec<DeathCondition>,
    pub approvals: Vec<ApprovalRequest>,
    pub create_will: CreateWillRequest,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn run(config: &Config) -> anyhow::Result<RunOutput> {
    let script = WillScript::from_path(&config.script_path)?;
    tracing::info!(
        "Replaying {} edits from {}",
        script.edits.len(),
        config.script_path.display()
    );

    let draft = script.build_draft(&config.passdown)?;
    let approvals = draft
        .build_approval_requests(&config.passdown)
        .context("failed to build approval requests")?;
    let create_will = draft
        .build_create_will_request(&config.passdown)
        .context("failed to build create-will request")?;

    Ok(RunOutput {
        chain: draft.chain().to_string(),
        beneficiaries: display_rows(draft.allocation().set()),
        death_conditions: draft.death_conditions(),
        approvals,
        create_will,
    })
}
