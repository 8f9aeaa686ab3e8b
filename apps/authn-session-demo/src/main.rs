#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Walks one visitor through the authentication session lifecycle.
//!
//! Loads YAML configuration, wires the static token and session providers,
//! then runs authenticate, gate check, login and logout, logging each step.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use authn_session::{
    AuthEvents, AuthenticationService, AuthenticationServiceConfig, ProviderRegistry, SessionGate,
    SessionGateConfig, authenticate_request, load_config,
};
use authn_session_sdk::{AuthNSessionError, Identity, RequestContext, Session};
use clap::Parser;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Method};
use serde::Deserialize;
use session_authn_plugin::{SessionPluginConfig, SessionProvider};
use static_token_plugin::{StaticTokenPluginConfig, StaticTokenProvider};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// authn-session-demo - drive a request through the authentication session gate
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bearer token sent in the `Authorization` header
    #[arg(long)]
    token: Option<String>,

    /// Action the request is dispatched to
    #[arg(long, default_value = "dashboard")]
    action: String,

    /// Identity (JSON object) stored on login when the request is anonymous
    #[arg(long, default_value = r#"{"id":"demo"}"#)]
    login_as: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DemoConfig {
    gate: SessionGateConfig,
    service: AuthenticationServiceConfig,
    static_token: StaticTokenPluginConfig,
    session: SessionPluginConfig,
    /// Actions reachable without an identity.
    allow: Vec<String>,
}

fn build_registry(cfg: &DemoConfig) -> Result<ProviderRegistry> {
    let registry = ProviderRegistry::new()
        .with(Arc::new(StaticTokenProvider::from_config(&cfg.static_token)))?
        .with(Arc::new(SessionProvider::from_config(&cfg.session)))?;
    Ok(registry)
}

fn build_request(cli: &Cli) -> Result<RequestContext> {
    let mut ctx = RequestContext::new(Method::GET, format!("/{}", cli.action))
        .with_action(cli.action.clone())
        .with_session(Session::new("demo-session"));
    if let Some(token) = &cli.token {
        ctx = ctx.with_header(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    }
    Ok(ctx)
}

async fn run(cli: &Cli, cfg: DemoConfig) -> Result<Option<String>> {
    let registry = build_registry(&cfg)?;
    info!(providers = ?registry, "Identity providers registered");

    let service = Arc::new(AuthenticationService::new(registry, cfg.service.clone()));
    let events = AuthEvents::default();
    let mut rx = events.subscribe();

    let (ctx, result) = authenticate_request(service, build_request(cli)?).await?;
    info!(result = ?result, "Authenticated request");

    let mut gate = SessionGate::new(cfg.gate.clone(), events);
    gate.allow(cfg.allow.iter().cloned());
    gate.before_handler(&ctx)?;

    match gate.check_required(&ctx, &cli.action) {
        Ok(()) => info!(action = %cli.action, "Gate passed"),
        Err(AuthNSessionError::Unauthenticated(reason)) => {
            warn!(action = %cli.action, %reason, "Gate blocked");
            if let Some(target) = gate.login_redirect_target(&ctx)? {
                info!(%target, "Would return here after login");
            }
        }
        Err(e) => return Err(e.into()),
    }

    let identity = match gate.current_identity(&ctx) {
        Some(identity) => identity.clone(),
        None => Identity::from_value(serde_json::from_str(&cli.login_as)?)
            .ok_or_else(|| anyhow::anyhow!("`--login-as` must be a JSON object"))?,
    };

    let ctx = gate.replace_identity(ctx, identity).await?;
    info!(
        session_id = ?ctx.session().id(),
        phase = ?gate.phase(),
        "Logged in"
    );

    let (ctx, redirect) = gate.terminate(ctx).await?;
    info!(
        session_id = ?ctx.session().id(),
        redirect = ?redirect,
        "Logged out"
    );

    while let Ok(event) = rx.try_recv() {
        info!(event = ?event, "Auth event");
    }

    Ok(redirect)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg: DemoConfig = load_config(cli.config.as_deref())?;
    info!(config = ?cli.config, "Loaded configuration");

    run(&cli, cfg).await?;
    Ok(())
}
