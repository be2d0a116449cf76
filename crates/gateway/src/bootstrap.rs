use std::{sync::Arc, time::Duration};

use {
    anyhow::Context,
    switchboard_channels::{
        Backend, ChannelRegistry, ChannelStore, MemoryBackend, StaticChannelStore,
    },
    switchboard_config::{HttpConfig, SwitchboardConfig},
    switchboard_freshchat::FreshChatHandler,
    switchboard_slack::SlackHandler,
    switchboard_zenvia::ZenviaHandler,
    switchboard_zenvia_whatsapp::ZenviaWhatsAppHandler,
    tokio::net::TcpListener,
    tracing::{info, warn},
};

use crate::{server::build_router, state::AppState};

/// Shared outbound client. Every adapter call inherits its timeout.
pub fn http_client(config: &HttpConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
        .context("building http client")
}

/// Registry with every adapter this build ships.
pub fn default_registry(http: reqwest::Client) -> switchboard_channels::Result<ChannelRegistry> {
    ChannelRegistry::builder()
        .register(FreshChatHandler::new(http.clone()))
        .register(SlackHandler::new(http.clone()))
        .register(ZenviaHandler::new(http.clone()))
        .register(ZenviaWhatsAppHandler::new(http))
        .build()
}

/// Wire the registry, configured channels and in-memory backend.
pub fn build_state(config: &SwitchboardConfig) -> anyhow::Result<AppState> {
    let registry = default_registry(http_client(&config.http)?)?;
    let channels = config.channels()?;

    for channel in &channels {
        if registry.get(&channel.channel_type).is_none() {
            warn!(
                channel_type = %channel.channel_type,
                channel_uuid = %channel.uuid,
                "no adapter for channel type, its webhooks will 404"
            );
        }
    }
    info!(channels = channels.len(), "loaded channels");

    Ok(AppState::new(
        Arc::new(registry),
        Arc::new(StaticChannelStore::new(channels)) as Arc<dyn ChannelStore>,
        Arc::new(MemoryBackend::new()) as Arc<dyn Backend>,
    ))
}

/// Bind the listener from `config.server` and serve until the process
/// exits.
pub async fn serve(config: SwitchboardConfig) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    serve_listener(listener, state).await
}

/// Serve the webhook router on an already bound listener.
pub async fn serve_listener(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    for (channel_type, route) in state.registry.routes() {
        info!(
            %channel_type,
            method = %route.method,
            path = %format!("/c/{channel_type}/{{uuid}}/{}", route.action),
            "route mounted"
        );
    }
    info!(addr = %listener.local_addr()?, "switchboard gateway listening");

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, switchboard_channels::ChannelType, switchboard_config::ChannelConfig};

    fn entry(uuid: &str, channel_type: &str) -> ChannelConfig {
        ChannelConfig {
            uuid: uuid.parse().unwrap(),
            channel_type: channel_type.into(),
            name: format!("{channel_type} channel"),
            address: String::new(),
            country: None,
            config: serde_json::Map::new(),
        }
    }

    #[test]
    fn registry_serves_every_adapter() {
        let registry = default_registry(reqwest::Client::new()).unwrap();
        let codes: Vec<String> = registry.list().into_iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(codes, ["FC", "SL", "ZV", "ZVW"]);

        let routes = registry.routes();
        assert!(routes.iter().any(|(c, r)| c.as_str() == "ZVW" && r.action == "status"));
    }

    #[tokio::test]
    async fn state_exposes_configured_channels() {
        let config = SwitchboardConfig {
            channels: vec![entry("8eb23e93-5ecb-45ba-b726-3b064e0c56ab", "zvw")],
            ..SwitchboardConfig::default()
        };
        let state = build_state(&config).unwrap();
        let channel = state
            .channels
            .get(
                &ChannelType::from_static("ZVW"),
                "8eb23e93-5ecb-45ba-b726-3b064e0c56ab".parse().unwrap(),
            )
            .await
            .unwrap();
        assert!(channel.is_some());
    }

    #[tokio::test]
    async fn serves_health_on_bound_listener() {
        let state = build_state(&SwitchboardConfig::default()).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve_listener(listener, state));

        let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["channel_types"], serde_json::json!(["FC", "SL", "ZV", "ZVW"]));
        server.abort();
    }

    #[tokio::test]
    async fn serve_fails_when_port_is_taken() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = SwitchboardConfig::default();
        config.server.bind = "127.0.0.1".into();
        config.server.port = taken.local_addr().unwrap().port();

        let err = serve(config).await.unwrap_err();
        assert!(err.to_string().starts_with("binding 127.0.0.1:"));
    }

    #[tokio::test]
    async fn serve_rejects_invalid_channels_before_binding() {
        let config = SwitchboardConfig {
            channels: vec![entry("8eb23e93-5ecb-45ba-b726-3b064e0c56ab", "toolong")],
            ..SwitchboardConfig::default()
        };
        assert!(serve(config).await.is_err());
    }

    #[test]
    fn invalid_channel_config_fails_startup() {
        let config = SwitchboardConfig {
            channels: vec![entry("8eb23e93-5ecb-45ba-b726-3b064e0c56ab", "toolong")],
            ..SwitchboardConfig::default()
        };
        assert!(build_state(&config).is_err());
    }
}
