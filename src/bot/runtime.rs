//! Bot runtime - Polling and Webhook runners.

use std::time::Duration;

use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::dispatcher::BotDispatcher;
use super::mode::DeliveryMode;
use super::webhook;
use crate::plugins;

/// Run the bot in the given mode until `shutdown` is cancelled.
///
/// Cancelling stops the update listener. In webhook mode the listener also
/// deletes the webhook registration on its way out.
pub async fn run(
    mode: DeliveryMode,
    mut dispatcher: BotDispatcher,
    bot: Bot,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    if shutdown.is_cancelled() {
        info!("Shutdown requested before start, not dispatching");
        return Ok(());
    }

    plugins::register_commands(&bot).await;

    let watcher = tokio::spawn(stop_on_cancel(dispatcher.shutdown_token(), shutdown));

    let result = match mode {
        DeliveryMode::Polling => {
            info!("Starting bot in polling mode...");
            run_polling(&mut dispatcher, bot).await;
            Ok(())
        }
        DeliveryMode::Webhook { url, address } => {
            info!("Starting bot in webhook mode...");
            webhook::start_webhook(&mut dispatcher, bot, url, address).await
        }
    };

    watcher.abort();
    info!("Bot stopped");
    result
}

/// Run the bot with long polling.
async fn run_polling(dispatcher: &mut BotDispatcher, bot: Bot) {
    // A webhook left over from a previous deployment would block getUpdates.
    let listener = Polling::builder(bot).delete_webhook().await.build();

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Error from update listener"),
        )
        .await;
}

/// Forward cancellation to the dispatcher.
async fn stop_on_cancel(token: ShutdownToken, shutdown: CancellationToken) {
    shutdown.cancelled().await;
    info!("Stopping dispatcher...");

    loop {
        match token.shutdown() {
            Ok(stopped) => {
                stopped.await;
                return;
            }
            // Listener still starting up.
            Err(_) => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
pub async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down..."),
        _ = terminate => warn!("Received SIGTERM, shutting down..."),
    }

    shutdown.cancel();
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};
    use url::Url;

    use super::*;
    use crate::bot::{AppState, build_dispatcher};
    use crate::config::Config;
    use crate::plugins::Router;
    use crate::utils::SystemClock;

    const TOKEN: &str = "123:abc";

    const ME: &str = r#"{"id":1,"is_bot":true,"first_name":"Tradewatch","username":"tw_bot",
        "can_join_groups":true,"can_read_all_group_messages":false,"supports_inline_queries":false}"#;

    const SENT: &str = r#"{"message_id":100,"date":1710107100,
        "chat":{"id":42,"type":"private","first_name":"Sara"},"text":"ok"}"#;

    type Calls = Arc<Mutex<Vec<(String, String)>>>;

    /// Local Bot API stand-in. Records `(method, body)` for every request,
    /// method names lowercased.
    struct MockApi {
        url: Url,
        calls: Calls,
    }

    impl MockApi {
        /// `updates` is served once, on the first `getUpdates`.
        async fn start(updates: &str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let url = Url::parse(&format!("http://{}/", listener.local_addr().unwrap())).unwrap();
            let calls = Calls::default();
            let pending = Arc::new(Mutex::new(Some(updates.to_string())));

            let recorded = calls.clone();
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(serve(stream, recorded.clone(), pending.clone()));
                }
            });

            Self { url, calls }
        }

        fn bot(&self) -> Bot {
            Bot::new(TOKEN).set_api_url(self.url.clone())
        }

        fn methods(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
        }

        fn bodies(&self, method: &str) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|(m, _)| m == method)
                .map(|(_, b)| b.clone())
                .collect()
        }
    }

    async fn serve(stream: TcpStream, calls: Calls, pending: Arc<Mutex<Option<String>>>) {
        let (read, mut write) = stream.into_split();
        let mut reader = BufReader::new(read);

        loop {
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                return;
            }

            let mut content_length = 0;
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).await.unwrap_or(0) == 0 {
                    return;
                }
                let header = header.trim_end();
                if header.is_empty() {
                    break;
                }
                if let Some((name, value)) = header.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap_or(0);
                    }
                }
            }

            let mut body = vec![0; content_length];
            if reader.read_exact(&mut body).await.is_err() {
                return;
            }

            let method = request_line
                .split_whitespace()
                .nth(1)
                .and_then(|path| path.rsplit('/').next())
                .unwrap_or_default()
                .to_lowercase();
            calls
                .lock()
                .unwrap()
                .push((method.clone(), String::from_utf8_lossy(&body).into_owned()));

            let result = match method.as_str() {
                "getme" => ME.to_string(),
                "sendmessage" => SENT.to_string(),
                "getupdates" => {
                    let updates = pending.lock().unwrap().take();
                    match updates {
                        Some(updates) => updates,
                        None => {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            "[]".to_string()
                        }
                    }
                }
                _ => "true".to_string(),
            };

            let body = format!(r#"{{"ok":true,"result":{}}}"#, result);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            );
            if write.write_all(response.as_bytes()).await.is_err() {
                return;
            }
        }
    }

    fn dispatcher(bot: Bot) -> BotDispatcher {
        let config = Config::from_lookup(|key| (key == "BOT_TOKEN").then(|| TOKEN.to_string())).unwrap();
        let router = Router::new(Arc::new(SystemClock)).unwrap();

        build_dispatcher(bot, AppState::new(Arc::new(config), router))
    }

    fn count_calls(calls: &Calls, method: &str) -> usize {
        calls.lock().unwrap().iter().filter(|(m, _)| m == method).count()
    }

    /// Wait until `method` has been called `count` times.
    async fn wait_for(calls: &Calls, method: &str, count: usize) {
        tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if count_calls(calls, method) >= count {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("{} was not called {} times", method, count));
    }

    /// Cancel `shutdown` once `method` has been called `count` times.
    fn cancel_after(api: &MockApi, method: &'static str, count: usize, shutdown: &CancellationToken) {
        let calls = api.calls.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            wait_for(&calls, method, count).await;
            shutdown.cancel();
        });
    }

    #[tokio::test]
    async fn test_run_returns_when_already_cancelled() {
        let api = MockApi::start("[]").await;
        let bot = api.bot();
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        tokio::time::timeout(
            Duration::from_secs(5),
            run(DeliveryMode::Polling, dispatcher(bot.clone()), bot, shutdown),
        )
        .await
        .expect("run should return at once")
        .unwrap();

        assert!(api.methods().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_polling_stops_on_cancel() {
        let api = MockApi::start("[]").await;
        let bot = api.bot();
        let shutdown = CancellationToken::new();
        cancel_after(&api, "getupdates", 3, &shutdown);

        tokio::time::timeout(
            Duration::from_secs(10),
            run(DeliveryMode::Polling, dispatcher(bot.clone()), bot, shutdown),
        )
        .await
        .expect("polling should stop after cancel")
        .unwrap();

        let methods = api.methods();
        assert!(methods.contains(&"setmycommands".to_string()));
        assert!(methods.contains(&"deletewebhook".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_webhook_deleted_on_cancel() {
        let api = MockApi::start("[]").await;
        let bot = api.bot();
        let shutdown = CancellationToken::new();
        cancel_after(&api, "getme", 1, &shutdown);

        let mode = DeliveryMode::Webhook {
            url: Url::parse("https://bot.example.com/123:abc").unwrap(),
            address: SocketAddr::from(([127, 0, 0, 1], 0)),
        };

        tokio::time::timeout(Duration::from_secs(10), run(mode, dispatcher(bot.clone()), bot, shutdown))
            .await
            .expect("webhook listener should stop after cancel")
            .unwrap();

        // deleteWebhook is sent by the server's stop future, possibly just
        // after the dispatcher returns.
        wait_for(&api.calls, "deletewebhook", 1).await;

        let methods = api.methods();
        let set = methods.iter().position(|m| m == "setwebhook").expect("webhook registered");
        let delete = methods.iter().position(|m| m == "deletewebhook").unwrap();
        assert!(set < delete);
        assert!(!methods.contains(&"getupdates".to_string()));
        assert!(api.bodies("setwebhook")[0].contains("bot.example.com"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_polling_replies_to_new_and_edited_commands() {
        let updates = r#"[
            {"update_id":1,"message":{"message_id":1,"date":1710107100,
                "chat":{"id":42,"type":"private","first_name":"Sara"},
                "from":{"id":7,"is_bot":false,"first_name":"Sara"},"text":"/price"}},
            {"update_id":2,"message":{"message_id":2,"date":1710107100,
                "chat":{"id":42,"type":"private","first_name":"Sara"},
                "from":{"id":7,"is_bot":false,"first_name":"Sara"},"text":"/market"}},
            {"update_id":3,"edited_message":{"message_id":3,"date":1710107100,"edit_date":1710107160,
                "chat":{"id":42,"type":"private","first_name":"Sara"},
                "from":{"id":7,"is_bot":false,"first_name":"Sara"},"text":"/news"}}
        ]"#;
        let api = MockApi::start(updates).await;
        let bot = api.bot();
        let shutdown = CancellationToken::new();
        cancel_after(&api, "sendmessage", 2, &shutdown);

        tokio::time::timeout(
            Duration::from_secs(10),
            run(DeliveryMode::Polling, dispatcher(bot.clone()), bot, shutdown),
        )
        .await
        .expect("polling should stop after cancel")
        .unwrap();

        let sent = api.bodies("sendmessage");
        assert_eq!(sent.len(), 2, "unknown /price must not be answered");
        assert!(sent.iter().all(|body| body.contains(r#""chat_id":42"#)));
        assert!(sent.iter().any(|body| body.contains("S&P 500")));
        assert!(sent.iter().any(|body| body.contains("Bloomberg")));
    }
}
