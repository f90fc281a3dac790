use serde::Deserialize;
use skyload_advisor::{
    parse_reply, AdvisorError, AnthropicClient, AnthropicConfig, CompletionRequest, LlmClient,
    StaticClient,
};
use std::net::TcpListener;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(default)]
struct Verdict {
    balance: Option<u32>,
    notes: Vec<String>,
}

fn ask(client: &dyn LlmClient) -> Result<Verdict, AdvisorError> {
    let request = CompletionRequest::new("You are terse.", "Rate the load.", 256);
    let text = client.complete(&request)?;
    parse_reply(&text)
}

#[test]
fn test_static_client_reply_flows_into_schema() -> anyhow::Result<()> {
    let client = StaticClient::replying("Sure.\n{\"balance\": 82, \"notes\": [\"aft heavy\"]}\nDone.");
    let verdict = ask(&client)?;
    assert_eq!(verdict.balance, Some(82));
    assert_eq!(verdict.notes, vec!["aft heavy"]);
    Ok(())
}

#[test]
fn test_failures_are_typed() {
    assert!(matches!(
        ask(&StaticClient::failing("down")),
        Err(AdvisorError::NoText)
    ));
    assert!(matches!(
        ask(&StaticClient::replying("no object here")),
        Err(AdvisorError::NoJson)
    ));
}

#[test]
fn test_unreachable_endpoint_is_http_error() -> anyhow::Result<()> {
    // Grab a free port, then release it so the connect is refused.
    let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();

    let mut config = AnthropicConfig::new("sk-test");
    config.base_url = format!("http://127.0.0.1:{}", port);
    config.timeout = Duration::from_secs(2);
    let client = AnthropicClient::new(config)?;

    assert!(matches!(ask(&client), Err(AdvisorError::Http(_))));
    Ok(())
}
