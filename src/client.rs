/// Create a new http client, shared by the remote store backends and the counter client.
/// No timeouts or retries are configured: a call either succeeds or the caller falls back.
pub fn client() -> reqwest::Client {
    reqwest::Client::default()
}
