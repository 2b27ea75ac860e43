use visitor_counter::prelude::*;

#[derive(RustEmbed)]
#[folder = "statics"]
struct Statics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CounterConfig::from_env()?;
    let store = visitor_counter::store::connect(&config).await;
    let counter = FallbackCounter::new(Counter::new(store, config.key), config.fallback);
    App::new()
        .counter(counter)
        .statics::<Statics>()
        .start()
        .await
}
