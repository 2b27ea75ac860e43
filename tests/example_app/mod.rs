use visitor_counter::prelude::*;

#[derive(RustEmbed)]
#[folder = "statics"]
pub struct Statics;

pub fn counter(store: Arc<dyn Store>) -> FallbackCounter {
    FallbackCounter::new(Counter::new(store, "count"), Fallback::default())
}

pub fn app(store: Arc<dyn Store>) -> App {
    App::new().counter(counter(store)).statics::<Statics>()
}
