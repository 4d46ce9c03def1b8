//! Landing Page Demo
//!
//! Simulates one visit to a landing page:
//! - a hero carousel autoplaying every 5 seconds
//! - a visitor hovering it, switching tabs and using the keyboard
//! - three sections revealed as the visitor scrolls
//!
//! Run with: cargo run -p vantage_core --example landing_demo
//! Set RUST_LOG=vantage_core=trace to watch the autoplay transitions.

use anyhow::Result;
use std::time::Duration;
use vantage_core::{PageRuntime, VantageConfig};
use vantage_platform::{InteractionEvent, Key, NodeId, StaticNodes, Visibility};

const CONFIG: &str = r#"
[carousel]
autoplay_ms = 5000

[reveal]
threshold = 0.12
"#;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = VantageConfig::from_toml_str(CONFIG)?;
    let runtime = PageRuntime::with_config(config);

    let mut hero = runtime.deck(vec![
        "/img/hero-1.jpg".to_string(),
        "/img/hero-2.jpg".to_string(),
        "/img/hero-3.jpg".to_string(),
    ]);
    let bindings = hero.engine().bind();

    let sections = StaticNodes::new().with_marker(
        &runtime.config().reveal.marker,
        [NodeId(10), NodeId(20), NodeId(30)],
    );
    let mut reveal = runtime.reveal(&sections);

    let show = |label: &str, deck: &vantage_core::SlideDeck<String>| {
        if let (Some(src), Some((n, total))) = (deck.current(), deck.position()) {
            println!("{:<28} {} ({} of {})", label, src, n, total);
        }
    };

    show("mounted", &hero);

    runtime.advance(Duration::from_secs(5));
    show("after 5s", &hero);

    bindings.pointer_entered();
    runtime.advance(Duration::from_secs(12));
    show("hovered for 12s", &hero);
    bindings.pointer_left();

    runtime.visibility.set(Visibility::Hidden);
    runtime.advance(Duration::from_secs(60));
    show("tab hidden for 60s", &hero);
    runtime.visibility.set(Visibility::Visible);

    bindings.dispatch(InteractionEvent::FocusGained);
    hero.engine().handle_key(&Key::from_dom_name("ArrowLeft"));
    show("ArrowLeft while focused", &hero);
    bindings.dispatch(InteractionEvent::FocusLost);

    for (node, ratio) in [(10, 0.5), (20, 0.05), (20, 0.3)] {
        runtime.intersection.set_ratio(NodeId(node), ratio);
    }
    for (node, phase) in reveal.phases() {
        println!("section {:?}: {}", node, phase.css_class());
    }

    println!("{:?}", runtime.stats());
    hero.engine_mut().teardown();
    reveal.teardown();
    println!("{:?}", runtime.stats());

    Ok(())
}
