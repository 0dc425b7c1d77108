//! tonedeck - multi-track tone engine demo
//!
//! Run with: cargo run

mod app;

use app::Demo;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    Demo::new().run()
}
