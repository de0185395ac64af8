//! tonedeck - terminal music workstation
//!
//! Run with: cargo run

mod app;
mod input;
mod ui;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    App::new()?.run()
}
