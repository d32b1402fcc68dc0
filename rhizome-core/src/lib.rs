pub mod engine;
pub mod export;
pub mod report;

pub use engine::{DEFAULT_WORKERS, Engine, EngineStats, GraphSnapshot};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
        _     _
   _ __| |__ (_)_______  _ __ ___   ___
  | '__| '_ \| |_  / _ \| '_ ` _ \ / _ \
  | |  | | | | |/ / (_) | | | | | |  __/
  |_|  |_| |_|_/___\___/|_| |_| |_|\___|
"#;
    println!("{}", banner.bright_green());
    println!(
        "  {}\n",
        "follow the roots: DNS topology mapping".dimmed()
    );
}
