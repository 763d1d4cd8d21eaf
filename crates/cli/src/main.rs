//! The `scout` executable; all work happens in `scout_cli`.

fn main() -> anyhow::Result<()> {
    scout_cli::run()
}
