use anyhow::Result;

use crate::app::App;

/// Default command: show whatever the current session state calls for,
/// the way a fresh page load would.
pub async fn run() -> Result<()> {
    let mut app = App::init()?;
    app.evaluate().await
}
