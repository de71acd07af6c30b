use anyhow::Result;

use crate::app::App;

/// Fetch and render the event list no matter the session state. The
/// server allows anonymous reads, so this works logged out too.
pub async fn run() -> Result<()> {
    let mut app = App::init()?;
    app.load_events().await
}
