use anyhow::Result;
use dialoguer::Input;

use crate::app::App;

pub async fn run(username: Option<String>) -> Result<()> {
    let username = match username {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("  Username")
            .interact_text()?,
    };
    let password = rpassword::prompt_password("  Password: ")?;

    let mut app = App::init()?;
    app.login(&username, &password).await
}
